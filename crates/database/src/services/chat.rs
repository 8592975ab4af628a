use crate::entities::{chat, chat_message};
use crate::error::ServiceError;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

pub struct ChatService;

const CHAT_LIST_LIMIT: u64 = 50;

impl ChatService {
    pub async fn create(
        db: &DatabaseConnection,
        student_id: Uuid,
        title: Option<String>,
    ) -> Result<chat::Model, DbErr> {
        let now = Utc::now().naive_utc();
        chat::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            title: Set(title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "New Chat".to_string())),
            is_active: Set(true),
            last_message_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn list_for_student(
        db: &DatabaseConnection,
        student_id: Uuid,
    ) -> Result<Vec<chat::Model>, DbErr> {
        chat::Entity::find()
            .filter(chat::Column::StudentId.eq(student_id))
            .filter(chat::Column::IsActive.eq(true))
            .order_by_desc(chat::Column::LastMessageAt)
            .limit(CHAT_LIST_LIMIT)
            .all(db)
            .await
    }

    /// A chat is only ever visible to the student who owns it.
    pub async fn find_for_student(
        db: &DatabaseConnection,
        chat_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<chat::Model>, DbErr> {
        chat::Entity::find_by_id(chat_id)
            .filter(chat::Column::StudentId.eq(student_id))
            .filter(chat::Column::IsActive.eq(true))
            .one(db)
            .await
    }

    pub async fn messages(
        db: &DatabaseConnection,
        chat_id: Uuid,
    ) -> Result<Vec<chat_message::Model>, DbErr> {
        chat_message::Entity::find()
            .filter(chat_message::Column::ChatId.eq(chat_id))
            .order_by_asc(chat_message::Column::SentAt)
            .all(db)
            .await
    }

    /// The `count` most recent messages, oldest first.
    pub async fn recent_messages(
        db: &DatabaseConnection,
        chat_id: Uuid,
        count: u64,
    ) -> Result<Vec<chat_message::Model>, DbErr> {
        let mut messages = chat_message::Entity::find()
            .filter(chat_message::Column::ChatId.eq(chat_id))
            .order_by_desc(chat_message::Column::SentAt)
            .limit(count)
            .all(db)
            .await?;
        messages.reverse();
        Ok(messages)
    }

    pub async fn count_messages(db: &DatabaseConnection, chat_id: Uuid) -> Result<u64, DbErr> {
        use sea_orm::PaginatorTrait;
        chat_message::Entity::find()
            .filter(chat_message::Column::ChatId.eq(chat_id))
            .count(db)
            .await
    }

    /// Appends a message and bumps the chat's last-message timestamp.
    pub async fn append_message(
        db: &DatabaseConnection,
        chat: &chat::Model,
        role: &str,
        content: String,
    ) -> Result<chat_message::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let message = chat_message::ActiveModel {
            id: Set(Uuid::new_v4()),
            chat_id: Set(chat.id),
            role: Set(role.to_string()),
            content: Set(content),
            sent_at: Set(now),
        }
        .insert(db)
        .await?;

        let mut active: chat::ActiveModel = chat.clone().into();
        active.last_message_at = Set(now);
        active.updated_at = Set(now);
        active.update(db).await?;

        Ok(message)
    }

    pub async fn rename(
        db: &DatabaseConnection,
        chat_id: Uuid,
        student_id: Uuid,
        title: String,
    ) -> Result<chat::Model, ServiceError> {
        let chat = Self::find_for_student(db, chat_id, student_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chat not found"))?;

        let mut active: chat::ActiveModel = chat.into();
        active.title = Set(title.trim().to_string());
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(db).await?)
    }

    /// Soft delete: the row stays for audit, the chat disappears from lists.
    pub async fn soft_delete(
        db: &DatabaseConnection,
        chat_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), ServiceError> {
        let chat = chat::Entity::find_by_id(chat_id)
            .filter(chat::Column::StudentId.eq(student_id))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Chat not found"))?;

        let mut active: chat::ActiveModel = chat.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await?;
        Ok(())
    }
}
