use crate::entities::{subject, teacher_subject};
use crate::error::ServiceError;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

pub struct SubjectService;

impl SubjectService {
    async fn find_by_name_ci(
        db: &DatabaseConnection,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<subject::Model>, DbErr> {
        let mut query = subject::Entity::find().filter(
            Expr::expr(Func::lower(Expr::col(subject::Column::Name)))
                .eq(name.trim().to_lowercase()),
        );
        if let Some(id) = exclude {
            query = query.filter(subject::Column::Id.ne(id));
        }
        query.one(db).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        name: String,
        description: String,
        image_path: Option<String>,
    ) -> Result<subject::Model, ServiceError> {
        if Self::find_by_name_ci(db, &name, None).await?.is_some() {
            return Err(ServiceError::conflict(
                "Subject with this name already exists",
            ));
        }

        let now = Utc::now().naive_utc();
        let subject = subject::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            description: Set(description),
            image_path: Set(image_path),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        Ok(subject)
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<subject::Model>, DbErr> {
        subject::Entity::find()
            .order_by_asc(subject::Column::Name)
            .all(db)
            .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<subject::Model>, DbErr> {
        subject::Entity::find_by_id(id).one(db).await
    }

    /// How many classes reference the subject through teaching assignments.
    pub async fn usage_count(db: &DatabaseConnection, id: Uuid) -> Result<u64, DbErr> {
        let mut class_ids: Vec<Uuid> = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::SubjectId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.class_id)
            .collect();
        class_ids.sort();
        class_ids.dedup();
        Ok(class_ids.len() as u64)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        image_path: Option<Option<String>>,
    ) -> Result<subject::Model, ServiceError> {
        let subject = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subject not found"))?;

        let mut active: subject::ActiveModel = subject.into();
        if let Some(name) = name {
            if Self::find_by_name_ci(db, &name, Some(id)).await?.is_some() {
                return Err(ServiceError::conflict(
                    "Subject with this name already exists",
                ));
            }
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        if let Some(image_path) = image_path {
            active.image_path = Set(image_path);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(db).await?)
    }

    /// Refused while any class still references the subject.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let in_use = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::SubjectId.eq(id))
            .count(db)
            .await?
            > 0;
        if in_use {
            return Err(ServiceError::validation(
                "Cannot delete subject. It is being used in one or more classes.",
            ));
        }

        let result = subject::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Subject not found"));
        }
        Ok(())
    }
}
