use crate::entities::contact;
use crate::error::ServiceError;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
};
use uuid::Uuid;

pub struct ContactService;

impl ContactService {
    pub async fn create(
        db: &DatabaseConnection,
        name: String,
        email: String,
        phone: String,
        message: String,
    ) -> Result<contact::Model, DbErr> {
        contact::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            phone: Set(phone),
            message: Set(message),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<contact::Model>, DbErr> {
        contact::Entity::find()
            .order_by_desc(contact::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<contact::Model>, DbErr> {
        contact::Entity::find_by_id(id).one(db).await
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
        let result = contact::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Contact not found."));
        }
        Ok(())
    }
}
