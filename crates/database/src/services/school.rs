use crate::entities::{class, school, user};
use crate::error::ServiceError;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

pub struct SchoolService;

/// Head counts shown on the school dashboard.
pub struct SchoolCounters {
    pub total_teachers: u64,
    pub total_students: u64,
    pub total_classes: u64,
}

impl SchoolService {
    /// The deployment hosts a single school; this returns it if bootstrapped.
    pub async fn find(db: &DatabaseConnection) -> Result<Option<school::Model>, DbErr> {
        school::Entity::find().one(db).await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<school::Model>, DbErr> {
        school::Entity::find_by_id(id).one(db).await
    }

    /// One-time bootstrap: creates the school together with its admin
    /// account and links the two.
    pub async fn bootstrap(
        db: &DatabaseConnection,
        school_name: String,
        admin_name: String,
        admin_email: String,
        admin_password_hash: String,
        created_by: Uuid,
    ) -> Result<(school::Model, user::Model), ServiceError> {
        let txn = db.begin().await?;

        if school::Entity::find().one(&txn).await?.is_some() {
            return Err(ServiceError::conflict(
                "A school already exists. Only one school is allowed.",
            ));
        }

        let email = admin_email.trim().to_lowercase();
        let email_taken = user::Entity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(&txn)
            .await?
            .is_some();
        if email_taken {
            return Err(ServiceError::conflict(
                "An account with this email already exists",
            ));
        }

        let now = Utc::now().naive_utc();
        let school = school::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(school_name),
            admin_id: Set(None),
            is_active: Set(true),
            blocked_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let admin = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(admin_name),
            email: Set(email),
            password_hash: Set(admin_password_hash),
            role: Set("admin".to_string()),
            school_id: Set(Some(school.id)),
            student_class_id: Set(None),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut linked: school::ActiveModel = school.into();
        linked.admin_id = Set(Some(admin.id));
        linked.updated_at = Set(Utc::now().naive_utc());
        let school = linked.update(&txn).await?;

        txn.commit().await?;
        Ok((school, admin))
    }

    pub async fn set_access(
        db: &DatabaseConnection,
        block: bool,
        reason: Option<String>,
    ) -> Result<school::Model, ServiceError> {
        let school = Self::find(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("No school found"))?;

        let mut active: school::ActiveModel = school.into();
        active.is_active = Set(!block);
        active.blocked_reason = Set(if block {
            Some(reason.unwrap_or_else(|| "No reason provided".to_string()))
        } else {
            None
        });
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(db).await?)
    }

    pub async fn rename(
        db: &DatabaseConnection,
        name: String,
    ) -> Result<school::Model, ServiceError> {
        let school = Self::find(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("No school found"))?;

        if !school.is_active {
            return Err(ServiceError::validation(
                "Cannot update school name. School is currently blocked.",
            ));
        }

        let mut active: school::ActiveModel = school.into();
        active.name = Set(name);
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(db).await?)
    }

    pub async fn counters(
        db: &DatabaseConnection,
        school_id: Uuid,
    ) -> Result<SchoolCounters, DbErr> {
        let total_teachers = user::Entity::find()
            .filter(user::Column::SchoolId.eq(school_id))
            .filter(user::Column::Role.eq("teacher"))
            .count(db)
            .await?;
        let total_students = user::Entity::find()
            .filter(user::Column::SchoolId.eq(school_id))
            .filter(user::Column::Role.eq("student"))
            .count(db)
            .await?;
        let total_classes = class::Entity::find()
            .filter(class::Column::SchoolId.eq(school_id))
            .count(db)
            .await?;

        Ok(SchoolCounters {
            total_teachers,
            total_students,
            total_classes,
        })
    }
}
