use crate::entities::{teacher_subject, user};
use crate::error::ServiceError;
use chrono::Utc;
use models::access::TeachingLink;
use models::role::Role;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

pub struct UserService;

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub school_id: Option<Uuid>,
    pub created_by: Uuid,
}

#[derive(Default)]
pub struct UserListFilter {
    pub school_id: Option<Uuid>,
    pub role: Option<Role>,
}

impl UserService {
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }

    pub async fn create(
        db: &DatabaseConnection,
        new_user: NewUser,
    ) -> Result<user::Model, ServiceError> {
        let email = new_user.email.trim().to_lowercase();
        if Self::find_by_email(db, &email).await?.is_some() {
            return Err(ServiceError::conflict(
                "User with this email already exists",
            ));
        }

        let now = Utc::now().naive_utc();
        let user = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            school_id: Set(new_user.school_id),
            student_class_id: Set(None),
            created_by: Set(Some(new_user.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Ok(user)
    }

    pub async fn list(
        db: &DatabaseConnection,
        filter: UserListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<user::Model>, u64), DbErr> {
        let mut condition = Condition::all();
        if let Some(school_id) = filter.school_id {
            condition = condition.add(user::Column::SchoolId.eq(school_id));
        }
        if let Some(role) = filter.role {
            condition = condition.add(user::Column::Role.eq(role.as_str()));
        }

        let query = user::Entity::find()
            .filter(condition)
            .order_by_desc(user::Column::CreatedAt);

        let total = query.clone().count(db).await?;
        let users = query.paginate(db, limit).fetch_page(page - 1).await?;
        Ok((users, total))
    }

    pub async fn update_profile(
        db: &DatabaseConnection,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<user::Model, ServiceError> {
        let user = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        let mut active: user::ActiveModel = user.into();
        if let Some(email) = email {
            let email = email.trim().to_lowercase();
            let taken = user::Entity::find()
                .filter(user::Column::Email.eq(email.clone()))
                .filter(user::Column::Id.ne(id))
                .one(db)
                .await?
                .is_some();
            if taken {
                return Err(ServiceError::conflict("Email already in use"));
            }
            active.email = Set(email);
        }
        if let Some(name) = name {
            active.name = Set(name);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        Ok(active.update(db).await?)
    }

    pub async fn set_password_hash(
        db: &DatabaseConnection,
        user: user::Model,
        password_hash: String,
    ) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await
    }

    pub async fn count_admins(db: &DatabaseConnection) -> Result<u64, DbErr> {
        user::Entity::find()
            .filter(user::Column::Role.eq("admin"))
            .count(db)
            .await
    }

    /// Deletes a user. Teaching assignments, grades and progress rows go
    /// with it through foreign keys; the last admin account is protected.
    pub async fn delete(db: &DatabaseConnection, user: user::Model) -> Result<(), ServiceError> {
        if user.role == "admin" && Self::count_admins(db).await? == 1 {
            return Err(ServiceError::validation(
                "Cannot delete the only admin account",
            ));
        }

        user::Entity::delete_by_id(user.id).exec(db).await?;
        Ok(())
    }

    /// All (class, subject) pairs the teacher currently teaches.
    pub async fn teaching_links(
        db: &DatabaseConnection,
        teacher_id: Uuid,
    ) -> Result<Vec<TeachingLink>, DbErr> {
        let rows = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::TeacherId.eq(teacher_id))
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| TeachingLink {
                class_id: row.class_id,
                subject_id: row.subject_id,
            })
            .collect())
    }

    /// Distinct classes the teacher teaches in.
    pub async fn teaching_class_ids(
        db: &DatabaseConnection,
        teacher_id: Uuid,
    ) -> Result<Vec<Uuid>, DbErr> {
        let links = Self::teaching_links(db, teacher_id).await?;
        let mut class_ids: Vec<Uuid> = links.into_iter().map(|l| l.class_id).collect();
        class_ids.sort();
        class_ids.dedup();
        Ok(class_ids)
    }
}
