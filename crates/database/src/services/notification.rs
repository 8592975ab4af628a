use crate::entities::{notification, notification_read};
use crate::error::ServiceError;
use chrono::{NaiveDateTime, Utc};
use models::role::Role;
use models::visibility::Viewer;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde_json::Value as Json;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub struct NotificationService;

pub struct NewNotification {
    pub title: String,
    pub content: String,
    pub kind: String,
    pub priority: String,
    pub target_audience: String,
    pub target_class_id: Option<Uuid>,
    pub attachments: Json,
    pub publish_date: NaiveDateTime,
    pub expiry_date: Option<NaiveDateTime>,
    pub created_by: Uuid,
}

#[derive(Default)]
pub struct NotificationFilter {
    pub unread_only: bool,
    pub kind: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

#[derive(Default)]
pub struct NotificationChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<String>,
    pub priority: Option<String>,
    pub expiry_date: Option<Option<NaiveDateTime>>,
    pub is_active: Option<bool>,
}

/// Aggregate counters for the admin dashboard.
pub struct NotificationStats {
    pub total: u64,
    pub by_kind: HashMap<String, u64>,
    pub by_priority: HashMap<String, u64>,
    pub by_audience: HashMap<String, u64>,
    pub avg_read_count: u64,
}

impl NotificationService {
    pub async fn create(
        db: &DatabaseConnection,
        new_notification: NewNotification,
    ) -> Result<notification::Model, DbErr> {
        let now = Utc::now().naive_utc();
        notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_notification.title),
            content: Set(new_notification.content),
            kind: Set(new_notification.kind),
            priority: Set(new_notification.priority),
            target_audience: Set(new_notification.target_audience),
            target_class_id: Set(new_notification.target_class_id),
            attachments: Set(new_notification.attachments),
            publish_date: Set(new_notification.publish_date),
            expiry_date: Set(new_notification.expiry_date),
            is_active: Set(true),
            created_by: Set(new_notification.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<notification::Model>, DbErr> {
        notification::Entity::find_by_id(id).one(db).await
    }

    /// Active, published, unexpired notifications as of `now`.
    fn live_condition(now: NaiveDateTime) -> Condition {
        Condition::all()
            .add(notification::Column::IsActive.eq(true))
            .add(notification::Column::PublishDate.lte(now))
            .add(
                Condition::any()
                    .add(notification::Column::ExpiryDate.is_null())
                    .add(notification::Column::ExpiryDate.gte(now)),
            )
    }

    /// Audience restriction for a viewer. Admin and superadmin see all.
    fn audience_condition(viewer: &Viewer) -> Option<Condition> {
        if matches!(viewer.role, Role::Admin | Role::Superadmin) {
            return None;
        }

        let mut audience = Condition::any().add(notification::Column::TargetAudience.eq("all"));
        match viewer.role {
            Role::Student => {
                audience = audience.add(notification::Column::TargetAudience.eq("students"));
                if let Some(class_id) = viewer.student_class_id {
                    audience = audience.add(
                        Condition::all()
                            .add(notification::Column::TargetAudience.eq("specific_class"))
                            .add(notification::Column::TargetClassId.eq(class_id)),
                    );
                }
            }
            Role::Teacher => {
                audience = audience.add(notification::Column::TargetAudience.eq("teachers"));
                if !viewer.teaching_class_ids.is_empty() {
                    audience = audience.add(
                        Condition::all()
                            .add(notification::Column::TargetAudience.eq("specific_class"))
                            .add(
                                notification::Column::TargetClassId
                                    .is_in(viewer.teaching_class_ids.clone()),
                            ),
                    );
                }
            }
            Role::Admin | Role::Superadmin => unreachable!(),
        }
        Some(audience)
    }

    /// Paginated listing for a viewer: temporal gating plus the audience
    /// rule, both expressed in the query.
    pub async fn list_for_viewer(
        db: &DatabaseConnection,
        viewer: &Viewer,
        viewer_id: Uuid,
        filter: NotificationFilter,
        now: NaiveDateTime,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<notification::Model>, u64), DbErr> {
        let mut condition = Self::live_condition(now);
        if let Some(audience) = Self::audience_condition(viewer) {
            condition = condition.add(audience);
        }
        if let Some(kind) = filter.kind {
            condition = condition.add(notification::Column::Kind.eq(kind));
        }
        if let Some(priority) = filter.priority {
            condition = condition.add(notification::Column::Priority.eq(priority));
        }
        if let Some(search) = filter.search {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(notification::Column::Title.like(pattern.clone()))
                    .add(notification::Column::Content.like(pattern)),
            );
        }
        if filter.unread_only {
            let read_ids: Vec<Uuid> = notification_read::Entity::find()
                .filter(notification_read::Column::UserId.eq(viewer_id))
                .all(db)
                .await?
                .into_iter()
                .map(|r| r.notification_id)
                .collect();
            if !read_ids.is_empty() {
                condition = condition.add(notification::Column::Id.is_not_in(read_ids));
            }
        }

        let query = notification::Entity::find()
            .filter(condition)
            .order_by_desc(notification::Column::PublishDate);

        let total = query.clone().count(db).await?;
        let notifications = query.paginate(db, limit).fetch_page(page - 1).await?;
        Ok((notifications, total))
    }

    /// Idempotent: the unique (notification, user) key makes a duplicate
    /// insert a no-op.
    pub async fn mark_read(
        db: &DatabaseConnection,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DbErr> {
        let row = notification_read::ActiveModel {
            id: Set(Uuid::new_v4()),
            notification_id: Set(notification_id),
            user_id: Set(user_id),
            read_at: Set(Utc::now().naive_utc()),
        };

        let insert = notification_read::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    notification_read::Column::NotificationId,
                    notification_read::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(db)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn has_read(
        db: &DatabaseConnection,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DbErr> {
        Ok(notification_read::Entity::find()
            .filter(notification_read::Column::NotificationId.eq(notification_id))
            .filter(notification_read::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .is_some())
    }

    /// Which of the given notifications the user has read.
    pub async fn read_ids(
        db: &DatabaseConnection,
        user_id: Uuid,
        notification_ids: Vec<Uuid>,
    ) -> Result<HashSet<Uuid>, DbErr> {
        if notification_ids.is_empty() {
            return Ok(HashSet::new());
        }
        Ok(notification_read::Entity::find()
            .filter(notification_read::Column::UserId.eq(user_id))
            .filter(notification_read::Column::NotificationId.is_in(notification_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|r| r.notification_id)
            .collect())
    }

    pub async fn update(
        db: &DatabaseConnection,
        notification: notification::Model,
        changes: NotificationChanges,
    ) -> Result<notification::Model, DbErr> {
        let mut active: notification::ActiveModel = notification.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(kind) = changes.kind {
            active.kind = Set(kind);
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority);
        }
        if let Some(expiry_date) = changes.expiry_date {
            active.expiry_date = Set(expiry_date);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await
    }

    /// Removes the row (read receipts cascade) and hands back the
    /// attachment list so the caller can unlink the files.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<Json, ServiceError> {
        let notification = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification not found"))?;

        let attachments = notification.attachments.clone();
        notification::Entity::delete_by_id(id).exec(db).await?;
        Ok(attachments)
    }

    pub async fn stats(
        db: &DatabaseConnection,
        viewer: &Viewer,
        now: NaiveDateTime,
    ) -> Result<NotificationStats, DbErr> {
        let mut condition = Self::live_condition(now);
        if let Some(audience) = Self::audience_condition(viewer) {
            condition = condition.add(audience);
        }

        let notifications = notification::Entity::find()
            .filter(condition)
            .all(db)
            .await?;

        let mut by_kind: HashMap<String, u64> = HashMap::new();
        let mut by_priority: HashMap<String, u64> = HashMap::new();
        let mut by_audience: HashMap<String, u64> = HashMap::new();
        for n in &notifications {
            *by_kind.entry(n.kind.clone()).or_insert(0) += 1;
            *by_priority.entry(n.priority.clone()).or_insert(0) += 1;
            *by_audience.entry(n.target_audience.clone()).or_insert(0) += 1;
        }

        let total = notifications.len() as u64;
        let avg_read_count = if total > 0 {
            let ids: Vec<Uuid> = notifications.iter().map(|n| n.id).collect();
            let reads = notification_read::Entity::find()
                .filter(notification_read::Column::NotificationId.is_in(ids))
                .count(db)
                .await?;
            (reads as f64 / total as f64).round() as u64
        } else {
            0
        };

        Ok(NotificationStats {
            total,
            by_kind,
            by_priority,
            by_audience,
            avg_read_count,
        })
    }
}
