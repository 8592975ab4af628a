use crate::auth::CurrentUser;
use crate::dtos::notification::{
    CreatedNotificationResponse, NotificationDetailResponse, NotificationForm,
    NotificationListQuery, NotificationResponse, NotificationStatsResponse,
    NotificationsPagination, PaginatedNotificationsResponse, UpdateNotificationRequest,
};
use crate::dtos::{ClassSummary, MessageResponse, UserSummary};
use crate::error::ApiError;
use crate::lookup;
use crate::state::AppState;
use crate::uploads::{MAX_ATTACHMENTS, StoredAttachment};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use database::entities::notification;
use database::services::notification::{
    NewNotification, NotificationChanges, NotificationFilter, NotificationService,
};
use database::services::user::UserService;
use models::role::Role;
use models::visibility::{TargetAudience, Viewer, is_visible};
use serde_json::json;
use std::collections::HashSet;
use uuid::Uuid;

fn parse_audience(audience: &str) -> Result<TargetAudience, ApiError> {
    match audience {
        "all" => Ok(TargetAudience::All),
        "students" => Ok(TargetAudience::Students),
        "teachers" => Ok(TargetAudience::Teachers),
        "specific_class" => Ok(TargetAudience::SpecificClass),
        _ => Err(ApiError::validation("Invalid target audience")),
    }
}

async fn viewer_for(state: &AppState, current: &CurrentUser) -> Result<Viewer, ApiError> {
    let teaching_class_ids = if current.role == Role::Teacher {
        UserService::teaching_class_ids(&state.db, current.user.id).await?
    } else {
        Vec::new()
    };
    Ok(Viewer {
        role: current.role,
        student_class_id: current.user.student_class_id,
        teaching_class_ids,
    })
}

/// The audience rule, applied to a single loaded notification.
fn check_visible(viewer: &Viewer, notification: &notification::Model) -> Result<(), ApiError> {
    let audience = parse_audience(&notification.target_audience)?;
    if is_visible(viewer, audience, notification.target_class_id) {
        Ok(())
    } else {
        Err(ApiError::authorization(
            "You do not have access to this notification",
        ))
    }
}

fn attachments_of(notification: &notification::Model) -> Vec<StoredAttachment> {
    serde_json::from_value(notification.attachments.clone()).unwrap_or_default()
}

async fn to_responses(
    state: &AppState,
    user_id: Uuid,
    notifications: &[notification::Model],
    now: NaiveDateTime,
) -> Result<Vec<NotificationResponse>, ApiError> {
    let classes = lookup::classes_by_id(
        &state.db,
        notifications.iter().filter_map(|n| n.target_class_id).collect(),
    )
    .await?;
    let creators = lookup::users_by_id(
        &state.db,
        notifications.iter().map(|n| n.created_by).collect(),
    )
    .await?;
    let read: HashSet<Uuid> = NotificationService::read_ids(
        &state.db,
        user_id,
        notifications.iter().map(|n| n.id).collect(),
    )
    .await?;

    notifications
        .iter()
        .map(|n| {
            let creator = creators
                .get(&n.created_by)
                .ok_or_else(|| ApiError::internal("notification creator missing".to_string()))?;
            Ok(NotificationResponse {
                id: n.id,
                title: n.title.clone(),
                content: n.content.clone(),
                kind: n.kind.clone(),
                priority: n.priority.clone(),
                target_audience: n.target_audience.clone(),
                target_class: n
                    .target_class_id
                    .and_then(|id| classes.get(&id))
                    .map(ClassSummary::from),
                attachments: attachments_of(n),
                publish_date: n.publish_date,
                expiry_date: n.expiry_date,
                is_active: n.is_active,
                is_expired: n.expiry_date.map(|e| e < now).unwrap_or(false),
                is_read: read.contains(&n.id),
                created_by: UserSummary::from(creator),
                created_at: n.created_at,
            })
        })
        .collect()
}

/// Create a notification; up to five PDF/Excel/image attachments
#[utoipa::path(
    post,
    path = "/api/notifications",
    responses(
        (status = 201, description = "Notification created", body = CreatedNotificationResponse),
        (status = 400, description = "Missing fields or attachment rejected"),
        (status = 403, description = "Teacher can only target classes they teach")
    ),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    current: CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedNotificationResponse>), ApiError> {
    current.require_role(Role::Teacher)?;

    let mut form = NotificationForm::default();
    let mut files: Vec<(String, String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "attachments" => {
                if files.len() >= MAX_ATTACHMENTS {
                    return Err(ApiError::validation("At most 5 attachments are allowed"));
                }
                let original_name = field.file_name().unwrap_or("attachment").to_string();
                let mimetype = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file: {e}")))?;
                files.push((original_name, mimetype, bytes.to_vec()));
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Malformed field: {e}")))?;
                match name.as_str() {
                    "title" => form.title = Some(value),
                    "content" => form.content = Some(value),
                    "type" => form.kind = Some(value),
                    "priority" => form.priority = Some(value),
                    "targetAudience" => form.target_audience = Some(value),
                    "targetClass" => {
                        form.target_class = Some(value.parse().map_err(|_| {
                            ApiError::validation("targetClass must be a valid id")
                        })?)
                    }
                    "publishDate" => {
                        form.publish_date =
                            Some(value.parse::<DateTime<Utc>>().map_err(|_| {
                                ApiError::validation("publishDate must be a date")
                            })?)
                    }
                    "expiryDate" => {
                        form.expiry_date =
                            Some(value.parse::<DateTime<Utc>>().map_err(|_| {
                                ApiError::validation("expiryDate must be a date")
                            })?)
                    }
                    _ => {}
                }
            }
        }
    }

    let title = form.title.filter(|t| !t.trim().is_empty());
    let content = form.content.filter(|c| !c.trim().is_empty());
    let (Some(title), Some(content), Some(target_audience)) =
        (title, content, form.target_audience)
    else {
        return Err(ApiError::validation(
            "Title, content, and target audience are required",
        ));
    };
    let audience = parse_audience(&target_audience)?;

    let target_class_id = match audience {
        TargetAudience::SpecificClass => Some(form.target_class.ok_or_else(|| {
            ApiError::validation("targetClass is required for specific_class notifications")
        })?),
        _ => None,
    };

    // Teachers can only address classes they actually teach.
    if current.role == Role::Teacher && audience == TargetAudience::SpecificClass {
        let teaching = UserService::teaching_class_ids(&state.db, current.user.id).await?;
        if !teaching.contains(&target_class_id.unwrap()) {
            return Err(ApiError::authorization(
                "You can only create notifications for classes you teach",
            ));
        }
    }

    state
        .uploads
        .ensure_dirs()
        .await
        .map_err(|e| ApiError::internal(format!("upload directory unavailable: {e}")))?;
    let mut attachments = Vec::new();
    for (original_name, mimetype, bytes) in &files {
        attachments.push(state.uploads.save(original_name, mimetype, bytes).await?);
    }

    let now = Utc::now().naive_utc();
    let notification = NotificationService::create(
        &state.db,
        NewNotification {
            title,
            content,
            kind: form.kind.unwrap_or_else(|| "general".to_string()),
            priority: form.priority.unwrap_or_else(|| "medium".to_string()),
            target_audience,
            target_class_id,
            attachments: serde_json::to_value(&attachments).unwrap_or_else(|_| json!([])),
            publish_date: form.publish_date.map(|d| d.naive_utc()).unwrap_or(now),
            expiry_date: form.expiry_date.map(|d| d.naive_utc()),
            created_by: current.user.id,
        },
    )
    .await?;

    let response = to_responses(&state, current.user.id, std::slice::from_ref(&notification), now)
        .await?
        .remove(0);
    Ok((
        StatusCode::CREATED,
        Json(CreatedNotificationResponse {
            message: "Notification created successfully".to_string(),
            notification: response,
        }),
    ))
}

/// Notifications visible to the requester, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationListQuery),
    responses((status = 200, description = "Notifications", body = PaginatedNotificationsResponse)),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<PaginatedNotificationsResponse>, ApiError> {
    let viewer = viewer_for(&state, &current).await?;
    let now = Utc::now().naive_utc();

    let (notifications, total) = NotificationService::list_for_viewer(
        &state.db,
        &viewer,
        current.user.id,
        NotificationFilter {
            unread_only: query.unread_only,
            kind: query.kind,
            priority: query.priority,
            search: query.search,
        },
        now,
        query.page,
        query.limit,
    )
    .await?;

    let mut responses = to_responses(&state, current.user.id, &notifications, now).await?;
    match query.status.as_deref() {
        Some("active") => responses.retain(|n| !n.is_expired),
        Some("expired") => responses.retain(|n| n.is_expired),
        _ => {}
    }

    Ok(Json(PaginatedNotificationsResponse {
        notifications: responses,
        pagination: NotificationsPagination {
            current_page: query.page,
            total_pages: total.div_ceil(query.limit),
            total_notifications: total,
        },
    }))
}

/// Aggregate counters (admin or higher)
#[utoipa::path(
    get,
    path = "/api/notifications/stats",
    responses((status = 200, description = "Statistics", body = NotificationStatsResponse)),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn notification_stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<NotificationStatsResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let viewer = viewer_for(&state, &current).await?;
    let stats = NotificationService::stats(&state.db, &viewer, Utc::now().naive_utc()).await?;
    Ok(Json(NotificationStatsResponse {
        total: stats.total,
        by_type: stats.by_kind,
        by_priority: stats.by_priority,
        by_audience: stats.by_audience,
        avg_read_count: stats.avg_read_count,
    }))
}

/// One notification; fetching it marks it read
#[utoipa::path(
    get,
    path = "/api/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification", body = NotificationDetailResponse),
        (status = 403, description = "Not in the target audience"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn get_notification(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationDetailResponse>, ApiError> {
    let notification = NotificationService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    let viewer = viewer_for(&state, &current).await?;
    check_visible(&viewer, &notification)?;

    NotificationService::mark_read(&state.db, id, current.user.id).await?;

    let response = to_responses(
        &state,
        current.user.id,
        std::slice::from_ref(&notification),
        Utc::now().naive_utc(),
    )
    .await?
    .remove(0);
    Ok(Json(NotificationDetailResponse {
        notification: response,
    }))
}

/// Mark as read (idempotent)
#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read", body = MessageResponse),
        (status = 403, description = "Not in the target audience"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn mark_as_read(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let notification = NotificationService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    let viewer = viewer_for(&state, &current).await?;
    check_visible(&viewer, &notification)?;

    NotificationService::mark_read(&state.db, id, current.user.id).await?;
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

/// Update a notification (creator teacher or admin)
#[utoipa::path(
    put,
    path = "/api/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    request_body = UpdateNotificationRequest,
    responses(
        (status = 200, description = "Notification updated", body = NotificationDetailResponse),
        (status = 403, description = "You can only update notifications you created"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn update_notification(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNotificationRequest>,
) -> Result<Json<NotificationDetailResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let notification = NotificationService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    if current.role == Role::Teacher && notification.created_by != current.user.id {
        return Err(ApiError::authorization(
            "You can only update notifications you created",
        ));
    }

    let updated = NotificationService::update(
        &state.db,
        notification,
        NotificationChanges {
            title: body.title,
            content: body.content,
            kind: body.kind,
            priority: body.priority,
            expiry_date: body.expiry_date.map(|d| Some(d.naive_utc())),
            is_active: body.is_active,
        },
    )
    .await?;

    let response = to_responses(
        &state,
        current.user.id,
        std::slice::from_ref(&updated),
        Utc::now().naive_utc(),
    )
    .await?
    .remove(0);
    Ok(Json(NotificationDetailResponse {
        notification: response,
    }))
}

/// Delete a notification and its stored attachments (admin only)
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let attachments_json = NotificationService::delete(&state.db, id).await?;
    let attachments: Vec<StoredAttachment> =
        serde_json::from_value(attachments_json).unwrap_or_default();
    for attachment in &attachments {
        state.uploads.remove(&attachment.filename).await;
    }

    Ok(Json(MessageResponse::new(
        "Notification deleted successfully",
    )))
}

async fn load_attachment(
    state: &AppState,
    current: &CurrentUser,
    id: Uuid,
    filename: &str,
) -> Result<(StoredAttachment, Vec<u8>), ApiError> {
    let notification = NotificationService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    let viewer = viewer_for(state, current).await?;
    check_visible(&viewer, &notification)?;

    let attachment = attachments_of(&notification)
        .into_iter()
        .find(|a| a.filename == filename)
        .ok_or_else(|| ApiError::not_found("Attachment not found"))?;

    let bytes = state.uploads.read(&attachment.filename).await?;
    Ok((attachment, bytes))
}

/// Serve an attachment inline
#[utoipa::path(
    get,
    path = "/api/notifications/{id}/attachments/{filename}",
    params(
        ("id" = Uuid, Path, description = "Notification ID"),
        ("filename" = String, Path, description = "Stored attachment name")
    ),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn view_attachment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((id, filename)): Path<(Uuid, String)>,
) -> Result<Response, ApiError> {
    let (attachment, bytes) = load_attachment(&state, &current, id, &filename).await?;
    Ok((
        [
            (CONTENT_TYPE, attachment.mimetype.clone()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", attachment.original_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Serve an attachment as a download
#[utoipa::path(
    get,
    path = "/api/notifications/{id}/attachments/{filename}/download",
    params(
        ("id" = Uuid, Path, description = "Notification ID"),
        ("filename" = String, Path, description = "Stored attachment name")
    ),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer" = [])),
    tag = "Notifications"
)]
pub async fn download_attachment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((id, filename)): Path<(Uuid, String)>,
) -> Result<Response, ApiError> {
    let (attachment, bytes) = load_attachment(&state, &current, id, &filename).await?;
    Ok((
        [
            (CONTENT_TYPE, attachment.mimetype.clone()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", attachment.original_name),
            ),
        ],
        bytes,
    )
        .into_response())
}
