use crate::dtos::{ClassSummary, UserSummary};
use crate::uploads::StoredAttachment;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Text parts of the multipart create request; files arrive as
/// `attachments` parts alongside these fields.
#[derive(Debug, Default)]
pub struct NotificationForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<String>,
    pub priority: Option<String>,
    pub target_audience: Option<String>,
    pub target_class: Option<Uuid>,
    pub publish_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub priority: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub priority: Option<String>,
    /// "active" or "expired".
    pub status: Option<String>,
    pub search: Option<String>,

    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    pub target_audience: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_class: Option<ClassSummary>,
    pub attachments: Vec<StoredAttachment>,
    pub publish_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDateTime>,
    pub is_active: bool,
    pub is_expired: bool,
    pub is_read: bool,
    pub created_by: UserSummary,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_notifications: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedNotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
    pub pagination: NotificationsPagination,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatsResponse {
    pub total: u64,
    pub by_type: HashMap<String, u64>,
    pub by_priority: HashMap<String, u64>,
    pub by_audience: HashMap<String, u64>,
    pub avg_read_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedNotificationResponse {
    pub message: String,
    pub notification: NotificationResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationDetailResponse {
    pub notification: NotificationResponse,
}
