use crate::dtos::UserSummary;
use chrono::NaiveDateTime;
use database::entities::school;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolRequest {
    pub school_name: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleAccessRequest {
    pub block: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameSchoolRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolResponse {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<&school::Model> for SchoolResponse {
    fn from(school: &school::Model) -> Self {
        SchoolResponse {
            id: school.id,
            name: school.name.clone(),
            is_active: school.is_active,
            blocked_reason: school.blocked_reason.clone(),
            created_at: school.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolStatistics {
    pub total_teachers: u64,
    pub total_students: u64,
    pub total_classes: u64,
    pub total_users: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolDetailResponse {
    pub school: SchoolResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<UserSummary>,
    pub statistics: SchoolStatistics,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSchoolResponse {
    pub message: String,
    pub school: SchoolResponse,
    pub admin: UserSummary,
}
