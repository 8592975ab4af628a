use chrono::NaiveDateTime;
use database::entities::subject;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub description: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<&subject::Model> for SubjectResponse {
    fn from(subject: &subject::Model) -> Self {
        SubjectResponse {
            id: subject.id,
            name: subject.name.clone(),
            description: subject.description.clone(),
            image_path: subject.image_path.clone(),
            created_at: subject.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectListResponse {
    pub subjects: Vec<SubjectResponse>,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStatistics {
    pub classes_using_subject: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectDetailResponse {
    pub subject: SubjectResponse,
    pub statistics: SubjectStatistics,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedSubjectResponse {
    pub message: String,
    pub subject: SubjectResponse,
}
