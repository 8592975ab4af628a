use crate::dtos::{SubjectSummary, UserSummary};
use chrono::NaiveDateTime;
use database::entities::class;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub name: String,
    #[serde(rename = "grade")]
    pub grade_label: String,
    pub academic_year: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    #[serde(rename = "grade")]
    pub grade_label: Option<String>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: Uuid,
    pub name: String,
    pub grade: String,
    pub academic_year: String,
    pub is_active: bool,
    pub school_id: Uuid,
    pub created_at: NaiveDateTime,
}

impl From<&class::Model> for ClassResponse {
    fn from(class: &class::Model) -> Self {
        ClassResponse {
            id: class.id,
            name: class.name.clone(),
            grade: class.grade_label.clone(),
            academic_year: class.academic_year.clone(),
            is_active: class.is_active,
            school_id: class.school_id,
            created_at: class.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ClassListQuery {
    #[serde(rename = "grade")]
    pub grade_label: Option<String>,
    pub academic_year: Option<String>,

    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassesPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_classes: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    pub classes: Vec<ClassResponse>,
    pub pagination: ClassesPagination,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassTeacherResponse {
    pub teacher: UserSummary,
    pub subjects: Vec<SubjectSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassStatisticsResponse {
    pub total_exercises: u64,
    pub total_students: u64,
    pub total_teachers: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassDetailResponse {
    pub class: ClassResponse,
    pub teachers: Vec<ClassTeacherResponse>,
    pub statistics: ClassStatisticsResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    pub student_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTeacherRequest {
    pub teacher_id: Uuid,
    pub subject_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentsPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_students: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassStudentsResponse {
    pub students: Vec<UserSummary>,
    pub pagination: StudentsPagination,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassTeachersResponse {
    pub teachers: Vec<ClassTeacherResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedClassResponse {
    pub message: String,
    pub class: ClassResponse,
}
