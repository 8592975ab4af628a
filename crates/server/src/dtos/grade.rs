use crate::dtos::{ClassSummary, SubjectSummary, UserSummary};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradeRequest {
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub exam_name: String,
    pub exam_type: String,
    pub grade: f64,
    pub coefficient: Option<f64>,
    pub exam_date: Option<DateTime<Utc>>,
    pub trimester: String,
    pub academic_year: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGradeRequest {
    pub grade: Option<f64>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct GradeListQuery {
    pub academic_year: Option<String>,
    pub trimester: Option<String>,
    pub subject: Option<Uuid>,
    pub exam_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeResponse {
    pub id: Uuid,
    pub student: UserSummary,
    pub subject: SubjectSummary,
    pub class: ClassSummary,
    pub teacher: UserSummary,
    pub exam_name: String,
    pub exam_type: String,
    pub grade: f64,
    pub coefficient: f64,
    pub exam_date: NaiveDateTime,
    pub trimester: String,
    pub academic_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub appreciation: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverageResponse {
    pub moyenne: f64,
    pub nombre_notes: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeStatistics {
    pub total_grades: usize,
    pub moyenne_generale: f64,
    /// Keyed by subject name; ordered for stable output.
    pub moyenne_par_matiere: BTreeMap<String, SubjectAverageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentGradesResponse {
    pub grades: Vec<GradeResponse>,
    pub statistics: GradeStatistics,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassGradesResponse {
    pub grades: Vec<GradeResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectReport {
    pub subject: SubjectSummary,
    pub grades: Vec<GradeResponse>,
    pub moyenne: f64,
    pub appreciation: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassSummary>,
}

/// The bulletin: per-subject averages and appreciations plus the overall.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bulletin {
    pub academic_year: String,
    pub trimester: String,
    pub matieres: Vec<SubjectReport>,
    pub moyenne_generale: f64,
    pub appreciation_generale: String,
    pub total_notes: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentReportResponse {
    pub student: ReportStudent,
    pub bulletin: Bulletin,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedGradeResponse {
    pub message: String,
    pub grade: GradeResponse,
}
