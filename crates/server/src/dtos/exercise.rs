use crate::dtos::{ClassSummary, SubjectSummary, UserSummary};
use chrono::{DateTime, NaiveDateTime, Utc};
use models::exercise_data::{
    Blank, ExerciseMetadata, FillBlankQuestion, QcmOption, QcmQuestion,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcmOptionInput {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QcmQuestionInput {
    pub question_text: String,
    pub options: Vec<QcmOptionInput>,
    #[serde(default = "default_points")]
    pub points: f64,
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlankInput {
    pub position: u32,
    pub correct_answer: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankQuestionInput {
    pub sentence: String,
    pub blanks: Vec<BlankInput>,
    #[serde(default = "default_points")]
    pub points: f64,
    pub hint: Option<String>,
}

fn default_points() -> f64 {
    1.0
}

impl QcmQuestionInput {
    /// Option ids are assigned server-side at creation time.
    pub fn into_question(self) -> QcmQuestion {
        QcmQuestion {
            question_text: self.question_text,
            options: self
                .options
                .into_iter()
                .map(|option| QcmOption {
                    id: Uuid::new_v4(),
                    text: option.text,
                    is_correct: option.is_correct,
                })
                .collect(),
            points: self.points,
            explanation: self.explanation,
        }
    }
}

impl FillBlankQuestionInput {
    pub fn into_question(self) -> FillBlankQuestion {
        FillBlankQuestion {
            sentence: self.sentence,
            blanks: self
                .blanks
                .into_iter()
                .map(|blank| Blank {
                    position: blank.position,
                    correct_answer: blank.correct_answer,
                })
                .collect(),
            points: self.points,
            hint: self.hint,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: Uuid,
    pub class_id: Uuid,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub qcm_questions: Vec<QcmQuestionInput>,
    #[serde(default)]
    pub fill_blank_questions: Vec<FillBlankQuestionInput>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<ExerciseMetadata>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub is_active: Option<bool>,
    pub qcm_questions: Option<Vec<QcmQuestionInput>>,
    pub fill_blank_questions: Option<Vec<FillBlankQuestionInput>>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<ExerciseMetadata>,
    pub tags: Option<Vec<String>>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseListQuery {
    pub class_id: Option<Uuid>,
    pub subject: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub difficulty: Option<String>,

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
pub struct ExerciseResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: SubjectSummary,
    pub class: ClassSummary,
    pub created_by: UserSummary,
    pub difficulty: String,
    pub total_points: f64,
    #[schema(value_type = Object)]
    pub qcm_questions: Json,
    #[schema(value_type = Object)]
    pub fill_blank_questions: Json,
    #[schema(value_type = Object)]
    pub metadata: Json,
    #[schema(value_type = Object)]
    pub tags: Json,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExercisesPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_exercises: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedExercisesResponse {
    pub exercises: Vec<ExerciseResponse>,
    pub pagination: ExercisesPagination,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetailResponse {
    pub exercise: ExerciseResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_progress: Option<ProgressSnapshot>,
}

/// One graded attempt, as returned to exercise views.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub attempt_number: i32,
    pub total_points_earned: f64,
    pub max_possible_points: f64,
    pub accuracy_percentage: i32,
    pub completed_at: NaiveDateTime,
}

impl From<&database::entities::student_progress::Model> for ProgressSnapshot {
    fn from(progress: &database::entities::student_progress::Model) -> Self {
        ProgressSnapshot {
            attempt_number: progress.attempt_number,
            total_points_earned: progress.total_points_earned,
            max_possible_points: progress.max_possible_points,
            accuracy_percentage: progress.accuracy_percentage,
            completed_at: progress.completed_at,
        }
    }
}

/// `answers` is shaped by the exercise type: a list of selected option ids
/// for QCM, a list of `{ blanks: [...] }` objects for fill-blanks.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitExerciseRequest {
    #[schema(value_type = Object)]
    pub answers: Json,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcomeResponse {
    pub total_points_earned: f64,
    pub max_possible_points: f64,
    pub accuracy_percentage: i32,
    pub attempt_number: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitExerciseResponse {
    pub message: String,
    pub progress: SubmissionOutcomeResponse,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgressQuery {
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseAttemptsResponse {
    pub progress: Vec<AttemptResponse>,
    pub total_attempts: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResponse {
    pub id: Uuid,
    pub attempt_number: i32,
    pub total_points_earned: f64,
    pub max_possible_points: f64,
    pub accuracy_percentage: i32,
    #[schema(value_type = Object)]
    pub qcm_answers: Json,
    #[schema(value_type = Object)]
    pub fill_blank_answers: Json,
    pub completed_at: NaiveDateTime,
}

impl From<&database::entities::student_progress::Model> for AttemptResponse {
    fn from(progress: &database::entities::student_progress::Model) -> Self {
        AttemptResponse {
            id: progress.id,
            attempt_number: progress.attempt_number,
            total_points_earned: progress.total_points_earned,
            max_possible_points: progress.max_possible_points,
            accuracy_percentage: progress.accuracy_percentage,
            qcm_answers: progress.qcm_answers.clone(),
            fill_blank_answers: progress.fill_blank_answers.clone(),
            completed_at: progress.completed_at,
        }
    }
}

/// Student-facing list item: an exercise with the student's own standing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseWithProgressResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub total_points: f64,
    pub created_by: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub student_progress: Option<StudentStanding>,
    /// "completed" once any attempt exists, "pending" otherwise.
    pub status: String,
    pub remaining_attempts: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentStanding {
    pub attempt_number: i32,
    pub score: f64,
    pub accuracy: i32,
    pub completed_at: NaiveDateTime,
    /// "passed" at 50% accuracy or above, "failed" below.
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExercisesBySubjectResponse {
    pub exercises: Vec<ExerciseWithProgressResponse>,
    pub pagination: ExercisesPagination,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedExerciseResponse {
    pub message: String,
    pub exercise: ExerciseResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedExerciseResponse {
    pub message: String,
    pub deleted_progress_records: u64,
}
