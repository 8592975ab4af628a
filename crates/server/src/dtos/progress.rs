use crate::dtos::{SubjectSummary, UserSummary};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    pub subject: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRef {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub id: Uuid,
    pub exercise: ExerciseRef,
    pub subject: SubjectSummary,
    pub class_id: Uuid,
    pub total_points_earned: f64,
    pub max_possible_points: f64,
    pub accuracy_percentage: i32,
    pub attempt_number: i32,
    pub time_spent_secs: i64,
    pub completed_at: NaiveDateTime,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExercisesByType {
    pub qcm: u64,
    pub fill_blanks: u64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ExercisesByDifficulty {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub total_exercises: u64,
    pub average_accuracy: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatistics {
    pub total_exercises: usize,
    pub average_accuracy: i64,
    pub total_time_spent: i64,
    pub exercises_by_type: ExercisesByType,
    pub exercises_by_difficulty: ExercisesByDifficulty,
    /// Keyed by subject name.
    pub subject_performance: BTreeMap<String, SubjectPerformance>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentOverviewResponse {
    pub progress: Vec<ProgressResponse>,
    pub statistics: ProgressStatistics,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgressGroup {
    pub student: UserSummary,
    pub exercises: Vec<ProgressResponse>,
    pub average_accuracy: i64,
    pub total_exercises: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassProgressResponse {
    pub class_progress: Vec<StudentProgressGroup>,
    pub total_students: usize,
    pub total_exercises_completed: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionStat {
    pub text: String,
    pub count: u64,
    pub is_correct: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalytics {
    pub question_index: usize,
    pub question_text: String,
    pub total_answers: u64,
    pub correct_answers: u64,
    pub accuracy: i32,
    /// Keyed by option id.
    pub option_distribution: BTreeMap<String, OptionStat>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_submissions: usize,
    pub unique_students: usize,
    pub average_score: f64,
    pub average_time_spent: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub student: UserSummary,
    pub accuracy: i32,
    pub time_spent: i64,
    pub completed_at: NaiveDateTime,
    pub attempt_number: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedExercise {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub total_points: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseAnalytics {
    pub overall: OverallStats,
    pub questions: Vec<QuestionAnalytics>,
    pub submissions: Vec<SubmissionSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExerciseAnalyticsResponse {
    pub exercise: AnalyzedExercise,
    pub analytics: ExerciseAnalytics,
}
