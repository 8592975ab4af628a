//! Exercise question and answer records.
//!
//! Question lists are stored as JSON columns on the exercise row; answer
//! records are stored as JSON columns on the progress row. Wire names are
//! camelCase to match the HTTP API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Qcm,
    FillBlanks,
}

impl ExerciseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Qcm => "qcm",
            ExerciseKind::FillBlanks => "fill_blanks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcmOption {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcmQuestion {
    pub question_text: String,
    pub options: Vec<QcmOption>,
    #[serde(default = "default_points")]
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blank {
    pub position: u32,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankQuestion {
    pub sentence: String,
    pub blanks: Vec<Blank>,
    #[serde(default = "default_points")]
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

fn default_points() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseMetadata {
    pub instructions: Option<String>,
    /// Estimated completion time in minutes.
    pub estimated_time: u32,
    pub max_attempts: u32,
    pub show_answers_after_completion: bool,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
}

impl Default for ExerciseMetadata {
    fn default() -> Self {
        ExerciseMetadata {
            instructions: None,
            estimated_time: 30,
            max_attempts: 3,
            show_answers_after_completion: true,
            shuffle_questions: false,
            shuffle_options: true,
        }
    }
}

/// Submitted answers for one fill-blank question, one string per blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillBlankSubmission {
    pub blanks: Vec<String>,
}

/// Graded record for one QCM question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcmAnswerRecord {
    pub question_index: usize,
    pub selected_option: Option<Uuid>,
    pub is_correct: bool,
    pub points_earned: f64,
}

/// Graded record for one blank of a fill-blank question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlankAnswerRecord {
    pub blank_index: usize,
    pub student_answer: String,
    pub is_correct: bool,
}

/// Graded record for one fill-blank question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankAnswerRecord {
    pub question_index: usize,
    pub blank_answers: Vec<BlankAnswerRecord>,
    pub points_earned: f64,
}

/// Sum of per-question points for the active question list.
pub fn total_points(qcm: &[QcmQuestion], fill_blanks: &[FillBlankQuestion]) -> f64 {
    let qcm_total: f64 = qcm.iter().map(|q| q.points).sum();
    let fb_total: f64 = fill_blanks.iter().map(|q| q.points).sum();
    qcm_total + fb_total
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_metadata_defaults() {
        let meta: ExerciseMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta.max_attempts, 3);
        assert_eq!(meta.estimated_time, 30);
        assert!(meta.show_answers_after_completion);
        assert!(!meta.shuffle_questions);
    }

    #[test]
    fn test_total_points() {
        let qcm = vec![
            QcmQuestion {
                question_text: "a".into(),
                options: vec![],
                points: 2.0,
                explanation: None,
            },
            QcmQuestion {
                question_text: "b".into(),
                options: vec![],
                points: 3.0,
                explanation: None,
            },
        ];
        assert_eq!(total_points(&qcm, &[]), 5.0);
        assert_eq!(total_points(&[], &[]), 0.0);
    }
}
