//! Exercise scoring engine.
//!
//! Scoring is a pure function of the exercise definition and the submitted
//! answers; recomputing from the same inputs yields the same outcome. Invalid
//! or missing selections score zero, they never fail the submission.

use crate::exercise_data::{
    BlankAnswerRecord, FillBlankAnswerRecord, FillBlankQuestion, FillBlankSubmission,
    QcmAnswerRecord, QcmQuestion,
};
use uuid::Uuid;

/// Aggregate result of grading one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub total_points_earned: f64,
    pub max_possible_points: f64,
    pub accuracy_percentage: i32,
    pub qcm_answers: Vec<QcmAnswerRecord>,
    pub fill_blank_answers: Vec<FillBlankAnswerRecord>,
}

/// Grade a QCM submission: one selected option id per question index.
pub fn score_qcm(questions: &[QcmQuestion], selections: &[Option<Uuid>]) -> Vec<QcmAnswerRecord> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = selections.get(index).copied().flatten();
            let is_correct = selected
                .map(|id| {
                    question
                        .options
                        .iter()
                        .any(|opt| opt.id == id && opt.is_correct)
                })
                .unwrap_or(false);
            QcmAnswerRecord {
                question_index: index,
                selected_option: selected,
                is_correct,
                points_earned: if is_correct { question.points } else { 0.0 },
            }
        })
        .collect()
}

/// Grade a fill-blank submission. Each correct blank earns an equal share of
/// the question's points.
pub fn score_fill_blanks(
    questions: &[FillBlankQuestion],
    submissions: &[FillBlankSubmission],
) -> Vec<FillBlankAnswerRecord> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let submitted = submissions.get(index);
            let blank_count = question.blanks.len();
            let share = if blank_count > 0 {
                question.points / blank_count as f64
            } else {
                0.0
            };

            let mut points_earned = 0.0;
            let blank_answers = question
                .blanks
                .iter()
                .enumerate()
                .map(|(blank_index, blank)| {
                    let answer = submitted
                        .and_then(|s| s.blanks.get(blank_index))
                        .map(String::as_str)
                        .unwrap_or("");
                    let is_correct =
                        normalize_answer(answer) == normalize_answer(&blank.correct_answer);
                    if is_correct {
                        points_earned += share;
                    }
                    BlankAnswerRecord {
                        blank_index,
                        student_answer: answer.to_string(),
                        is_correct,
                    }
                })
                .collect();

            FillBlankAnswerRecord {
                question_index: index,
                blank_answers,
                points_earned,
            }
        })
        .collect()
}

/// Trim and lowercase; no other normalization.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Whether a further attempt is allowed given how many already exist.
pub fn can_attempt(prior_attempts: u64, max_attempts: u32) -> bool {
    prior_attempts < max_attempts as u64
}

/// `round(100 * earned / max)`, defined as 0 when max is 0.
pub fn accuracy_percentage(earned: f64, max: f64) -> i32 {
    if max > 0.0 {
        ((earned / max) * 100.0).round() as i32
    } else {
        0
    }
}

/// Assemble the full outcome from graded QCM records.
pub fn qcm_outcome(records: Vec<QcmAnswerRecord>, max_possible_points: f64) -> ScoreOutcome {
    let earned = records.iter().map(|r| r.points_earned).sum();
    ScoreOutcome {
        total_points_earned: earned,
        max_possible_points,
        accuracy_percentage: accuracy_percentage(earned, max_possible_points),
        qcm_answers: records,
        fill_blank_answers: Vec::new(),
    }
}

/// Assemble the full outcome from graded fill-blank records.
pub fn fill_blank_outcome(
    records: Vec<FillBlankAnswerRecord>,
    max_possible_points: f64,
) -> ScoreOutcome {
    let earned = records.iter().map(|r| r.points_earned).sum();
    ScoreOutcome {
        total_points_earned: earned,
        max_possible_points,
        accuracy_percentage: accuracy_percentage(earned, max_possible_points),
        qcm_answers: Vec::new(),
        fill_blank_answers: records,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exercise_data::{Blank, QcmOption};

    fn qcm_question(points: f64, correct: Uuid, wrong: Uuid) -> QcmQuestion {
        QcmQuestion {
            question_text: "q".into(),
            options: vec![
                QcmOption {
                    id: correct,
                    text: "right".into(),
                    is_correct: true,
                },
                QcmOption {
                    id: wrong,
                    text: "wrong".into(),
                    is_correct: false,
                },
            ],
            points,
            explanation: None,
        }
    }

    #[test]
    fn test_qcm_partial_credit_scenario() {
        // Two questions worth 2 and 3 points; correct answer for Q1 only.
        let (c1, w1) = (Uuid::new_v4(), Uuid::new_v4());
        let (c2, w2) = (Uuid::new_v4(), Uuid::new_v4());
        let questions = vec![qcm_question(2.0, c1, w1), qcm_question(3.0, c2, w2)];

        let records = score_qcm(&questions, &[Some(c1), Some(w2)]);
        let outcome = qcm_outcome(records, 5.0);

        assert_eq!(outcome.total_points_earned, 2.0);
        assert_eq!(outcome.max_possible_points, 5.0);
        assert_eq!(outcome.accuracy_percentage, 40);
        assert!(outcome.qcm_answers[0].is_correct);
        assert!(!outcome.qcm_answers[1].is_correct);
    }

    #[test]
    fn test_qcm_unknown_option_scores_zero() {
        let (c, w) = (Uuid::new_v4(), Uuid::new_v4());
        let questions = vec![qcm_question(4.0, c, w)];

        // An id that is not an option of the question.
        let records = score_qcm(&questions, &[Some(Uuid::new_v4())]);
        assert!(!records[0].is_correct);
        assert_eq!(records[0].points_earned, 0.0);

        // Missing answer entirely.
        let records = score_qcm(&questions, &[]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].selected_option, None);
        assert_eq!(records[0].points_earned, 0.0);
    }

    #[test]
    fn test_fill_blank_normalization() {
        let questions = vec![FillBlankQuestion {
            sentence: "The capital of France is ___.".into(),
            blanks: vec![Blank {
                position: 0,
                correct_answer: "Paris".into(),
            }],
            points: 2.0,
            hint: None,
        }];

        for answer in ["Paris", "  paris  ", "PARIS"] {
            let records = score_fill_blanks(
                &questions,
                &[FillBlankSubmission {
                    blanks: vec![answer.into()],
                }],
            );
            assert!(records[0].blank_answers[0].is_correct, "answer: {answer:?}");
            assert_eq!(records[0].points_earned, 2.0);
        }

        let records = score_fill_blanks(
            &questions,
            &[FillBlankSubmission {
                blanks: vec!["Pariss".into()],
            }],
        );
        assert!(!records[0].blank_answers[0].is_correct);
        assert_eq!(records[0].points_earned, 0.0);
    }

    #[test]
    fn test_fill_blank_fractional_credit() {
        let questions = vec![FillBlankQuestion {
            sentence: "___ and ___".into(),
            blanks: vec![
                Blank {
                    position: 0,
                    correct_answer: "salt".into(),
                },
                Blank {
                    position: 1,
                    correct_answer: "pepper".into(),
                },
            ],
            points: 3.0,
            hint: None,
        }];

        let records = score_fill_blanks(
            &questions,
            &[FillBlankSubmission {
                blanks: vec!["salt".into(), "sugar".into()],
            }],
        );
        assert!((records[0].points_earned - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_bounds() {
        assert_eq!(accuracy_percentage(0.0, 0.0), 0);
        assert_eq!(accuracy_percentage(5.0, 5.0), 100);
        assert_eq!(accuracy_percentage(1.0, 3.0), 33);
        assert_eq!(accuracy_percentage(2.0, 3.0), 67);
    }

    #[test]
    fn test_attempt_limit() {
        // The (N+1)-th submission is rejected once N == max_attempts.
        assert!(can_attempt(0, 3));
        assert!(can_attempt(2, 3));
        assert!(!can_attempt(3, 3));
        assert!(!can_attempt(4, 3));
        assert!(!can_attempt(0, 0));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let (c, w) = (Uuid::new_v4(), Uuid::new_v4());
        let questions = vec![qcm_question(2.0, c, w)];
        let first = score_qcm(&questions, &[Some(c)]);
        let second = score_qcm(&questions, &[Some(c)]);
        assert_eq!(first, second);
    }
}
