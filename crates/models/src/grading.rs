//! Grade validation, weighted averages and the French appreciation bands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 20.0;
pub const COEFFICIENT_MIN: f64 = 0.1;
pub const COEFFICIENT_MAX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GradeError {
    #[error("La note doit être entre 0 et 20")]
    OutOfRange(f64),
    #[error("La note doit être un nombre entier ou demi-point (ex: 15 ou 15.5)")]
    NotHalfStep(f64),
    #[error("Le coefficient doit être entre 0.1 et 5")]
    CoefficientOutOfRange(f64),
}

/// A grade must lie in [0, 20] in 0.5 steps.
pub fn validate_grade(value: f64) -> Result<(), GradeError> {
    if !(GRADE_MIN..=GRADE_MAX).contains(&value) {
        return Err(GradeError::OutOfRange(value));
    }
    if (value * 2.0).fract() != 0.0 {
        return Err(GradeError::NotHalfStep(value));
    }
    Ok(())
}

pub fn validate_coefficient(value: f64) -> Result<(), GradeError> {
    if !(COEFFICIENT_MIN..=COEFFICIENT_MAX).contains(&value) {
        return Err(GradeError::CoefficientOutOfRange(value));
    }
    Ok(())
}

/// Qualitative label derived from a numeric value on the 0-20 scale.
/// Band lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appreciation {
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Très Bien")]
    TresBien,
    #[serde(rename = "Bien")]
    Bien,
    #[serde(rename = "Assez Bien")]
    AssezBien,
    #[serde(rename = "Passable")]
    Passable,
    #[serde(rename = "Insuffisant")]
    Insuffisant,
    #[serde(rename = "Très Insuffisant")]
    TresInsuffisant,
}

impl Appreciation {
    pub fn from_average(value: f64) -> Appreciation {
        if value >= 18.0 {
            Appreciation::Excellent
        } else if value >= 16.0 {
            Appreciation::TresBien
        } else if value >= 14.0 {
            Appreciation::Bien
        } else if value >= 12.0 {
            Appreciation::AssezBien
        } else if value >= 10.0 {
            Appreciation::Passable
        } else if value >= 6.0 {
            Appreciation::Insuffisant
        } else {
            Appreciation::TresInsuffisant
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Appreciation::Excellent => "Excellent",
            Appreciation::TresBien => "Très Bien",
            Appreciation::Bien => "Bien",
            Appreciation::AssezBien => "Assez Bien",
            Appreciation::Passable => "Passable",
            Appreciation::Insuffisant => "Insuffisant",
            Appreciation::TresInsuffisant => "Très Insuffisant",
        }
    }
}

/// Input record for aggregation: one exam grade with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeRecord {
    pub subject_id: Uuid,
    pub grade: f64,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectAverage {
    pub average: f64,
    pub appreciation: Appreciation,
    pub grade_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    pub overall_average: f64,
    pub overall_appreciation: Appreciation,
    /// Keyed by subject id; BTreeMap keeps iteration order stable no matter
    /// how the input was ordered.
    pub per_subject: BTreeMap<Uuid, SubjectAverage>,
    pub total_grades: usize,
}

/// Round half-up to two decimals. Grades are non-negative so `f64::round`
/// matches the usual half-up convention.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted averages per subject and overall, with appreciation labels.
///
/// Every record is validated first; a single out-of-range grade or
/// coefficient fails the whole call.
pub fn aggregate(records: &[GradeRecord]) -> Result<GradeSummary, GradeError> {
    for record in records {
        validate_grade(record.grade)?;
        validate_coefficient(record.coefficient)?;
    }

    let mut by_subject: BTreeMap<Uuid, Vec<&GradeRecord>> = BTreeMap::new();
    for record in records {
        by_subject.entry(record.subject_id).or_default().push(record);
    }

    let per_subject = by_subject
        .into_iter()
        .map(|(subject_id, grades)| {
            let average = weighted_average(grades.iter().copied());
            (
                subject_id,
                SubjectAverage {
                    average,
                    appreciation: Appreciation::from_average(average),
                    grade_count: grades.len(),
                },
            )
        })
        .collect();

    let overall_average = weighted_average(records.iter());
    Ok(GradeSummary {
        overall_average,
        overall_appreciation: Appreciation::from_average(overall_average),
        per_subject,
        total_grades: records.len(),
    })
}

fn weighted_average<'a>(records: impl Iterator<Item = &'a GradeRecord>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut coefficient_sum = 0.0;
    for record in records {
        weighted_sum += record.grade * record.coefficient;
        coefficient_sum += record.coefficient;
    }
    if coefficient_sum > 0.0 {
        round2(weighted_sum / coefficient_sum)
    } else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(subject_id: Uuid, grade: f64, coefficient: f64) -> GradeRecord {
        GradeRecord {
            subject_id,
            grade,
            coefficient,
        }
    }

    #[test]
    fn test_validate_grade() {
        assert!(validate_grade(0.0).is_ok());
        assert!(validate_grade(15.5).is_ok());
        assert!(validate_grade(20.0).is_ok());
        assert_eq!(validate_grade(20.5), Err(GradeError::OutOfRange(20.5)));
        assert_eq!(validate_grade(-1.0), Err(GradeError::OutOfRange(-1.0)));
        assert_eq!(validate_grade(15.25), Err(GradeError::NotHalfStep(15.25)));
    }

    #[test]
    fn test_validate_coefficient() {
        assert!(validate_coefficient(0.1).is_ok());
        assert!(validate_coefficient(5.0).is_ok());
        assert_eq!(
            validate_coefficient(0.05),
            Err(GradeError::CoefficientOutOfRange(0.05))
        );
        assert_eq!(
            validate_coefficient(6.0),
            Err(GradeError::CoefficientOutOfRange(6.0))
        );
    }

    #[test]
    fn test_banding_lower_bounds_inclusive() {
        assert_eq!(Appreciation::from_average(18.0), Appreciation::Excellent);
        assert_eq!(Appreciation::from_average(17.5), Appreciation::TresBien);
        assert_eq!(Appreciation::from_average(16.0), Appreciation::TresBien);
        assert_eq!(Appreciation::from_average(14.0), Appreciation::Bien);
        assert_eq!(Appreciation::from_average(12.0), Appreciation::AssezBien);
        assert_eq!(Appreciation::from_average(10.0), Appreciation::Passable);
        assert_eq!(Appreciation::from_average(6.0), Appreciation::Insuffisant);
        assert_eq!(
            Appreciation::from_average(5.5),
            Appreciation::TresInsuffisant
        );
    }

    #[test]
    fn test_weighted_average_scenario() {
        // (15, coef 2) and (10, coef 1) in the same subject -> 13.33, "Bien".
        let subject = Uuid::new_v4();
        let records = vec![record(subject, 15.0, 2.0), record(subject, 10.0, 1.0)];
        let summary = aggregate(&records).unwrap();

        let subject_avg = summary.per_subject[&subject];
        assert_eq!(subject_avg.average, 13.33);
        assert_eq!(subject_avg.appreciation, Appreciation::Bien);
        assert_eq!(summary.overall_average, 13.33);
    }

    #[test]
    fn test_order_independence() {
        let maths = Uuid::new_v4();
        let french = Uuid::new_v4();
        let mut records = vec![
            record(maths, 15.0, 2.0),
            record(french, 8.5, 1.0),
            record(maths, 10.0, 1.0),
            record(french, 12.0, 3.0),
        ];

        let forward = aggregate(&records).unwrap();
        records.reverse();
        let backward = aggregate(&records).unwrap();

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_invalid_record_rejects_whole_batch() {
        let subject = Uuid::new_v4();
        let records = vec![record(subject, 15.0, 2.0), record(subject, 21.0, 1.0)];
        assert_eq!(aggregate(&records), Err(GradeError::OutOfRange(21.0)));
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[]).unwrap();
        assert_eq!(summary.overall_average, 0.0);
        assert_eq!(summary.total_grades, 0);
        assert!(summary.per_subject.is_empty());
    }

    #[test]
    fn test_appreciation_labels() {
        let json = serde_json::to_string(&Appreciation::TresBien).unwrap();
        assert_eq!(json, "\"Très Bien\"");
        assert_eq!(Appreciation::TresInsuffisant.as_str(), "Très Insuffisant");
    }
}
