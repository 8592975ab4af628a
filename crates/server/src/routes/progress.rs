use crate::auth::CurrentUser;
use crate::dtos::progress::{
    AnalyzedExercise, ClassProgressResponse, ExerciseAnalytics, ExerciseAnalyticsResponse,
    ExerciseRef, ExercisesByDifficulty, ExercisesByType, OptionStat, OverallStats,
    ProgressQuery, ProgressResponse, ProgressStatistics, QuestionAnalytics,
    StudentOverviewResponse, StudentProgressGroup, SubjectPerformance, SubmissionSummary,
};
use crate::dtos::{MessageResponse, SubjectSummary, UserSummary};
use crate::error::ApiError;
use crate::lookup;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use database::entities::student_progress;
use database::services::class::ClassService;
use database::services::exercise::ExerciseService;
use database::services::progress::{ProgressFilter, ProgressService};
use database::services::user::UserService;
use models::access::{require_owner, require_teaches_class};
use models::exercise_data::QcmAnswerRecord;
use models::role::Role;
use models::scoring::accuracy_percentage;
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

fn to_filter(query: ProgressQuery) -> ProgressFilter {
    ProgressFilter {
        subject_id: query.subject,
        class_id: query.class_id,
        exercise_id: query.exercise_id,
        date_from: query.date_from.map(|d| d.naive_utc()),
        date_to: query.date_to.map(|d| d.naive_utc()),
    }
}

async fn to_responses(
    state: &AppState,
    rows: &[student_progress::Model],
) -> Result<Vec<ProgressResponse>, ApiError> {
    let exercises =
        lookup::exercises_by_id(&state.db, rows.iter().map(|p| p.exercise_id).collect()).await?;
    let subjects =
        lookup::subjects_by_id(&state.db, rows.iter().map(|p| p.subject_id).collect()).await?;

    rows.iter()
        .map(|p| {
            let exercise = exercises
                .get(&p.exercise_id)
                .ok_or_else(|| ApiError::internal("progress exercise missing".to_string()))?;
            let subject = subjects
                .get(&p.subject_id)
                .ok_or_else(|| ApiError::internal("progress subject missing".to_string()))?;
            Ok(ProgressResponse {
                id: p.id,
                exercise: ExerciseRef {
                    id: exercise.id,
                    title: exercise.title.clone(),
                    kind: exercise.kind.clone(),
                    difficulty: exercise.difficulty.clone(),
                },
                subject: SubjectSummary::from(subject),
                class_id: p.class_id,
                total_points_earned: p.total_points_earned,
                max_possible_points: p.max_possible_points,
                accuracy_percentage: p.accuracy_percentage,
                attempt_number: p.attempt_number,
                time_spent_secs: p.time_spent_secs,
                completed_at: p.completed_at,
            })
        })
        .collect()
}

fn overview_statistics(progress: &[ProgressResponse]) -> ProgressStatistics {
    let mut by_type = ExercisesByType::default();
    let mut by_difficulty = ExercisesByDifficulty::default();
    let mut accuracy_sum: i64 = 0;
    let mut time_spent: i64 = 0;
    let mut per_subject: BTreeMap<String, (u64, i64)> = BTreeMap::new();

    for p in progress {
        accuracy_sum += p.accuracy_percentage as i64;
        time_spent += p.time_spent_secs;
        match p.exercise.kind.as_str() {
            "qcm" => by_type.qcm += 1,
            "fill_blanks" => by_type.fill_blanks += 1,
            _ => {}
        }
        match p.exercise.difficulty.as_str() {
            "easy" => by_difficulty.easy += 1,
            "medium" => by_difficulty.medium += 1,
            "hard" => by_difficulty.hard += 1,
            _ => {}
        }
        let entry = per_subject.entry(p.subject.name.clone()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += p.accuracy_percentage as i64;
    }

    let average_accuracy = if progress.is_empty() {
        0
    } else {
        (accuracy_sum as f64 / progress.len() as f64).round() as i64
    };

    ProgressStatistics {
        total_exercises: progress.len(),
        average_accuracy,
        total_time_spent: time_spent,
        exercises_by_type: by_type,
        exercises_by_difficulty: by_difficulty,
        subject_performance: per_subject
            .into_iter()
            .map(|(name, (count, accuracy))| {
                (
                    name,
                    SubjectPerformance {
                        total_exercises: count,
                        average_accuracy: (accuracy as f64 / count as f64).round() as i64,
                    },
                )
            })
            .collect(),
    }
}

/// A student's submission history with summary statistics
#[utoipa::path(
    get,
    path = "/api/progress/student/{studentId}",
    params(("studentId" = Uuid, Path, description = "Student ID"), ProgressQuery),
    responses(
        (status = 200, description = "Progress overview", body = StudentOverviewResponse),
        (status = 403, description = "Not your progress to read"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer" = [])),
    tag = "Progress"
)]
pub async fn student_overview(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(student_id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<StudentOverviewResponse>, ApiError> {
    let student_class = match current.role {
        Role::Teacher => {
            UserService::find_by_id(&state.db, student_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Student not found"))?
                .student_class_id
        }
        _ => None,
    };
    let links = match current.role {
        Role::Teacher => UserService::teaching_links(&state.db, current.user.id).await?,
        _ => Vec::new(),
    };
    models::access::can_view_student_data(&current.actor(), student_id, student_class, &links)?;

    let rows = ProgressService::list_by_student(&state.db, student_id, to_filter(query)).await?;
    let progress = to_responses(&state, &rows).await?;
    let statistics = overview_statistics(&progress);

    Ok(Json(StudentOverviewResponse {
        progress,
        statistics,
    }))
}

/// Submissions across a class, grouped per student
#[utoipa::path(
    get,
    path = "/api/progress/class/{classId}",
    params(("classId" = Uuid, Path, description = "Class ID"), ProgressQuery),
    responses(
        (status = 200, description = "Class progress", body = ClassProgressResponse),
        (status = 403, description = "Not a teacher of this class")
    ),
    security(("bearer" = [])),
    tag = "Progress"
)]
pub async fn class_progress(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(class_id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ClassProgressResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let class = ClassService::find_by_id(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    if current.role == Role::Teacher {
        let links = UserService::teaching_links(&state.db, current.user.id).await?;
        require_teaches_class(&links, class_id)?;
    }

    let rows = ProgressService::list_by_class(&state.db, class_id, to_filter(query)).await?;
    let students =
        lookup::users_by_id(&state.db, rows.iter().map(|p| p.student_id).collect()).await?;
    let responses = to_responses(&state, &rows).await?;

    let mut groups: HashMap<Uuid, (Vec<ProgressResponse>, i64)> = HashMap::new();
    for (row, response) in rows.iter().zip(responses) {
        let entry = groups.entry(row.student_id).or_insert((Vec::new(), 0));
        entry.1 += response.accuracy_percentage as i64;
        entry.0.push(response);
    }

    let total_exercises_completed = rows.len();
    let mut class_progress: Vec<StudentProgressGroup> = groups
        .into_iter()
        .filter_map(|(student_id, (exercises, accuracy_sum))| {
            let student = students.get(&student_id)?;
            let total = exercises.len();
            Some(StudentProgressGroup {
                student: UserSummary::from(student),
                average_accuracy: (accuracy_sum as f64 / total as f64).round() as i64,
                total_exercises: total,
                exercises,
            })
        })
        .collect();
    class_progress.sort_by(|a, b| a.student.name.cmp(&b.student.name));

    Ok(Json(ClassProgressResponse {
        total_students: class_progress.len(),
        total_exercises_completed,
        class_progress,
    }))
}

/// Per-question distribution of answers on one exercise (creator only)
#[utoipa::path(
    get,
    path = "/api/progress/exercise/{exerciseId}/analytics",
    params(("exerciseId" = Uuid, Path, description = "Exercise ID")),
    responses(
        (status = 200, description = "Analytics", body = ExerciseAnalyticsResponse),
        (status = 403, description = "Not your exercise"),
        (status = 404, description = "Exercise not found")
    ),
    security(("bearer" = [])),
    tag = "Progress"
)]
pub async fn exercise_analytics(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<ExerciseAnalyticsResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let exercise = ExerciseService::find_by_id(&state.db, exercise_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;
    require_owner(current.user.id, exercise.created_by)?;

    let submissions = ProgressService::list_by_exercise(&state.db, exercise_id).await?;
    let students = lookup::users_by_id(
        &state.db,
        submissions.iter().map(|s| s.student_id).collect(),
    )
    .await?;

    let mut questions = Vec::new();
    if exercise.kind == "qcm" {
        let qcm: Vec<models::exercise_data::QcmQuestion> =
            serde_json::from_value(exercise.qcm_questions.clone())
                .map_err(|e| ApiError::internal(format!("corrupt qcm questions: {e}")))?;

        let answers_per_submission: Vec<Vec<QcmAnswerRecord>> = submissions
            .iter()
            .map(|s| serde_json::from_value(s.qcm_answers.clone()).unwrap_or_default())
            .collect();

        for (index, question) in qcm.iter().enumerate() {
            let mut option_distribution: BTreeMap<String, OptionStat> = question
                .options
                .iter()
                .map(|option| {
                    (
                        option.id.to_string(),
                        OptionStat {
                            text: option.text.clone(),
                            count: 0,
                            is_correct: option.is_correct,
                        },
                    )
                })
                .collect();

            let mut total_answers = 0;
            let mut correct_answers = 0;
            for answers in &answers_per_submission {
                let Some(answer) = answers.iter().find(|a| a.question_index == index) else {
                    continue;
                };
                total_answers += 1;
                if answer.is_correct {
                    correct_answers += 1;
                }
                if let Some(selected) = answer.selected_option {
                    if let Some(stat) = option_distribution.get_mut(&selected.to_string()) {
                        stat.count += 1;
                    }
                }
            }

            questions.push(QuestionAnalytics {
                question_index: index,
                question_text: question.question_text.clone(),
                total_answers,
                correct_answers,
                accuracy: accuracy_percentage(correct_answers as f64, total_answers as f64),
                option_distribution,
            });
        }
    }

    let unique_students: HashSet<Uuid> = submissions.iter().map(|s| s.student_id).collect();
    let (accuracy_sum, time_sum) = submissions.iter().fold((0i64, 0i64), |(a, t), s| {
        (a + s.accuracy_percentage as i64, t + s.time_spent_secs)
    });
    let count = submissions.len();
    let overall = OverallStats {
        total_submissions: count,
        unique_students: unique_students.len(),
        average_score: if count > 0 {
            accuracy_sum as f64 / count as f64
        } else {
            0.0
        },
        average_time_spent: if count > 0 {
            time_sum as f64 / count as f64
        } else {
            0.0
        },
    };

    let submission_summaries = submissions
        .iter()
        .filter_map(|s| {
            let student = students.get(&s.student_id)?;
            Some(SubmissionSummary {
                student: UserSummary::from(student),
                accuracy: s.accuracy_percentage,
                time_spent: s.time_spent_secs,
                completed_at: s.completed_at,
                attempt_number: s.attempt_number,
            })
        })
        .collect();

    Ok(Json(ExerciseAnalyticsResponse {
        exercise: AnalyzedExercise {
            id: exercise.id,
            title: exercise.title.clone(),
            kind: exercise.kind.clone(),
            total_points: exercise.total_points,
        },
        analytics: ExerciseAnalytics {
            overall,
            questions,
            submissions: submission_summaries,
        },
    }))
}

/// Remove a progress record (admin only)
#[utoipa::path(
    delete,
    path = "/api/progress/{progressId}",
    params(("progressId" = Uuid, Path, description = "Progress record ID")),
    responses(
        (status = 200, description = "Progress deleted", body = MessageResponse),
        (status = 404, description = "Progress record not found")
    ),
    security(("bearer" = [])),
    tag = "Progress"
)]
pub async fn delete_progress(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(progress_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    ProgressService::delete(&state.db, progress_id).await?;
    Ok(Json(MessageResponse::new(
        "Progress record deleted successfully",
    )))
}
