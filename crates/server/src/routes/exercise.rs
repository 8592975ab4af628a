use crate::auth::CurrentUser;
use crate::dtos::exercise::{
    AttemptResponse, CreateExerciseRequest, CreatedExerciseResponse, DeletedExerciseResponse,
    ExerciseAttemptsResponse, ExerciseDetailResponse, ExerciseListQuery, ExerciseProgressQuery,
    ExerciseResponse, ExerciseWithProgressResponse, ExercisesBySubjectResponse,
    ExercisesPagination, PaginatedExercisesResponse, ProgressSnapshot, StudentStanding,
    SubmissionOutcomeResponse, SubmitExerciseRequest, SubmitExerciseResponse,
    UpdateExerciseRequest,
};
use crate::dtos::{ClassSummary, SubjectSummary, UserSummary};
use crate::error::ApiError;
use crate::lookup;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use database::entities::exercise;
use database::services::class::ClassService;
use database::services::exercise::{
    ExerciseChanges, ExerciseListFilter, ExerciseService, NewExercise,
};
use database::services::progress::{NewSubmission, ProgressService};
use database::services::subject::SubjectService;
use database::services::user::UserService;
use models::access::{require_enrolled, require_owner, require_teaches_subject};
use models::exercise_data::{
    Difficulty, ExerciseKind, ExerciseMetadata, FillBlankQuestion, FillBlankSubmission,
    QcmQuestion, total_points,
};
use models::role::Role;
use models::scoring;
use serde_json::json;
use uuid::Uuid;

fn parse_kind(kind: &str) -> Result<ExerciseKind, ApiError> {
    match kind {
        "qcm" => Ok(ExerciseKind::Qcm),
        "fill_blanks" => Ok(ExerciseKind::FillBlanks),
        _ => Err(ApiError::validation(
            "Invalid exercise type. Must be qcm or fill_blanks",
        )),
    }
}

fn parse_difficulty(difficulty: &str) -> Result<Difficulty, ApiError> {
    match difficulty {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        _ => Err(ApiError::validation(
            "Invalid difficulty. Must be easy, medium or hard",
        )),
    }
}

fn parse_qcm_questions(exercise: &exercise::Model) -> Result<Vec<QcmQuestion>, ApiError> {
    serde_json::from_value(exercise.qcm_questions.clone())
        .map_err(|e| ApiError::internal(format!("corrupt qcm questions: {e}")))
}

fn parse_fill_blank_questions(
    exercise: &exercise::Model,
) -> Result<Vec<FillBlankQuestion>, ApiError> {
    serde_json::from_value(exercise.fill_blank_questions.clone())
        .map_err(|e| ApiError::internal(format!("corrupt fill blank questions: {e}")))
}

fn parse_metadata(exercise: &exercise::Model) -> ExerciseMetadata {
    serde_json::from_value(exercise.metadata.clone()).unwrap_or_default()
}

/// Batch-assemble responses with their subject/class/creator summaries.
async fn to_responses(
    state: &AppState,
    exercises: &[exercise::Model],
) -> Result<Vec<ExerciseResponse>, ApiError> {
    let subjects = lookup::subjects_by_id(
        &state.db,
        exercises.iter().map(|e| e.subject_id).collect(),
    )
    .await?;
    let classes =
        lookup::classes_by_id(&state.db, exercises.iter().map(|e| e.class_id).collect()).await?;
    let creators =
        lookup::users_by_id(&state.db, exercises.iter().map(|e| e.created_by).collect()).await?;

    exercises
        .iter()
        .map(|e| {
            let subject = subjects
                .get(&e.subject_id)
                .ok_or_else(|| ApiError::internal("exercise subject missing".to_string()))?;
            let class = classes
                .get(&e.class_id)
                .ok_or_else(|| ApiError::internal("exercise class missing".to_string()))?;
            let creator = creators
                .get(&e.created_by)
                .ok_or_else(|| ApiError::internal("exercise creator missing".to_string()))?;
            Ok(ExerciseResponse {
                id: e.id,
                title: e.title.clone(),
                kind: e.kind.clone(),
                subject: SubjectSummary::from(subject),
                class: ClassSummary::from(class),
                created_by: UserSummary::from(creator),
                difficulty: e.difficulty.clone(),
                total_points: e.total_points,
                qcm_questions: e.qcm_questions.clone(),
                fill_blank_questions: e.fill_blank_questions.clone(),
                metadata: e.metadata.clone(),
                tags: e.tags.clone(),
                due_date: e.due_date,
                created_at: e.created_at,
            })
        })
        .collect()
}

async fn single_response(
    state: &AppState,
    exercise: &exercise::Model,
) -> Result<ExerciseResponse, ApiError> {
    Ok(to_responses(state, std::slice::from_ref(exercise))
        .await?
        .remove(0))
}

/// Create an exercise for a class/subject the teacher teaches
#[utoipa::path(
    post,
    path = "/api/exercises",
    request_body = CreateExerciseRequest,
    responses(
        (status = 201, description = "Exercise created", body = CreatedExerciseResponse),
        (status = 400, description = "Missing questions or invalid type"),
        (status = 403, description = "Teacher does not teach this subject in this class"),
        (status = 404, description = "Class or subject not found")
    ),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn create_exercise(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<CreatedExerciseResponse>), ApiError> {
    current.require_role(Role::Teacher)?;
    let school_id = current.school_id()?;
    let kind = parse_kind(&body.kind)?;

    let class = ClassService::find_by_id(&state.db, body.class_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Class not found"))?;
    models::access::require_same_school(&current.actor(), Some(class.school_id))?;

    SubjectService::find_by_id(&state.db, body.subject)
        .await?
        .ok_or_else(|| ApiError::not_found("Subject not found"))?;

    let links = UserService::teaching_links(&state.db, current.user.id).await?;
    require_teaches_subject(&links, body.class_id, body.subject)?;

    let (qcm, fill_blanks) = match kind {
        ExerciseKind::Qcm => {
            if body.qcm_questions.is_empty() {
                return Err(ApiError::validation(
                    "QCM exercises must have at least one question",
                ));
            }
            let questions: Vec<QcmQuestion> = body
                .qcm_questions
                .into_iter()
                .map(|q| q.into_question())
                .collect();
            (questions, Vec::new())
        }
        ExerciseKind::FillBlanks => {
            if body.fill_blank_questions.is_empty() {
                return Err(ApiError::validation(
                    "Fill blanks exercises must have at least one question",
                ));
            }
            let questions: Vec<FillBlankQuestion> = body
                .fill_blank_questions
                .into_iter()
                .map(|q| q.into_question())
                .collect();
            (Vec::new(), questions)
        }
    };

    let total = total_points(&qcm, &fill_blanks);
    let metadata = body.metadata.unwrap_or_default();
    let exercise = ExerciseService::create(
        &state.db,
        NewExercise {
            title: body.title,
            kind: kind.as_str().to_string(),
            subject_id: body.subject,
            class_id: body.class_id,
            created_by: current.user.id,
            school_id,
            difficulty: body
                .difficulty
                .as_deref()
                .map(parse_difficulty)
                .transpose()?
                .unwrap_or_default()
                .as_str()
                .to_string(),
            qcm_questions: serde_json::to_value(&qcm).unwrap_or_else(|_| json!([])),
            fill_blank_questions: serde_json::to_value(&fill_blanks)
                .unwrap_or_else(|_| json!([])),
            total_points: total,
            metadata: serde_json::to_value(&metadata).unwrap_or_else(|_| json!({})),
            tags: json!(body.tags),
            due_date: body.due_date.map(|d| d.naive_utc()),
        },
    )
    .await?;

    let response = single_response(&state, &exercise).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedExerciseResponse {
            message: "Exercise created successfully".to_string(),
            exercise: response,
        }),
    ))
}

/// List exercises visible to the requester
#[utoipa::path(
    get,
    path = "/api/exercises",
    params(ExerciseListQuery),
    responses((status = 200, description = "Exercises", body = PaginatedExercisesResponse)),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn list_exercises(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ExerciseListQuery>,
) -> Result<Json<PaginatedExercisesResponse>, ApiError> {
    let mut filter = ExerciseListFilter {
        school_id: current.user.school_id,
        class_id: query.class_id,
        subject_id: query.subject,
        kind: query.kind,
        difficulty: query.difficulty,
        ..Default::default()
    };

    match current.role {
        // Teachers see only their own exercises.
        Role::Teacher => filter.created_by = Some(current.user.id),
        // Students see only exercises from their class.
        Role::Student => match current.user.student_class_id {
            Some(class_id) => filter.class_id = Some(class_id),
            None => {
                return Ok(Json(PaginatedExercisesResponse {
                    exercises: vec![],
                    pagination: ExercisesPagination {
                        current_page: query.page,
                        total_pages: 0,
                        total_exercises: 0,
                    },
                }));
            }
        },
        _ => {}
    }

    let (exercises, total) =
        ExerciseService::list(&state.db, filter, query.page, query.limit).await?;
    Ok(Json(PaginatedExercisesResponse {
        exercises: to_responses(&state, &exercises).await?,
        pagination: ExercisesPagination {
            current_page: query.page,
            total_pages: total.div_ceil(query.limit),
            total_exercises: total,
        },
    }))
}

/// One exercise; students also get their latest attempt
#[utoipa::path(
    get,
    path = "/api/exercises/{exerciseId}",
    params(("exerciseId" = Uuid, Path, description = "Exercise ID")),
    responses(
        (status = 200, description = "Exercise", body = ExerciseDetailResponse),
        (status = 403, description = "Not yours to view"),
        (status = 404, description = "Exercise not found")
    ),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn get_exercise(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<ExerciseDetailResponse>, ApiError> {
    let exercise = ExerciseService::find_by_id(&state.db, exercise_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;
    models::access::require_same_school(&current.actor(), Some(exercise.school_id))?;

    let mut student_progress = None;
    match current.role {
        Role::Teacher => require_owner(current.user.id, exercise.created_by)?,
        Role::Student => {
            require_enrolled(current.user.student_class_id, exercise.class_id)?;
            let latest = ProgressService::latest_by_exercise(
                &state.db,
                current.user.id,
                vec![exercise.id],
            )
            .await?;
            student_progress = latest.get(&exercise.id).map(ProgressSnapshot::from);
        }
        _ => {}
    }

    Ok(Json(ExerciseDetailResponse {
        exercise: single_response(&state, &exercise).await?,
        student_progress,
    }))
}

/// Update an exercise (creator only; class and subject are immutable)
#[utoipa::path(
    put,
    path = "/api/exercises/{exerciseId}",
    params(("exerciseId" = Uuid, Path, description = "Exercise ID")),
    request_body = UpdateExerciseRequest,
    responses(
        (status = 200, description = "Exercise updated", body = ExerciseDetailResponse),
        (status = 403, description = "You can only update your own exercises"),
        (status = 404, description = "Exercise not found")
    ),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn update_exercise(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(exercise_id): Path<Uuid>,
    Json(body): Json<UpdateExerciseRequest>,
) -> Result<Json<ExerciseDetailResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let exercise = ExerciseService::find_by_id(&state.db, exercise_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;
    require_owner(current.user.id, exercise.created_by)?;

    let kind = parse_kind(&exercise.kind)?;
    let mut changes = ExerciseChanges {
        title: body.title,
        difficulty: body
            .difficulty
            .as_deref()
            .map(parse_difficulty)
            .transpose()?
            .map(|d| d.as_str().to_string()),
        is_active: body.is_active,
        metadata: body
            .metadata
            .map(|m| serde_json::to_value(&m).unwrap_or_else(|_| json!({}))),
        tags: body.tags.map(|t| json!(t)),
        due_date: body.due_date.map(|d| Some(d.naive_utc())),
        ..Default::default()
    };

    // Replacing the question list re-derives the total.
    match kind {
        ExerciseKind::Qcm => {
            if let Some(inputs) = body.qcm_questions {
                if inputs.is_empty() {
                    return Err(ApiError::validation(
                        "QCM exercises must have at least one question",
                    ));
                }
                let questions: Vec<QcmQuestion> =
                    inputs.into_iter().map(|q| q.into_question()).collect();
                changes.total_points = Some(total_points(&questions, &[]));
                changes.qcm_questions =
                    Some(serde_json::to_value(&questions).unwrap_or_else(|_| json!([])));
            }
        }
        ExerciseKind::FillBlanks => {
            if let Some(inputs) = body.fill_blank_questions {
                if inputs.is_empty() {
                    return Err(ApiError::validation(
                        "Fill blanks exercises must have at least one question",
                    ));
                }
                let questions: Vec<FillBlankQuestion> =
                    inputs.into_iter().map(|q| q.into_question()).collect();
                changes.total_points = Some(total_points(&[], &questions));
                changes.fill_blank_questions =
                    Some(serde_json::to_value(&questions).unwrap_or_else(|_| json!([])));
            }
        }
    }

    let updated = ExerciseService::update(&state.db, exercise, changes).await?;
    Ok(Json(ExerciseDetailResponse {
        exercise: single_response(&state, &updated).await?,
        student_progress: None,
    }))
}

/// Delete an exercise and all progress on it (creator only)
#[utoipa::path(
    delete,
    path = "/api/exercises/{exerciseId}",
    params(("exerciseId" = Uuid, Path, description = "Exercise ID")),
    responses(
        (status = 200, description = "Exercise deleted", body = DeletedExerciseResponse),
        (status = 403, description = "You can only delete your own exercises"),
        (status = 404, description = "Exercise not found")
    ),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn delete_exercise(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<DeletedExerciseResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let exercise = ExerciseService::find_by_id(&state.db, exercise_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;
    require_owner(current.user.id, exercise.created_by)?;

    let deleted_progress_records = ExerciseService::delete(&state.db, exercise_id).await?;
    Ok(Json(DeletedExerciseResponse {
        message: "Exercise and all related progress deleted successfully".to_string(),
        deleted_progress_records,
    }))
}

/// Submit answers; scored immediately, one attempt consumed
#[utoipa::path(
    post,
    path = "/api/exercises/{exerciseId}/submit",
    params(("exerciseId" = Uuid, Path, description = "Exercise ID")),
    request_body = SubmitExerciseRequest,
    responses(
        (status = 201, description = "Submission scored", body = SubmitExerciseResponse),
        (status = 400, description = "Attempt limit reached or malformed answers"),
        (status = 403, description = "Student is not in this class"),
        (status = 404, description = "Exercise not found")
    ),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn submit_exercise(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(exercise_id): Path<Uuid>,
    Json(body): Json<SubmitExerciseRequest>,
) -> Result<(StatusCode, Json<SubmitExerciseResponse>), ApiError> {
    let exercise = ExerciseService::find_by_id(&state.db, exercise_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;
    require_enrolled(current.user.student_class_id, exercise.class_id)?;

    let kind = parse_kind(&exercise.kind)?;
    let outcome = match kind {
        ExerciseKind::Qcm => {
            let selections: Vec<Option<Uuid>> = serde_json::from_value(body.answers)
                .map_err(|_| ApiError::validation("Invalid answers format"))?;
            let questions = parse_qcm_questions(&exercise)?;
            let records = scoring::score_qcm(&questions, &selections);
            scoring::qcm_outcome(records, exercise.total_points)
        }
        ExerciseKind::FillBlanks => {
            let submissions: Vec<FillBlankSubmission> = serde_json::from_value(body.answers)
                .map_err(|_| ApiError::validation("Invalid answers format"))?;
            let questions = parse_fill_blank_questions(&exercise)?;
            let records = scoring::score_fill_blanks(&questions, &submissions);
            scoring::fill_blank_outcome(records, exercise.total_points)
        }
    };

    let metadata = parse_metadata(&exercise);
    // The client does not report a start time; assume a 30 minute session.
    let completed_at = Utc::now().naive_utc();
    let started_at = completed_at - Duration::minutes(30);

    let progress = ProgressService::record_submission(
        &state.db,
        NewSubmission {
            student_id: current.user.id,
            exercise_id,
            subject_id: exercise.subject_id,
            class_id: exercise.class_id,
            qcm_answers: serde_json::to_value(&outcome.qcm_answers)
                .unwrap_or_else(|_| json!([])),
            fill_blank_answers: serde_json::to_value(&outcome.fill_blank_answers)
                .unwrap_or_else(|_| json!([])),
            total_points_earned: outcome.total_points_earned,
            max_possible_points: outcome.max_possible_points,
            accuracy_percentage: outcome.accuracy_percentage,
            started_at,
            completed_at,
            max_attempts: metadata.max_attempts,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitExerciseResponse {
            message: "Exercise submitted successfully".to_string(),
            progress: SubmissionOutcomeResponse {
                total_points_earned: progress.total_points_earned,
                max_possible_points: progress.max_possible_points,
                accuracy_percentage: progress.accuracy_percentage,
                attempt_number: progress.attempt_number,
            },
        }),
    ))
}

/// Attempts on an exercise: students see their own, staff pick a student
#[utoipa::path(
    get,
    path = "/api/exercises/{exerciseId}/progress",
    params(("exerciseId" = Uuid, Path, description = "Exercise ID"), ExerciseProgressQuery),
    responses(
        (status = 200, description = "Attempts", body = ExerciseAttemptsResponse),
        (status = 400, description = "Student ID is required"),
        (status = 403, description = "Not your student")
    ),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn get_exercise_progress(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(exercise_id): Path<Uuid>,
    Query(query): Query<ExerciseProgressQuery>,
) -> Result<Json<ExerciseAttemptsResponse>, ApiError> {
    let target_student_id = match current.role {
        Role::Student => current.user.id,
        _ => query
            .student_id
            .ok_or_else(|| ApiError::validation("Student ID is required"))?,
    };

    if current.role == Role::Teacher {
        let student = UserService::find_by_id(&state.db, target_student_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Student not found"))?;
        let links = UserService::teaching_links(&state.db, current.user.id).await?;
        models::access::can_view_student_data(
            &current.actor(),
            target_student_id,
            student.student_class_id,
            &links,
        )?;
    }

    let attempts = ProgressService::attempts(&state.db, target_student_id, exercise_id).await?;
    Ok(Json(ExerciseAttemptsResponse {
        total_attempts: attempts.len() as u64,
        progress: attempts.iter().map(AttemptResponse::from).collect(),
    }))
}

/// Exercises of one subject for the requesting student, with standing
#[utoipa::path(
    get,
    path = "/api/exercises/subject/{subjectId}",
    params(("subjectId" = Uuid, Path, description = "Subject ID"), ExerciseListQuery),
    responses(
        (status = 200, description = "Exercises with progress", body = ExercisesBySubjectResponse),
        (status = 403, description = "Student has no class")
    ),
    security(("bearer" = [])),
    tag = "Exercises"
)]
pub async fn exercises_by_subject(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(subject_id): Path<Uuid>,
    Query(query): Query<ExerciseListQuery>,
) -> Result<Json<ExercisesBySubjectResponse>, ApiError> {
    let class_id = current.user.student_class_id.ok_or_else(|| {
        ApiError::authorization("You must be assigned to a class to view exercises")
    })?;

    let filter = ExerciseListFilter {
        subject_id: Some(subject_id),
        class_id: Some(class_id),
        difficulty: query.difficulty,
        ..Default::default()
    };
    let (exercises, total) =
        ExerciseService::list(&state.db, filter, query.page, query.limit).await?;

    let latest = ProgressService::latest_by_exercise(
        &state.db,
        current.user.id,
        exercises.iter().map(|e| e.id).collect(),
    )
    .await?;
    let creators =
        lookup::users_by_id(&state.db, exercises.iter().map(|e| e.created_by).collect()).await?;

    let items = exercises
        .iter()
        .map(|e| {
            let creator = creators
                .get(&e.created_by)
                .ok_or_else(|| ApiError::internal("exercise creator missing".to_string()))?;
            let metadata = parse_metadata(e);
            let progress = latest.get(&e.id);
            let standing = progress.map(|p| StudentStanding {
                attempt_number: p.attempt_number,
                score: p.total_points_earned,
                accuracy: p.accuracy_percentage,
                completed_at: p.completed_at,
                status: if p.accuracy_percentage >= 50 {
                    "passed".to_string()
                } else {
                    "failed".to_string()
                },
            });
            let remaining_attempts = match progress {
                Some(p) => metadata.max_attempts.saturating_sub(p.attempt_number as u32),
                None => metadata.max_attempts,
            };
            Ok(ExerciseWithProgressResponse {
                id: e.id,
                title: e.title.clone(),
                kind: e.kind.clone(),
                difficulty: e.difficulty.clone(),
                total_points: e.total_points,
                created_by: UserSummary::from(creator),
                due_date: e.due_date,
                created_at: e.created_at,
                status: if standing.is_some() {
                    "completed".to_string()
                } else {
                    "pending".to_string()
                },
                student_progress: standing,
                remaining_attempts,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Json(ExercisesBySubjectResponse {
        exercises: items,
        pagination: ExercisesPagination {
            current_page: query.page,
            total_pages: total.div_ceil(query.limit),
            total_exercises: total,
        },
    }))
}
