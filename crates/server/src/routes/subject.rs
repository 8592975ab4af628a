use crate::auth::CurrentUser;
use crate::dtos::MessageResponse;
use crate::dtos::subject::{
    CreateSubjectRequest, CreatedSubjectResponse, SubjectDetailResponse, SubjectListResponse,
    SubjectResponse, SubjectStatistics, UpdateSubjectRequest,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::services::subject::SubjectService;
use models::role::Role;
use uuid::Uuid;

/// Create a subject (admin or higher)
#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = CreatedSubjectResponse),
        (status = 400, description = "Name already in use")
    ),
    security(("bearer" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<CreatedSubjectResponse>), ApiError> {
    current.require_role(Role::Admin)?;

    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Subject name is required"));
    }

    let subject =
        SubjectService::create(&state.db, body.name, body.description, body.image_path).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedSubjectResponse {
            message: "Subject created successfully".to_string(),
            subject: SubjectResponse::from(&subject),
        }),
    ))
}

/// All subjects, sorted by name
#[utoipa::path(
    get,
    path = "/api/subjects",
    responses((status = 200, description = "Subjects", body = SubjectListResponse)),
    security(("bearer" = [])),
    tag = "Subjects"
)]
pub async fn list_subjects(
    State(state): State<AppState>,
) -> Result<Json<SubjectListResponse>, ApiError> {
    let subjects = SubjectService::list(&state.db).await?;
    Ok(Json(SubjectListResponse {
        total: subjects.len() as u64,
        subjects: subjects.iter().map(SubjectResponse::from).collect(),
    }))
}

/// One subject with its usage count
#[utoipa::path(
    get,
    path = "/api/subjects/{subjectId}",
    params(("subjectId" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject", body = SubjectDetailResponse),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer" = [])),
    tag = "Subjects"
)]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<SubjectDetailResponse>, ApiError> {
    let subject = SubjectService::find_by_id(&state.db, subject_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subject not found"))?;
    let classes_using_subject = SubjectService::usage_count(&state.db, subject_id).await?;

    Ok(Json(SubjectDetailResponse {
        subject: SubjectResponse::from(&subject),
        statistics: SubjectStatistics {
            classes_using_subject,
        },
    }))
}

/// Update a subject (admin or higher)
#[utoipa::path(
    put,
    path = "/api/subjects/{subjectId}",
    params(("subjectId" = Uuid, Path, description = "Subject ID")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectResponse),
        (status = 400, description = "Name already in use"),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer" = [])),
    tag = "Subjects"
)]
pub async fn update_subject(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(subject_id): Path<Uuid>,
    Json(body): Json<UpdateSubjectRequest>,
) -> Result<Json<SubjectResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let subject = SubjectService::update(
        &state.db,
        subject_id,
        body.name,
        body.description,
        body.image_path.map(Some),
    )
    .await?;
    Ok(Json(SubjectResponse::from(&subject)))
}

/// Delete a subject, refused while classes still use it
#[utoipa::path(
    delete,
    path = "/api/subjects/{subjectId}",
    params(("subjectId" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted", body = MessageResponse),
        (status = 400, description = "Subject is in use"),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer" = [])),
    tag = "Subjects"
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    SubjectService::delete(&state.db, subject_id).await?;
    Ok(Json(MessageResponse::new("Subject deleted successfully")))
}
