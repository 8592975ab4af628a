use crate::auth::{CurrentUser, hash_password};
use crate::dtos::school::{
    CreateSchoolRequest, CreateSchoolResponse, RenameSchoolRequest, SchoolDetailResponse,
    SchoolResponse, SchoolStatistics, ToggleAccessRequest,
};
use crate::dtos::{MessageResponse, UserSummary};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::services::school::SchoolService;
use database::services::user::UserService;
use models::role::Role;

/// One-time bootstrap: creates the school and its admin account
#[utoipa::path(
    post,
    path = "/api/schools",
    request_body = CreateSchoolRequest,
    responses(
        (status = 201, description = "School created", body = CreateSchoolResponse),
        (status = 400, description = "A school already exists"),
        (status = 403, description = "Superadmin only")
    ),
    security(("bearer" = [])),
    tag = "Schools"
)]
pub async fn create_school(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateSchoolRequest>,
) -> Result<(StatusCode, Json<CreateSchoolResponse>), ApiError> {
    current.require_role(Role::Superadmin)?;

    if body.admin_password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters long",
        ));
    }

    let password_hash = hash_password(&body.admin_password)?;
    let (school, admin) = SchoolService::bootstrap(
        &state.db,
        body.school_name,
        body.admin_name,
        body.admin_email,
        password_hash,
        current.user.id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSchoolResponse {
            message: "School created successfully".to_string(),
            school: SchoolResponse::from(&school),
            admin: UserSummary::from(&admin),
        }),
    ))
}

/// School detail with head counts
#[utoipa::path(
    get,
    path = "/api/schools",
    responses(
        (status = 200, description = "School detail", body = SchoolDetailResponse),
        (status = 404, description = "No school found")
    ),
    security(("bearer" = [])),
    tag = "Schools"
)]
pub async fn get_school(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SchoolDetailResponse>, ApiError> {
    current.require_role(Role::Superadmin)?;

    let school = SchoolService::find(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("No school found"))?;

    let counters = SchoolService::counters(&state.db, school.id).await?;
    let admin = match school.admin_id {
        Some(admin_id) => UserService::find_by_id(&state.db, admin_id)
            .await?
            .map(|u| UserSummary::from(&u)),
        None => None,
    };

    Ok(Json(SchoolDetailResponse {
        school: SchoolResponse::from(&school),
        admin,
        statistics: SchoolStatistics {
            total_teachers: counters.total_teachers,
            total_students: counters.total_students,
            total_classes: counters.total_classes,
            total_users: counters.total_teachers + counters.total_students + 1,
        },
    }))
}

/// Block or unblock school-wide access
#[utoipa::path(
    put,
    path = "/api/schools/access",
    request_body = ToggleAccessRequest,
    responses(
        (status = 200, description = "Access toggled", body = SchoolResponse),
        (status = 403, description = "Superadmin only"),
        (status = 404, description = "No school found")
    ),
    security(("bearer" = [])),
    tag = "Schools"
)]
pub async fn toggle_access(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<ToggleAccessRequest>,
) -> Result<Json<SchoolResponse>, ApiError> {
    current.require_role(Role::Superadmin)?;

    let school = SchoolService::set_access(&state.db, body.block, body.reason).await?;
    Ok(Json(SchoolResponse::from(&school)))
}

/// Rename the school
#[utoipa::path(
    put,
    path = "/api/schools/name",
    request_body = RenameSchoolRequest,
    responses(
        (status = 200, description = "School renamed", body = MessageResponse),
        (status = 400, description = "Invalid name or school blocked"),
        (status = 403, description = "Admin or higher only")
    ),
    security(("bearer" = [])),
    tag = "Schools"
)]
pub async fn rename_school(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<RenameSchoolRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation(
            "School name is required and must be a non-empty string",
        ));
    }
    if name.len() > 100 {
        return Err(ApiError::validation(
            "School name cannot exceed 100 characters",
        ));
    }

    SchoolService::rename(&state.db, name.to_string()).await?;
    Ok(Json(MessageResponse::new("School name updated successfully")))
}
