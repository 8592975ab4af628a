use crate::auth::{CurrentUser, hash_password, issue_token, verify_password};
use crate::dtos::MessageResponse;
use crate::dtos::user::{
    ChangePasswordRequest, CreateUserRequest, CreatedUserResponse, LoginRequest, LoginResponse,
    PaginatedUsersResponse, UpdateUserRequest, UserDetailResponse, UserListQuery, UserResponse,
    UsersPagination,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::services::school::SchoolService;
use database::services::user::{NewUser, UserListFilter, UserService};
use models::access::require_self;
use models::role::Role;
use std::str::FromStr;
use uuid::Uuid;

/// Exchange email/password for a bearer token
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "School access blocked")
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let user = UserService::find_by_email(&state.db, &body.email)
        .await?
        .ok_or_else(|| ApiError::authentication("Invalid email or password"))?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::authentication("Invalid email or password"));
    }

    // A blocked school locks out everyone but the superadmin.
    if user.role != "superadmin" {
        let school = match user.school_id {
            Some(school_id) => SchoolService::find_by_id(&state.db, school_id).await?,
            None => None,
        };
        if !school.map(|s| s.is_active).unwrap_or(false) {
            return Err(ApiError::authorization(
                "Access denied. School access has been blocked.",
            ));
        }
    }

    let token = issue_token(&state.jwt_secret, user.id)?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(&user),
    }))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses((status = 200, description = "Profile", body = UserDetailResponse)),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn get_profile(
    current: CurrentUser,
) -> Json<UserDetailResponse> {
    Json(UserDetailResponse {
        user: UserResponse::from(&current.user),
    })
}

/// Create an account one step down the role hierarchy
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = CreatedUserResponse),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 403, description = "Role hierarchy violation")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    current.require_role(Role::Admin)?;

    if body.name.trim().is_empty() || body.email.trim().is_empty() {
        return Err(ApiError::validation(
            "Name, email, password, and role are required",
        ));
    }
    if body.password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters long",
        ));
    }
    let role = Role::from_str(&body.role).map_err(|_| {
        ApiError::validation(
            "Invalid role. Must be one of: superadmin, admin, teacher, student",
        )
    })?;

    // Superadmin seeds admins; an admin staffs their own school.
    match current.role {
        Role::Superadmin if role != Role::Admin => {
            return Err(ApiError::authorization(
                "SuperAdmin can only create admin accounts",
            ));
        }
        Role::Admin if !matches!(role, Role::Teacher | Role::Student) => {
            return Err(ApiError::authorization(
                "Admin can only create teacher and student accounts",
            ));
        }
        _ => {}
    }

    let school_id = match current.role {
        Role::Superadmin => {
            let school = SchoolService::find(&state.db)
                .await?
                .ok_or_else(|| ApiError::validation("No school found"))?;
            Some(school.id)
        }
        _ => Some(current.school_id()?),
    };

    let password_hash = hash_password(&body.password)?;
    let user = UserService::create(
        &state.db,
        NewUser {
            name: body.name,
            email: body.email,
            password_hash,
            role,
            school_id,
            created_by: current.user.id,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: format!("{} account created successfully", role),
            user: UserResponse::from(&user),
        }),
    ))
}

/// List users visible to the requester
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = PaginatedUsersResponse),
        (status = 403, description = "Teacher or higher only")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<PaginatedUsersResponse>, ApiError> {
    current.require_role(Role::Teacher)?;

    let requested_role = query
        .role
        .as_deref()
        .map(Role::from_str)
        .transpose()
        .map_err(|_| ApiError::validation("Invalid role filter"))?;

    let filter = match current.role {
        Role::Superadmin => UserListFilter {
            school_id: None,
            role: requested_role,
        },
        Role::Admin => UserListFilter {
            school_id: Some(current.school_id()?),
            role: requested_role,
        },
        // Teachers only ever see the students of their school.
        _ => UserListFilter {
            school_id: Some(current.school_id()?),
            role: Some(Role::Student),
        },
    };

    let (users, total) = UserService::list(&state.db, filter, query.page, query.limit).await?;
    Ok(Json(PaginatedUsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
        pagination: UsersPagination {
            current_page: query.page,
            total_pages: total.div_ceil(query.limit),
            total_users: total,
        },
    }))
}

/// Fetch one user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserDetailResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let user = UserService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    models::access::require_same_school(&current.actor(), user.school_id)?;

    Ok(Json(UserDetailResponse {
        user: UserResponse::from(&user),
    }))
}

/// Update name/email
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDetailResponse),
        (status = 400, description = "Email already in use"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let target = UserService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    models::access::require_same_school(&current.actor(), target.school_id)?;

    let user = UserService::update_profile(&state.db, id, body.name, body.email).await?;
    Ok(Json(UserDetailResponse {
        user: UserResponse::from(&user),
    }))
}

/// Delete a user and clean up their class links
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete the only admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let user = UserService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    models::access::require_same_school(&current.actor(), user.school_id)?;

    UserService::delete(&state.db, user).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect"),
        (status = 403, description = "Not your account")
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_self(current.user.id, id)?;

    if body.new_password.len() < 6 {
        return Err(ApiError::validation(
            "New password must be at least 6 characters long",
        ));
    }

    let user = UserService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(&body.current_password, &user.password_hash) {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    let password_hash = hash_password(&body.new_password)?;
    UserService::set_password_hash(&state.db, user, password_hash).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
