use crate::auth::CurrentUser;
use crate::dtos::MessageResponse;
use crate::dtos::contact::{
    ContactDetailResponse, ContactListResponse, ContactResponse, CreateContactRequest,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::services::contact::ContactService;
use models::role::Role;
use uuid::Uuid;

/// Public contact form submission
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Message received", body = ContactDetailResponse),
        (status = 400, description = "Validation failed")
    ),
    tag = "Contacts"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    Json(body): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactDetailResponse>), ApiError> {
    let mut errors = Vec::new();
    if body.name.trim().is_empty() {
        errors.push("Name is required.");
    }
    if body.email.trim().is_empty() {
        errors.push("Email is required.");
    }
    if body.phone.trim().is_empty() || !body.phone.chars().all(|c| c.is_ascii_digit() || c == '+')
    {
        errors.push("Valid phone number is required.");
    }
    if body.message.trim().is_empty() {
        errors.push("Message is required.");
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(format!(
            "Validation failed. Please fill in all required fields correctly. {}",
            errors.join(" ")
        )));
    }

    let contact =
        ContactService::create(&state.db, body.name, body.email, body.phone, body.message)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(ContactDetailResponse {
            message: "Contact message received successfully.".to_string(),
            data: ContactResponse::from(&contact),
        }),
    ))
}

/// All contact messages (admin or higher)
#[utoipa::path(
    get,
    path = "/api/contacts",
    responses((status = 200, description = "Contacts", body = ContactListResponse)),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ContactListResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let contacts = ContactService::list(&state.db).await?;
    Ok(Json(ContactListResponse {
        message: "Contacts retrieved successfully.".to_string(),
        data: contacts.iter().map(ContactResponse::from).collect(),
    }))
}

/// One contact message (admin or higher)
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact", body = ContactDetailResponse),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn get_contact(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactDetailResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    let contact = ContactService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact not found."))?;
    Ok(Json(ContactDetailResponse {
        message: "Contact retrieved successfully.".to_string(),
        data: ContactResponse::from(&contact),
    }))
}

/// Delete a contact message (admin or higher)
#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact deleted", body = MessageResponse),
        (status = 404, description = "Contact not found")
    ),
    security(("bearer" = [])),
    tag = "Contacts"
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    current.require_role(Role::Admin)?;

    ContactService::delete(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Contact deleted successfully.")))
}
