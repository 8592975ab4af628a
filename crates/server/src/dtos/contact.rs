use chrono::NaiveDateTime;
use database::entities::contact;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl From<&contact::Model> for ContactResponse {
    fn from(contact: &contact::Model) -> Self {
        ContactResponse {
            id: contact.id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            message: contact.message.clone(),
            created_at: contact.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactListResponse {
    pub message: String,
    pub data: Vec<ContactResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactDetailResponse {
    pub message: String,
    pub data: ContactResponse,
}
