pub mod chat;
pub mod class;
pub mod contact;
pub mod exercise;
pub mod grade;
pub mod notification;
pub mod progress;
pub mod school;
pub mod subject;
pub mod user;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&database::entities::user::Model> for UserSummary {
    fn from(user: &database::entities::user::Model) -> Self {
        UserSummary {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&database::entities::subject::Model> for SubjectSummary {
    fn from(subject: &database::entities::subject::Model) -> Self {
        SubjectSummary {
            id: subject.id,
            name: subject.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassSummary {
    pub id: Uuid,
    pub name: String,
    pub grade: String,
}

impl From<&database::entities::class::Model> for ClassSummary {
    fn from(class: &database::entities::class::Model) -> Self {
        ClassSummary {
            id: class.id,
            name: class.name.clone(),
            grade: class.grade_label.clone(),
        }
    }
}
