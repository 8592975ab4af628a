use chrono::NaiveDateTime;
use database::entities::{chat, chat_message};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChatRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTitleRequest {
    pub title: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: Uuid,
    pub title: String,
    pub last_message_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl From<&chat::Model> for ChatResponse {
    fn from(chat: &chat::Model) -> Self {
        ChatResponse {
            id: chat.id,
            title: chat.title.clone(),
            last_message_at: chat.last_message_at,
            created_at: chat.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatMessageResponse {
    pub role: String,
    pub content: String,
    pub timestamp: NaiveDateTime,
}

impl From<&chat_message::Model> for ChatMessageResponse {
    fn from(message: &chat_message::Model) -> Self {
        ChatMessageResponse {
            role: message.role.clone(),
            content: message.content.clone(),
            timestamp: message.sent_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<ChatMessageResponse>,
    pub last_message_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: Uuid,
    pub title: String,
    pub message_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub user_message: ChatMessageResponse,
    pub assistant_message: ChatMessageResponse,
    pub chat: ChatSummary,
}
