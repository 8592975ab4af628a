use crate::ai::{AiMessage, CONTEXT_MESSAGES, FALLBACK_MESSAGE, system_prompt};
use crate::auth::CurrentUser;
use crate::dtos::MessageResponse;
use crate::dtos::chat::{
    ChatDetailResponse, ChatMessageResponse, ChatResponse, ChatSummary, CreateChatRequest,
    SendMessageRequest, SendMessageResponse, UpdateTitleRequest,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::services::chat::ChatService;
use database::services::class::ClassService;
use database::services::school::SchoolService;
use models::access::AccessDenied;
use models::role::Role;
use uuid::Uuid;

/// The tutoring chat belongs to students; everyone else is turned away.
fn require_student(current: &CurrentUser) -> Result<(), ApiError> {
    if current.role == Role::Student {
        Ok(())
    } else {
        Err(AccessDenied::InsufficientRole.into())
    }
}

/// Open a new tutoring chat
#[utoipa::path(
    post,
    path = "/api/chats",
    request_body = CreateChatRequest,
    responses(
        (status = 201, description = "Chat created", body = ChatResponse),
        (status = 403, description = "Students only")
    ),
    security(("bearer" = [])),
    tag = "Chats"
)]
pub async fn create_chat(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), ApiError> {
    require_student(&current)?;

    let chat = ChatService::create(&state.db, current.user.id, body.title).await?;
    Ok((StatusCode::CREATED, Json(ChatResponse::from(&chat))))
}

/// The student's active chats, most recently used first
#[utoipa::path(
    get,
    path = "/api/chats",
    responses((status = 200, description = "Chats", body = [ChatResponse])),
    security(("bearer" = [])),
    tag = "Chats"
)]
pub async fn list_chats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<ChatResponse>>, ApiError> {
    require_student(&current)?;

    let chats = ChatService::list_for_student(&state.db, current.user.id).await?;
    Ok(Json(chats.iter().map(ChatResponse::from).collect()))
}

/// One chat with its full message history
#[utoipa::path(
    get,
    path = "/api/chats/{chatId}",
    params(("chatId" = Uuid, Path, description = "Chat ID")),
    responses(
        (status = 200, description = "Chat", body = ChatDetailResponse),
        (status = 404, description = "Chat not found")
    ),
    security(("bearer" = [])),
    tag = "Chats"
)]
pub async fn get_chat(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ChatDetailResponse>, ApiError> {
    require_student(&current)?;

    let chat = ChatService::find_for_student(&state.db, chat_id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Chat not found"))?;
    let messages = ChatService::messages(&state.db, chat_id).await?;

    Ok(Json(ChatDetailResponse {
        id: chat.id,
        title: chat.title,
        messages: messages.iter().map(ChatMessageResponse::from).collect(),
        last_message_at: chat.last_message_at,
        created_at: chat.created_at,
    }))
}

/// Send a message and get the tutor's reply
#[utoipa::path(
    post,
    path = "/api/chats/{chatId}/message",
    params(("chatId" = Uuid, Path, description = "Chat ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Reply", body = SendMessageResponse),
        (status = 404, description = "Chat not found"),
        (status = 408, description = "AI provider timed out")
    ),
    security(("bearer" = [])),
    tag = "Chats"
)]
pub async fn send_message(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(chat_id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    require_student(&current)?;

    let message = body.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::validation("Message is required"));
    }

    let chat = ChatService::find_for_student(&state.db, chat_id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Chat not found"))?;

    // The user message is kept even when the provider call fails.
    let user_message = ChatService::append_message(&state.db, &chat, "user", message).await?;

    let class = match current.user.student_class_id {
        Some(class_id) => ClassService::find_by_id(&state.db, class_id).await?,
        None => None,
    };
    let school = match current.user.school_id {
        Some(school_id) => SchoolService::find_by_id(&state.db, school_id).await?,
        None => None,
    };
    let prompt = system_prompt(
        &current.user.name,
        class.as_ref().map(|c| c.name.as_str()),
        class.as_ref().map(|c| c.grade_label.as_str()),
        school.as_ref().map(|s| s.name.as_str()),
    );

    let mut context = vec![AiMessage::new("system", prompt)];
    for recent in ChatService::recent_messages(&state.db, chat_id, CONTEXT_MESSAGES).await? {
        if recent.role == "user" || recent.role == "assistant" {
            context.push(AiMessage::new(recent.role.clone(), recent.content.clone()));
        }
    }

    let reply = match state.ai.chat(&context).await {
        Ok(reply) => reply,
        Err(crate::ai::AiError::Timeout) => return Err(ApiError::UpstreamTimeout),
        Err(crate::ai::AiError::Unavailable(detail)) => {
            log::warn!("AI provider failed, serving fallback: {detail}");
            FALLBACK_MESSAGE.to_string()
        }
    };

    let assistant_message =
        ChatService::append_message(&state.db, &chat, "assistant", reply).await?;
    let message_count = ChatService::count_messages(&state.db, chat_id).await?;

    Ok(Json(SendMessageResponse {
        success: true,
        user_message: ChatMessageResponse::from(&user_message),
        assistant_message: ChatMessageResponse::from(&assistant_message),
        chat: ChatSummary {
            id: chat.id,
            title: chat.title,
            message_count,
        },
    }))
}

/// Rename a chat
#[utoipa::path(
    patch,
    path = "/api/chats/{chatId}/title",
    params(("chatId" = Uuid, Path, description = "Chat ID")),
    request_body = UpdateTitleRequest,
    responses(
        (status = 200, description = "Chat renamed", body = ChatResponse),
        (status = 400, description = "Title is required"),
        (status = 404, description = "Chat not found")
    ),
    security(("bearer" = [])),
    tag = "Chats"
)]
pub async fn update_chat_title(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(chat_id): Path<Uuid>,
    Json(body): Json<UpdateTitleRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    require_student(&current)?;

    if body.title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }

    let chat = ChatService::rename(&state.db, chat_id, current.user.id, body.title).await?;
    Ok(Json(ChatResponse::from(&chat)))
}

/// Soft-delete a chat
#[utoipa::path(
    delete,
    path = "/api/chats/{chatId}",
    params(("chatId" = Uuid, Path, description = "Chat ID")),
    responses(
        (status = 200, description = "Chat deleted", body = MessageResponse),
        (status = 404, description = "Chat not found")
    ),
    security(("bearer" = [])),
    tag = "Chats"
)]
pub async fn delete_chat(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_student(&current)?;

    ChatService::soft_delete(&state.db, chat_id, current.user.id).await?;
    Ok(Json(MessageResponse::new("Chat deleted successfully")))
}
