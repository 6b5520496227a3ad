//! Axum route handlers for the chat API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::chat::{service, store};
use crate::errors::AppError;
use crate::models::chat::{ChatDetail, ChatSummary};
use crate::state::AppState;
use crate::validate::require_length;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    pub job_title: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /api/chats
pub async fn handle_create_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<ChatDetail>), AppError> {
    let job_title = require_length("jobTitle", &request.job_title, 2, 150)?;
    let job_description = require_length("jobDescription", &request.job_description, 20, 12000)?;

    let chat = store::create_chat(&state.db, user_id, &job_title, &job_description).await?;
    Ok((StatusCode::CREATED, Json(chat)))
}

/// GET /api/chats
pub async fn handle_list_chats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ChatSummary>>, AppError> {
    Ok(Json(store::list_chats(&state.db, user_id).await?))
}

/// GET /api/chats/:id
pub async fn handle_get_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ChatDetail>, AppError> {
    store::get_chat(&state.db, user_id, chat_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Chat {chat_id} not found")))
}

/// POST /api/chats/:id/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ChatDetail>, AppError> {
    let content = require_length("content", &request.content, 1, 4000)?;

    service::send_message(&state.db, state.llm.as_ref(), user_id, chat_id, &content)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Chat {chat_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::{ChatRow, MessageRow};
    use chrono::Utc;

    #[test]
    fn test_create_chat_request_uses_camel_case_keys() {
        let request: CreateChatRequest = serde_json::from_str(
            r#"{"jobTitle": "Backend Engineer", "jobDescription": "Build and run APIs."}"#,
        )
        .unwrap();
        assert_eq!(request.job_title, "Backend Engineer");
        assert_eq!(request.job_description, "Build and run APIs.");
    }

    #[test]
    fn test_chat_detail_serializes_client_shape() {
        let now = Utc::now();
        let chat = ChatRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            job_title: "Backend Engineer".to_string(),
            job_description: "Build and run APIs.".to_string(),
            created_at: now,
            updated_at: now,
        };
        let message = MessageRow {
            id: Uuid::new_v4(),
            role: "user".to_string(),
            content: "What should I prepare?".to_string(),
            created_at: now,
        };

        let value = serde_json::to_value(ChatDetail::new(chat, vec![message])).unwrap();
        assert!(value.get("jobTitle").is_some());
        assert!(value.get("jobDescription").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value["messages"][0].get("createdAt").is_some());
        // The owning user id never leaves the server
        assert!(value.get("userId").is_none());
    }
}
