//! Conversation service — the send-message flow consumed by the HTTP layer.

use sqlx::PgPool;
use uuid::Uuid;

use crate::chat::store;
use crate::coach;
use crate::errors::AppError;
use crate::llm_client::{ChatMessage, Completer};
use crate::models::chat::{ChatDetail, MessageRow};

/// Sends one user message: loads the owned chat, generates the coach reply
/// from the full prior history, then commits the paired turn. A generation
/// failure leaves the message sequence untouched — nothing is written until
/// the reply exists.
pub async fn send_message(
    pool: &PgPool,
    llm: &dyn Completer,
    user_id: Uuid,
    chat_id: Uuid,
    content: &str,
) -> Result<Option<ChatDetail>, AppError> {
    let Some(chat) = store::get_chat(pool, user_id, chat_id).await? else {
        return Ok(None);
    };

    let history = history_for_model(&chat.messages);
    let reply = coach::reply_to_chat(
        llm,
        &chat.job_title,
        &chat.job_description,
        &history,
        content,
    )
    .await?;

    Ok(store::append_turn(pool, user_id, chat_id, content, &reply).await?)
}

/// Maps stored messages into model conversation turns, oldest first.
fn history_for_model(messages: &[MessageRow]) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|m| ChatMessage::new(m.role.as_str(), m.content.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(role: &str, content: &str) -> MessageRow {
        MessageRow {
            id: Uuid::new_v4(),
            role: role.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_history_preserves_order_and_roles() {
        let messages = vec![
            message("user", "What should I prepare?"),
            message("assistant", "Focus on system design."),
            message("user", "Anything else?"),
        ];

        let history = history_for_model(&messages);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "assistant");
        assert_eq!(history[1].content, "Focus on system design.");
        assert_eq!(history[2].content, "Anything else?");
    }

    #[test]
    fn test_history_of_empty_chat_is_empty() {
        assert!(history_for_model(&[]).is_empty());
    }
}
