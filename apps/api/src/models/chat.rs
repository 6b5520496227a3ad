#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full chat row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct ChatRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: String,
    pub job_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Chat list entry, ordered by update recency.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: Uuid,
    pub job_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One message as exposed to callers. `role` is one of `user`, `assistant`,
/// `system` (enforced by the messages table CHECK constraint).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MessageRow {
    pub id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Chat detail response: the chat plus its message sequence, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetail {
    pub id: Uuid,
    pub job_title: String,
    pub job_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<MessageRow>,
}

impl ChatDetail {
    pub fn new(chat: ChatRow, messages: Vec<MessageRow>) -> Self {
        Self {
            id: chat.id,
            job_title: chat.job_title,
            job_description: chat.job_description,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
            messages,
        }
    }
}
