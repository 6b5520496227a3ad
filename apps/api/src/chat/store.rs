//! Chat persistence. Every operation takes the owning user id and filters by
//! it at the query level — an absent chat and a foreign-owned chat are
//! indistinguishable to callers.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::chat::{ChatDetail, ChatRow, ChatSummary, MessageRow};

/// Creates a chat with an empty message sequence.
pub async fn create_chat(
    pool: &PgPool,
    user_id: Uuid,
    job_title: &str,
    job_description: &str,
) -> Result<ChatDetail, sqlx::Error> {
    let now = Utc::now();
    let chat: ChatRow = sqlx::query_as(
        r#"
        INSERT INTO chats (id, user_id, job_title, job_description, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(job_title)
    .bind(job_description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    info!("Created chat {} for user {}", chat.id, chat.user_id);
    Ok(ChatDetail::new(chat, Vec::new()))
}

/// Lists the user's chats, most recently updated first.
pub async fn list_chats(pool: &PgPool, user_id: Uuid) -> Result<Vec<ChatSummary>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, job_title, created_at, updated_at
        FROM chats
        WHERE user_id = $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns the full chat with its messages ordered oldest first, or `None`
/// when the chat is absent or owned by another user.
pub async fn get_chat(
    pool: &PgPool,
    user_id: Uuid,
    chat_id: Uuid,
) -> Result<Option<ChatDetail>, sqlx::Error> {
    let chat: Option<ChatRow> = sqlx::query_as("SELECT * FROM chats WHERE id = $1 AND user_id = $2")
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    let Some(chat) = chat else {
        return Ok(None);
    };

    let messages: Vec<MessageRow> = sqlx::query_as(
        r#"
        SELECT id, role, content, created_at
        FROM messages
        WHERE chat_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(chat_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(ChatDetail::new(chat, messages)))
}

/// Atomically appends the paired user and assistant turns and advances
/// `updated_at`. Returns the refreshed chat, or `None` when the chat is
/// absent or owned by another user.
///
/// The `FOR UPDATE` row lock serializes concurrent appends against the same
/// chat, so observers never see an unpaired turn and total message order
/// stays well-defined.
pub async fn append_turn(
    pool: &PgPool,
    user_id: Uuid,
    chat_id: Uuid,
    user_content: &str,
    assistant_content: &str,
) -> Result<Option<ChatDetail>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let owned: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM chats WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(chat_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

    if owned.is_none() {
        return Ok(None);
    }

    // The assistant turn must sort strictly after its paired user turn.
    let user_ts = Utc::now();
    let assistant_ts = user_ts + Duration::microseconds(1);

    sqlx::query(
        r#"
        INSERT INTO messages (id, chat_id, role, content, created_at)
        VALUES ($1, $2, 'user', $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(chat_id)
    .bind(user_content)
    .bind(user_ts)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO messages (id, chat_id, role, content, created_at)
        VALUES ($1, $2, 'assistant', $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(chat_id)
    .bind(assistant_content)
    .bind(assistant_ts)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE chats SET updated_at = $1 WHERE id = $2")
        .bind(assistant_ts)
        .bind(chat_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!("Appended turn to chat {chat_id} for user {user_id}");

    get_chat(pool, user_id, chat_id).await
}
