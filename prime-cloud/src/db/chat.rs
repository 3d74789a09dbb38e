//! Team chat database operations

use shared::models::{ChatChannel, ChatMessage, ChatMessageCreate, ChatMessageUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::BoxError;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

/// Newest first, capped at [`MAX_LIMIT`]
pub async fn list(
    pool: &PgPool,
    store_id: i64,
    channel: ChatChannel,
    limit: Option<i64>,
) -> Result<Vec<ChatMessage>, BoxError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM chat_messages
        WHERE store_id = $1 AND channel = $2
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(store_id)
    .bind(channel)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: ChatMessageCreate) -> Result<ChatMessage, BoxError> {
    let m = ChatMessage::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO chat_messages (
            id, store_id, channel, sender, text, pinned, announcement, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(m.id)
    .bind(m.store_id)
    .bind(m.channel)
    .bind(&m.sender)
    .bind(&m.text)
    .bind(m.pinned)
    .bind(m.announcement)
    .bind(m.created_at)
    .bind(m.updated_at)
    .execute(pool)
    .await?;
    Ok(m)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: ChatMessageUpdate,
) -> Result<Option<ChatMessage>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<ChatMessage> =
        sqlx::query_as("SELECT * FROM chat_messages WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut m) = existing else {
        return Ok(None);
    };
    m.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE chat_messages
        SET text = $2, pinned = $3, announcement = $4, updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&m.text)
    .bind(m.pinned)
    .bind(m.announcement)
    .bind(m.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(m))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM chat_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
