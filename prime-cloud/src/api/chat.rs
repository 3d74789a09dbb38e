//! Team chat endpoints

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{ChatChannel, ChatMessage, ChatMessageCreate, ChatMessageUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub store_id: Option<i64>,
    pub channel: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/chat?store_id=&channel=&limit=
///
/// Newest first; `channel` defaults to `general`.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> ApiResult<Vec<ChatMessage>> {
    let store_id = query.store_id.ok_or_else(|| AppError::required("store_id"))?;
    let channel = match query.channel.as_deref() {
        Some(name) => name.parse::<ChatChannel>()?,
        None => ChatChannel::General,
    };
    let messages = db::chat::list(&state.pool, store_id, channel, query.limit).await?;
    Ok(ApiResponse::new("messages", messages))
}

/// POST /api/chat
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ChatMessageCreate>,
) -> ApiResult<ChatMessage> {
    let message = db::chat::create(&state.pool, req).await?;
    Ok(ApiResponse::new("message", message))
}

/// PUT /api/chat/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ChatMessageUpdate>,
) -> ApiResult<ChatMessage> {
    let message = db::chat::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Message"))?;
    Ok(ApiResponse::new("message", message))
}

/// DELETE /api/chat/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::chat::delete(&state.pool, id).await?, "Message")
}
