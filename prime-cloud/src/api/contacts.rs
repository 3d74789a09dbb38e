//! Trusted contact endpoints

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{TrustedContact, TrustedContactCreate, TrustedContactUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub store_id: Option<i64>,
    pub category: Option<String>,
}

/// GET /api/contacts?category=&store_id=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> ApiResult<Vec<TrustedContact>> {
    let contacts =
        db::contacts::list(&state.pool, query.store_id, query.category.as_deref()).await?;
    Ok(ApiResponse::new("contacts", contacts))
}

/// POST /api/contacts
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<TrustedContactCreate>,
) -> ApiResult<TrustedContact> {
    let contact = db::contacts::create(&state.pool, req).await?;
    Ok(ApiResponse::new("contact", contact))
}

/// PUT /api/contacts/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<TrustedContactUpdate>,
) -> ApiResult<TrustedContact> {
    let contact = db::contacts::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Contact"))?;
    Ok(ApiResponse::new("contact", contact))
}

/// DELETE /api/contacts/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::contacts::delete(&state.pool, id).await?, "Contact")
}
