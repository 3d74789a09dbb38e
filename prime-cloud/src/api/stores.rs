//! Store endpoints

use axum::extract::State;
use shared::error::{ApiResponse, AppError};
use shared::models::{Store, StoreCreate, StoreUpdate};

use super::ApiResult;
use super::extract::{Json, Path};
use crate::db;
use crate::state::AppState;

/// GET /api/stores
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Store>> {
    let stores = db::stores::list(&state.pool).await?;
    Ok(ApiResponse::new("stores", stores))
}

/// GET /api/stores/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Store> {
    let store = db::stores::find(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Store"))?;
    Ok(ApiResponse::new("store", store))
}

/// POST /api/stores
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<StoreCreate>,
) -> ApiResult<Store> {
    let store = db::stores::create(&state.pool, req).await?;
    tracing::info!(store_id = store.id, slug = %store.slug, "Store created");
    Ok(ApiResponse::new("store", store))
}

/// PUT /api/stores/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StoreUpdate>,
) -> ApiResult<Store> {
    let store = db::stores::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Store"))?;
    Ok(ApiResponse::new("store", store))
}

/// DELETE /api/stores/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::stores::delete(&state.pool, id).await?, "Store")
}
