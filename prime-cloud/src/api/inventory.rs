//! Inventory catalog and count endpoints

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{
    InventoryCount, InventoryCountCreate, InventoryCountUpdate, InventoryItem,
    InventoryItemCreate, InventoryItemUpdate,
};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreQuery {
    pub store_id: Option<i64>,
}

/// GET /api/inventory/items?store_id=
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> ApiResult<Vec<InventoryItem>> {
    let items = db::inventory::list_items(&state.pool, query.store_id).await?;
    Ok(ApiResponse::new("items", items))
}

/// POST /api/inventory/items
pub async fn create_item(
    State(state): State<AppState>,
    Json(req): Json<InventoryItemCreate>,
) -> ApiResult<InventoryItem> {
    let item = db::inventory::create_item(&state.pool, req).await?;
    Ok(ApiResponse::new("item", item))
}

/// PUT /api/inventory/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<InventoryItemUpdate>,
) -> ApiResult<InventoryItem> {
    let item = db::inventory::update_item(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Inventory item"))?;
    Ok(ApiResponse::new("item", item))
}

/// DELETE /api/inventory/items/{id}
pub async fn delete_item(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(
        db::inventory::delete_item(&state.pool, id).await?,
        "Inventory item",
    )
}

/// GET /api/inventory/counts?store_id=
pub async fn list_counts(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> ApiResult<Vec<InventoryCount>> {
    let counts = db::inventory::list_counts(&state.pool, query.store_id).await?;
    Ok(ApiResponse::new("counts", counts))
}

/// POST /api/inventory/counts
pub async fn create_count(
    State(state): State<AppState>,
    Json(req): Json<InventoryCountCreate>,
) -> ApiResult<InventoryCount> {
    let count = db::inventory::create_count(&state.pool, req).await?;
    tracing::info!(
        store_id = count.store_id,
        lines = count.lines.len(),
        total_value = count.total_value,
        "Inventory count recorded"
    );
    Ok(ApiResponse::new("count", count))
}

/// PUT /api/inventory/counts/{id}
pub async fn update_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<InventoryCountUpdate>,
) -> ApiResult<InventoryCount> {
    let count = db::inventory::update_count(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Inventory count"))?;
    Ok(ApiResponse::new("count", count))
}

/// DELETE /api/inventory/counts/{id}
pub async fn delete_count(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(
        db::inventory::delete_count(&state.pool, id).await?,
        "Inventory count",
    )
}
