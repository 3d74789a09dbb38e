//! Party (catering) order endpoints

use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{ApprovalStatus, PartyOrder, PartyOrderCreate, PartyOrderUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::state::AppState;
use crate::{db, email};

#[derive(Debug, Deserialize)]
pub struct PartyOrderQuery {
    pub store_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<ApprovalStatus>,
}

/// GET /api/party-orders?store_id=&from=&to=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PartyOrderQuery>,
) -> ApiResult<Vec<PartyOrder>> {
    let orders = db::orders::list_party(
        &state.pool,
        query.store_id,
        query.from,
        query.to,
        query.status,
    )
    .await?;
    Ok(ApiResponse::new("orders", orders))
}

/// POST /api/party-orders
///
/// A confirmation goes to the customer when an address was given.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<PartyOrderCreate>,
) -> ApiResult<PartyOrder> {
    let order = db::orders::create_party(&state.pool, req).await?;
    tracing::info!(
        order_id = order.id,
        store_id = order.store_id,
        event_date = %order.event_date,
        total = order.total,
        "Party order created"
    );

    let store_name = match db::stores::find(&state.pool, order.store_id).await {
        Ok(Some(store)) => store.name,
        Ok(None) => "PrimeOS".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Store lookup for confirmation failed");
            "PrimeOS".to_string()
        }
    };
    if let Some(message) = email::party_order_confirmation(&order, &store_name) {
        email::send_in_background(state.http.clone(), state.config.email.clone(), message);
    }

    Ok(ApiResponse::new("order", order))
}

/// PUT /api/party-orders/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PartyOrderUpdate>,
) -> ApiResult<PartyOrder> {
    let order = db::orders::update_party(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Party order"))?;
    Ok(ApiResponse::new("order", order))
}

/// DELETE /api/party-orders/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(
        db::orders::delete_party(&state.pool, id).await?,
        "Party order",
    )
}
