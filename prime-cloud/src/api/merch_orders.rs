//! Merch order endpoints
//!
//! With `checkout: true` the Stripe session is created first, keyed by the
//! pre-generated order id, and the order is then written once with the
//! session id already set.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError};
use shared::models::{MerchOrder, MerchOrderCreate, MerchOrderStatus, MerchOrderUpdate};
use shared::util::{now_millis, snowflake_id};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::state::AppState;
use crate::{db, email, stripe};

#[derive(Debug, Deserialize)]
pub struct MerchOrderQuery {
    pub store_id: Option<i64>,
    pub status: Option<MerchOrderStatus>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMerchOrder {
    #[serde(flatten)]
    pub order: MerchOrder,
    /// Hosted checkout page, when checkout was requested
    pub checkout_url: Option<String>,
}

/// GET /api/merch-orders?store_id=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MerchOrderQuery>,
) -> ApiResult<Vec<MerchOrder>> {
    let orders = db::orders::list_merch(&state.pool, query.store_id, query.status).await?;
    Ok(ApiResponse::new("orders", orders))
}

/// POST /api/merch-orders
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<MerchOrderCreate>,
) -> ApiResult<CreatedMerchOrder> {
    let wants_checkout = req.checkout;
    let mut order = MerchOrder::from_create(snowflake_id(), req, None, now_millis())?;

    let mut checkout_url = None;
    if wants_checkout {
        let secret_key = state
            .config
            .stripe
            .secret_key
            .as_deref()
            .ok_or_else(|| AppError::not_configured("Stripe"))?;
        let base = &state.config.app_base_url;
        let success_url = format!(
            "{base}/merch?order={}&session_id={{CHECKOUT_SESSION_ID}}",
            order.id
        );
        let cancel_url = format!("{base}/merch?order={}&cancelled=1", order.id);

        let session =
            stripe::create_merch_checkout(&state.http, secret_key, &order, &success_url, &cancel_url)
                .await?;
        order.checkout_session_id = Some(session.id);
        checkout_url = session.url;
    }

    db::orders::insert_merch(&state.pool, &order).await?;
    tracing::info!(
        order_id = order.id,
        total = order.total,
        checkout = wants_checkout,
        "Merch order created"
    );

    // Checkout orders are confirmed once payment lands
    if !wants_checkout {
        email::send_in_background(
            state.http.clone(),
            state.config.email.clone(),
            email::merch_order_confirmation(&order),
        );
    }

    Ok(ApiResponse::new(
        "order",
        CreatedMerchOrder {
            order,
            checkout_url,
        },
    ))
}

/// PUT /api/merch-orders/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MerchOrderUpdate>,
) -> ApiResult<MerchOrder> {
    let order = db::orders::update_merch(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Merch order"))?;
    Ok(ApiResponse::new("order", order))
}

/// DELETE /api/merch-orders/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(
        db::orders::delete_merch(&state.pool, id).await?,
        "Merch order",
    )
}
