//! Stripe webhook handler
//!
//! POST /stripe/webhook: raw body for signature verification, no session.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use shared::error::AppError;

use crate::db;
use crate::state::AppState;
use crate::stripe::{self, CheckoutSession};

use super::billing::reconcile_session;

/// Handle incoming Stripe webhook events
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(webhook_secret) = state.config.stripe.webhook_secret.as_deref() else {
        tracing::warn!("Stripe webhook received but STRIPE_WEBHOOK_SECRET is not set");
        return StatusCode::SERVICE_UNAVAILABLE;
    };

    // 1. Signature
    let sig_header = match headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            tracing::warn!("Missing Stripe-Signature header");
            return StatusCode::BAD_REQUEST;
        }
    };
    if let Err(e) = stripe::verify_webhook_signature(&body, sig_header, webhook_secret) {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return StatusCode::BAD_REQUEST;
    }

    // 2. Parse
    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return StatusCode::BAD_REQUEST;
        }
    };
    let event_type = event["type"].as_str().unwrap_or("");
    let Some(event_id) = event["id"].as_str() else {
        tracing::warn!("Webhook event missing id");
        return StatusCode::BAD_REQUEST;
    };
    tracing::info!(event_id, event_type, "Received Stripe webhook");

    // 3. Idempotency: insert first, skip when the id was already recorded
    match db::billing::record_webhook_event(&state.pool, event_id, event_type).await {
        Ok(false) => {
            tracing::info!(event_id, "Duplicate webhook event, skipping");
            return StatusCode::OK;
        }
        Ok(true) => {}
        Err(e) => {
            tracing::error!(%e, "DB error recording webhook event");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    // 4. Dispatch
    let status = match event_type {
        "checkout.session.completed" => handle_checkout_completed(&state, &event).await,
        "customer.subscription.deleted" => handle_subscription_deleted(&state, &event).await,
        _ => {
            tracing::debug!(event_type, "Unhandled webhook event type");
            StatusCode::OK
        }
    };

    // Failed events stay retryable
    if status.is_server_error() {
        if let Err(e) = db::billing::forget_webhook_event(&state.pool, event_id).await {
            tracing::error!(%e, event_id, "Failed to release webhook event for retry");
        }
    }
    status
}

/// checkout.session.completed → merch order paid, or subscription linked
async fn handle_checkout_completed(state: &AppState, event: &serde_json::Value) -> StatusCode {
    let Some(obj) = event.get("data").and_then(|d| d.get("object")) else {
        return StatusCode::OK;
    };
    let session: CheckoutSession = match serde_json::from_value(obj.clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(%e, "checkout.session.completed with unreadable session");
            return StatusCode::OK;
        }
    };

    match reconcile_session(state, &session).await {
        Ok(outcome) => {
            tracing::info!(session_id = %session.id, ?outcome, "Checkout session reconciled");
            StatusCode::OK
        }
        Err(e) => {
            let err: AppError = e.into();
            tracing::error!(
                session_id = %session.id,
                error = %err.message,
                "Checkout reconcile failed"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// customer.subscription.deleted → back to basic
async fn handle_subscription_deleted(state: &AppState, event: &serde_json::Value) -> StatusCode {
    let Some(customer_id) = event["data"]["object"]["customer"].as_str() else {
        tracing::warn!("customer.subscription.deleted missing customer");
        return StatusCode::OK;
    };

    match db::billing::set_tier_by_customer(&state.pool, customer_id, "basic").await {
        Ok(true) => {
            tracing::info!(customer_id, "Subscription ended, tier reset to basic");
            StatusCode::OK
        }
        Ok(false) => {
            tracing::warn!(customer_id, "No billing customer for ended subscription");
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(%e, "Failed to reset tier");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
