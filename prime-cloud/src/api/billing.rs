//! Billing endpoints: subscription checkout, session reconcile, portal

use axum::Extension;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};

use super::ApiResult;
use super::extract::{Json, Path};
use crate::auth::{SessionIdentity, Tier};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::stripe::{self, CheckoutSession, SubscriptionCheckout};
use crate::{db, email};

fn stripe_key(state: &AppState) -> Result<&str, AppError> {
    state
        .config
        .stripe
        .secret_key
        .as_deref()
        .ok_or_else(|| AppError::not_configured("Stripe"))
}

/// What a completed checkout session changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reconciled {
    MerchOrderPaid { order_id: i64 },
    Subscription { user_id: String, tier: String },
    Nothing,
}

/// Apply a completed checkout session. Safe to repeat: paid orders keep
/// their first `paid_at` and the customer row is an upsert.
pub(crate) async fn reconcile_session(
    state: &AppState,
    session: &CheckoutSession,
) -> ServiceResult<Reconciled> {
    if !session.is_complete() {
        return Ok(Reconciled::Nothing);
    }

    match session.mode.as_deref() {
        Some("payment") => {
            let Some(order_id) = session
                .client_reference_id
                .as_deref()
                .and_then(|id| id.parse::<i64>().ok())
            else {
                tracing::warn!(session_id = %session.id, "Payment session without order reference");
                return Ok(Reconciled::Nothing);
            };
            let Some((order, newly_paid)) =
                db::orders::mark_merch_paid(&state.pool, order_id, &session.id).await?
            else {
                tracing::warn!(order_id, "Checkout completed for unknown merch order");
                return Ok(Reconciled::Nothing);
            };
            if newly_paid {
                tracing::info!(order_id, session_id = %session.id, "Merch order paid");
                email::send_in_background(
                    state.http.clone(),
                    state.config.email.clone(),
                    email::merch_order_confirmation(&order),
                );
            }
            Ok(Reconciled::MerchOrderPaid { order_id })
        }
        Some("subscription") => {
            let user_id = session
                .client_reference_id
                .clone()
                .or_else(|| session.metadata.get("user_id").cloned());
            let (Some(user_id), Some(customer)) = (user_id, session.customer.as_deref()) else {
                tracing::warn!(session_id = %session.id, "Subscription session missing user or customer");
                return Ok(Reconciled::Nothing);
            };
            let tier = Tier::from_claim(
                session.metadata.get("tier").map(String::as_str).unwrap_or("pro"),
            );
            db::billing::upsert_customer(&state.pool, &user_id, customer, tier.as_str()).await?;
            tracing::info!(user_id = %user_id, customer_id = customer, tier = %tier, "Subscription linked");
            Ok(Reconciled::Subscription {
                user_id,
                tier: tier.as_str().to_string(),
            })
        }
        _ => Ok(Reconciled::Nothing),
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub tier: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub checkout_url: Option<String>,
}

/// POST /api/billing/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<CheckoutResponse> {
    let secret_key = stripe_key(&state)?;
    let price_id = match req.tier.trim().to_lowercase().as_str() {
        "pro" => state.config.stripe.pro_price_id.as_deref(),
        "basic" => state.config.stripe.basic_price_id.as_deref(),
        other => {
            return Err(AppError::validation(format!("Unknown tier: {other}")).into());
        }
    }
    .ok_or_else(|| AppError::not_configured("Stripe price"))?;
    let tier = Tier::from_claim(&req.tier);

    let existing = db::billing::find_customer(&state.pool, &identity.user_id).await?;
    let base = &state.config.app_base_url;
    let success_url = format!("{base}/billing?session_id={{CHECKOUT_SESSION_ID}}");
    let cancel_url = format!("{base}/billing?cancelled=1");

    let session = stripe::create_subscription_checkout(
        &state.http,
        secret_key,
        SubscriptionCheckout {
            price_id,
            tier: tier.as_str(),
            user_id: &identity.user_id,
            email: &identity.email,
            customer_id: existing.as_ref().map(|c| c.stripe_customer_id.as_str()),
            success_url: &success_url,
            cancel_url: &cancel_url,
        },
    )
    .await?;

    tracing::info!(user_id = %identity.user_id, tier = %tier, session_id = %session.id, "Checkout created");
    Ok(ApiResponse::new(
        "checkout",
        CheckoutResponse {
            session_id: session.id,
            checkout_url: session.url,
        },
    ))
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub id: String,
    pub mode: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub complete: bool,
    pub reconciled: Reconciled,
}

/// GET /api/billing/session/{id}
///
/// Retrieves the session and applies it when complete, so the front end
/// does not depend on webhook delivery after redirect.
pub async fn session(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionStatus> {
    stripe::validate_session_id(&session_id)?;
    let secret_key = stripe_key(&state)?;
    let session = stripe::retrieve_checkout_session(&state.http, secret_key, &session_id).await?;

    if session.mode.as_deref() == Some("subscription")
        && session.client_reference_id.as_deref() != Some(identity.user_id.as_str())
    {
        return Err(AppError::new(ErrorCode::PermissionDenied).into());
    }

    let reconciled = reconcile_session(&state, &session).await?;
    Ok(ApiResponse::new(
        "session",
        SessionStatus {
            complete: session.is_complete(),
            id: session.id,
            mode: session.mode,
            status: session.status,
            payment_status: session.payment_status,
            reconciled,
        },
    ))
}

#[derive(Debug, Serialize)]
pub struct PortalResponse {
    pub url: String,
}

/// POST /api/billing/portal
pub async fn portal(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<PortalResponse> {
    let secret_key = stripe_key(&state)?;
    let customer = db::billing::find_customer(&state.pool, &identity.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BillingCustomerNotFound))?;

    let return_url = format!("{}/billing", state.config.app_base_url);
    let url = stripe::create_billing_portal_session(
        &state.http,
        secret_key,
        &customer.stripe_customer_id,
        &return_url,
    )
    .await?;
    Ok(ApiResponse::new("portal", PortalResponse { url }))
}

#[derive(Debug, Serialize)]
pub struct BillingStatus {
    /// Tier carried by the current session token
    pub session_tier: Tier,
    /// Tier last reconciled from Stripe, if a customer is linked
    pub billed_tier: Option<String>,
    pub customer_linked: bool,
}

/// GET /api/billing
pub async fn status(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<BillingStatus> {
    let customer = db::billing::find_customer(&state.pool, &identity.user_id).await?;
    Ok(ApiResponse::new(
        "billing",
        BillingStatus {
            session_tier: identity.tier,
            customer_linked: customer.is_some(),
            billed_tier: customer.map(|c| c.tier),
        },
    ))
}
