//! Stripe integration via REST API (no SDK dependency)

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use shared::error::AppError;
use shared::models::{MerchOrder, OrderItem};

use crate::outbound::OutboundError;

const API_BASE: &str = "https://api.stripe.com/v1";
const SERVICE: &str = "Stripe";

/// Webhook events older than this are rejected (replay protection)
const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Checkout Session as returned by create/retrieve
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    /// Completed and paid (or nothing to pay)
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
            && matches!(
                self.payment_status.as_deref(),
                Some("paid") | Some("no_payment_required")
            )
    }
}

/// Turn a Stripe JSON body into a value or the provider's error message
fn into_result(resp: serde_json::Value) -> Result<serde_json::Value, OutboundError> {
    if let Some(err) = resp.get("error") {
        let message = err["message"]
            .as_str()
            .unwrap_or("unknown Stripe error")
            .to_string();
        return Err(OutboundError::provider(SERVICE, message));
    }
    Ok(resp)
}

async fn post_form(
    client: &reqwest::Client,
    secret_key: &str,
    path: &str,
    form: &[(String, String)],
    idempotency_key: Option<&str>,
) -> Result<serde_json::Value, OutboundError> {
    let mut req = client
        .post(format!("{API_BASE}{path}"))
        .basic_auth(secret_key, None::<&str>)
        .form(form);
    if let Some(key) = idempotency_key {
        req = req.header("Idempotency-Key", key);
    }
    let resp: serde_json::Value = req
        .send()
        .await
        .map_err(OutboundError::http(SERVICE))?
        .json()
        .await
        .map_err(OutboundError::http(SERVICE))?;
    into_result(resp)
}

fn parse_session(value: serde_json::Value) -> Result<CheckoutSession, OutboundError> {
    serde_json::from_value(value).map_err(|e| OutboundError::unexpected(SERVICE, e.to_string()))
}

fn pair(k: impl Into<String>, v: impl Into<String>) -> (String, String) {
    (k.into(), v.into())
}

/// Parameters for a subscription checkout
pub struct SubscriptionCheckout<'a> {
    pub price_id: &'a str,
    pub tier: &'a str,
    pub user_id: &'a str,
    pub email: &'a str,
    /// Existing Stripe customer, reused when known
    pub customer_id: Option<&'a str>,
    pub success_url: &'a str,
    pub cancel_url: &'a str,
}

/// Create a Stripe Checkout Session (subscription mode)
pub async fn create_subscription_checkout(
    client: &reqwest::Client,
    secret_key: &str,
    params: SubscriptionCheckout<'_>,
) -> Result<CheckoutSession, OutboundError> {
    let mut form = vec![
        pair("mode", "subscription"),
        pair("line_items[0][price]", params.price_id),
        pair("line_items[0][quantity]", "1"),
        pair("success_url", params.success_url),
        pair("cancel_url", params.cancel_url),
        pair("allow_promotion_codes", "true"),
        pair("client_reference_id", params.user_id),
        pair("metadata[user_id]", params.user_id),
        pair("metadata[tier]", params.tier),
    ];
    match params.customer_id {
        Some(customer) => form.push(pair("customer", customer)),
        None if !params.email.is_empty() => form.push(pair("customer_email", params.email)),
        None => {}
    }

    let key = uuid::Uuid::new_v4().to_string();
    let resp = post_form(client, secret_key, "/checkout/sessions", &form, Some(&key)).await?;
    parse_session(resp)
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Build `line_items[...]` form fields for one order item.
///
/// Stripe quantities are integers; fractional quantities are sent as a
/// single line priced at the extended amount.
fn item_fields(index: usize, item: &OrderItem) -> Vec<(String, String)> {
    let (name, quantity, unit_amount) = if item.qty.fract() == 0.0 {
        (item.name.clone(), item.qty as i64, to_cents(item.price))
    } else {
        (
            format!("{} x {}", item.name, item.qty),
            1,
            to_cents(item.qty * item.price),
        )
    };
    let prefix = format!("line_items[{index}]");
    vec![
        pair(format!("{prefix}[price_data][currency]"), "usd"),
        pair(format!("{prefix}[price_data][product_data][name]"), name),
        pair(
            format!("{prefix}[price_data][unit_amount]"),
            unit_amount.to_string(),
        ),
        pair(format!("{prefix}[quantity]"), quantity.to_string()),
    ]
}

/// Line item fields for a merch order, tax as its own line
pub fn merch_line_items(order: &MerchOrder) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = order
        .items
        .iter()
        .enumerate()
        .flat_map(|(i, item)| item_fields(i, item))
        .collect();
    if order.tax > 0.0 {
        let tax = OrderItem {
            name: "Sales tax".into(),
            qty: 1.0,
            price: order.tax,
        };
        fields.extend(item_fields(order.items.len(), &tax));
    }
    fields
}

/// Create a one-off payment Checkout Session for a merch order.
///
/// The order id is the `client_reference_id`, so the session can be created
/// before the order row exists.
pub async fn create_merch_checkout(
    client: &reqwest::Client,
    secret_key: &str,
    order: &MerchOrder,
    success_url: &str,
    cancel_url: &str,
) -> Result<CheckoutSession, OutboundError> {
    let order_id = order.id.to_string();
    let mut form = vec![
        pair("mode", "payment"),
        pair("success_url", success_url),
        pair("cancel_url", cancel_url),
        pair("client_reference_id", order_id.as_str()),
        pair("customer_email", order.customer_email.as_str()),
        pair("metadata[merch_order_id]", order_id.as_str()),
    ];
    form.extend(merch_line_items(order));

    let key = format!("merch-{order_id}");
    let resp = post_form(client, secret_key, "/checkout/sessions", &form, Some(&key)).await?;
    parse_session(resp)
}

/// Reject a client-supplied session id before it is spliced into a URL path
pub fn validate_session_id(session_id: &str) -> Result<(), AppError> {
    if session_id.is_empty() || !session_id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(AppError::validation("Invalid checkout session id"));
    }
    Ok(())
}

/// Retrieve a Checkout Session by id. Callers check the id with
/// [`validate_session_id`] first.
pub async fn retrieve_checkout_session(
    client: &reqwest::Client,
    secret_key: &str,
    session_id: &str,
) -> Result<CheckoutSession, OutboundError> {
    let resp: serde_json::Value = client
        .get(format!("{API_BASE}/checkout/sessions/{session_id}"))
        .basic_auth(secret_key, None::<&str>)
        .send()
        .await
        .map_err(OutboundError::http(SERVICE))?
        .json()
        .await
        .map_err(OutboundError::http(SERVICE))?;
    parse_session(into_result(resp)?)
}

/// Create a Stripe Billing Portal session, returning its URL
pub async fn create_billing_portal_session(
    client: &reqwest::Client,
    secret_key: &str,
    customer_id: &str,
    return_url: &str,
) -> Result<String, OutboundError> {
    let form = [pair("customer", customer_id), pair("return_url", return_url)];
    let resp = post_form(client, secret_key, "/billing_portal/sessions", &form, None).await?;

    resp["url"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| OutboundError::unexpected(SERVICE, "billing portal session has no url"))
}

/// Verify Stripe webhook signature (HMAC-SHA256)
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    verify_webhook_signature_at(payload, sig_header, secret, chrono::Utc::now().timestamp())
}

fn verify_webhook_signature_at(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
    now: i64,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signatures = Vec::new();
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signatures.push(v);
        }
    }

    if timestamp.is_empty() || signatures.is_empty() {
        return Err("Invalid Stripe-Signature header");
    }

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    // Any v1 signature may match (secret rotation sends several)
    let matched = signatures.iter().any(|sig| {
        hex::decode(sig)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });
    if !matched {
        return Err("Webhook signature mismatch");
    }

    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    if (now - ts).abs() > WEBHOOK_TOLERANCE_SECS {
        return Err("Webhook timestamp too old");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MerchOrderStatus;

    fn sign(payload: &[u8], secret: &str, ts: i64) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{ts}.").as_bytes());
        mac.update(payload);
        format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);
        assert!(verify_webhook_signature_at(payload, &header, "whsec_test", 1_700_000_010).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let header = sign(b"{\"id\":\"evt_1\"}", "whsec_test", 1_700_000_000);
        let result =
            verify_webhook_signature_at(b"{\"id\":\"evt_2\"}", &header, "whsec_test", 1_700_000_000);
        assert_eq!(result, Err("Webhook signature mismatch"));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = b"{}";
        let header = sign(payload, "whsec_test", 1_700_000_000);
        let result = verify_webhook_signature_at(payload, &header, "whsec_test", 1_700_001_000);
        assert_eq!(result, Err("Webhook timestamp too old"));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let result = verify_webhook_signature_at(b"{}", "garbage", "whsec_test", 0);
        assert_eq!(result, Err("Invalid Stripe-Signature header"));
    }

    #[test]
    fn test_rotated_secret_second_signature_matches() {
        let payload = b"{}";
        let good = sign(payload, "whsec_new", 1_700_000_000);
        let header = format!("{good},v1={}", "00".repeat(32));
        assert!(verify_webhook_signature_at(payload, &header, "whsec_new", 1_700_000_000).is_ok());
    }

    #[test]
    fn test_merch_line_items_include_tax() {
        let order = MerchOrder {
            id: 42,
            store_id: None,
            customer_name: "Ana".into(),
            customer_email: "ana@example.com".into(),
            items: vec![
                OrderItem {
                    name: "T-shirt".into(),
                    qty: 2.0,
                    price: 20.0,
                },
                OrderItem {
                    name: "Sauce".into(),
                    qty: 1.5,
                    price: 4.0,
                },
            ],
            subtotal: 46.0,
            tax: 3.45,
            total: 49.45,
            status: MerchOrderStatus::Pending,
            checkout_session_id: None,
            paid_at: None,
            created_at: 0,
            updated_at: 0,
        };
        let fields: HashMap<String, String> = merch_line_items(&order).into_iter().collect();
        assert_eq!(fields["line_items[0][quantity]"], "2");
        assert_eq!(fields["line_items[0][price_data][unit_amount]"], "2000");
        assert_eq!(fields["line_items[1][quantity]"], "1");
        assert_eq!(fields["line_items[1][price_data][unit_amount]"], "600");
        assert_eq!(fields["line_items[2][price_data][product_data][name]"], "Sales tax");
        assert_eq!(fields["line_items[2][price_data][unit_amount]"], "345");
    }

    #[test]
    fn test_session_completion() {
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_test_1",
            "status": "complete",
            "payment_status": "paid",
            "customer": "cus_1",
            "metadata": {"tier": "pro"}
        }))
        .unwrap();
        assert!(session.is_complete());
        assert_eq!(session.metadata["tier"], "pro");
    }

    #[test]
    fn test_error_body_is_provider_error() {
        let err = into_result(serde_json::json!({"error": {"message": "No such customer"}}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Stripe: No such customer");
    }

    #[test]
    fn test_session_id_checked_before_request() {
        assert!(validate_session_id("cs_test_a1B2c3").is_ok());
        for bad in ["", "cs_test/../../customers", "cs test", "cs_test?expand=x"] {
            let err = validate_session_id(bad).unwrap_err();
            assert_eq!(err.code, shared::error::ErrorCode::ValidationFailed);
            assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        }
    }
}
