//! API routes for prime-cloud
//!
//! Everything under `/api` sits behind the session guard. Resource groups
//! additionally check database connectivity; the analytics, invoice scan and
//! place search groups are gated by subscription tier.

pub mod analytics;
pub mod billing;
pub mod campaigns;
pub mod chat;
pub mod contacts;
pub mod employees;
pub mod extract;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod kpis;
pub mod merch_orders;
pub mod party_orders;
pub mod places;
pub mod recipes;
pub mod schedules;
pub mod stores;
pub mod stripe_webhook;
pub mod tasks;

use axum::extract::{DefaultBodyLimit, Request};
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use shared::error::{ApiResponse, AppError};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::auth::database::require_database;
use crate::auth::session::require_session;
use crate::auth::tier::{Feature, require_tier};
use crate::error::ServiceError;
use crate::state::AppState;

/// Handler result: `{ok: true, <key>: data}` or a mapped error
pub(crate) type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Base64 invoice photos run larger than the default 2 MB body limit
const SCAN_BODY_LIMIT: usize = 8 * 1024 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared tail of every DELETE handler
pub(crate) fn deleted(removed: bool, resource: &str) -> ApiResult<()> {
    if removed {
        Ok(ApiResponse::ok())
    } else {
        Err(AppError::not_found(resource).into())
    }
}

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        // Stores
        .route("/api/stores", get(stores::list).post(stores::create))
        .route(
            "/api/stores/{id}",
            get(stores::get).put(stores::update).delete(stores::delete),
        )
        // Daily KPIs
        .route("/api/kpis", get(kpis::list).post(kpis::upsert))
        .route("/api/kpis/{id}", put(kpis::update).delete(kpis::delete))
        // Schedules
        .route("/api/schedules", get(schedules::list).post(schedules::create))
        .route(
            "/api/schedules/{id}",
            put(schedules::update).delete(schedules::delete),
        )
        // Tasks
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/{id}", put(tasks::update).delete(tasks::delete))
        .route("/api/tasks/{id}/complete", post(tasks::complete))
        // Inventory
        .route(
            "/api/inventory/items",
            get(inventory::list_items).post(inventory::create_item),
        )
        .route(
            "/api/inventory/items/{id}",
            put(inventory::update_item).delete(inventory::delete_item),
        )
        .route(
            "/api/inventory/counts",
            get(inventory::list_counts).post(inventory::create_count),
        )
        .route(
            "/api/inventory/counts/{id}",
            put(inventory::update_count).delete(inventory::delete_count),
        )
        // Invoices
        .route("/api/invoices", get(invoices::list).post(invoices::create))
        .route(
            "/api/invoices/{id}",
            put(invoices::update).delete(invoices::delete),
        )
        // Recipes and campaigns
        .route("/api/recipes", get(recipes::list).post(recipes::create))
        .route("/api/recipes/{id}", put(recipes::update).delete(recipes::delete))
        .route("/api/campaigns", get(campaigns::list).post(campaigns::create))
        .route(
            "/api/campaigns/{id}",
            put(campaigns::update).delete(campaigns::delete),
        )
        // Orders
        .route(
            "/api/party-orders",
            get(party_orders::list).post(party_orders::create),
        )
        .route(
            "/api/party-orders/{id}",
            put(party_orders::update).delete(party_orders::delete),
        )
        .route(
            "/api/merch-orders",
            get(merch_orders::list).post(merch_orders::create),
        )
        .route(
            "/api/merch-orders/{id}",
            put(merch_orders::update).delete(merch_orders::delete),
        )
        // People
        .route("/api/employees", get(employees::list).post(employees::create))
        .route(
            "/api/employees/{id}",
            put(employees::update).delete(employees::delete),
        )
        .route("/api/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/api/contacts/{id}",
            put(contacts::update).delete(contacts::delete),
        )
        .route("/api/chat", get(chat::list).post(chat::create))
        .route("/api/chat/{id}", put(chat::update).delete(chat::delete))
        // Billing
        .route("/api/billing", get(billing::status))
        .route("/api/billing/checkout", post(billing::checkout))
        .route("/api/billing/session/{id}", get(billing::session))
        .route("/api/billing/portal", post(billing::portal))
}

/// Wrap a pro-gated group: database check inside, tier check outside
fn gated(routes: Router<AppState>, state: &AppState, feature: Feature) -> Router<AppState> {
    routes
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_database,
        ))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), feature),
            require_tier,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let resources = resource_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_database,
    ));

    let analytics = gated(
        Router::new()
            .route(
                "/api/analytics/sales-comparison",
                get(analytics::sales_comparison),
            )
            .route("/api/analytics/live-pnl", get(analytics::live_pnl))
            .route("/api/analytics/labor-plan", get(analytics::labor_plan))
            .route("/api/analytics/employees", get(analytics::employees)),
        &state,
        Feature::Analytics,
    );

    let scan = gated(
        Router::new()
            .route("/api/invoices/scan", post(invoices::scan))
            .layer(DefaultBodyLimit::max(SCAN_BODY_LIMIT)),
        &state,
        Feature::InvoiceScan,
    );

    let places = gated(
        Router::new()
            .route("/api/places/search", get(places::search))
            .route("/api/places/{place_id}", get(places::details)),
        &state,
        Feature::Places,
    );

    // Session guard runs first on every /api route
    let protected = Router::new()
        .merge(resources)
        .merge(analytics)
        .merge(scan)
        .merge(places)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // Stripe webhook (signature-verified, raw body)
    let webhook = Router::new().route("/stripe/webhook", post(stripe_webhook::handle_webhook));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(webhook)
        .merge(protected)
        .fallback(route_not_found)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    path = %request.uri().path(),
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::test_token;
    use crate::config::Config;
    use axum::body::Body;
    use http::StatusCode;
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    /// Router over a pool that never connects; gates reject before any query
    fn test_app() -> Router {
        let config = Config::from_lookup(|name| match name {
            "DATABASE_URL" => Some("postgres://localhost:1/prime_test".to_string()),
            "AUTH_JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        create_router(AppState::from_parts(config, pool).unwrap())
    }

    fn get_request(uri: &str, token: Option<&str>) -> http::Request<Body> {
        let mut builder = http::Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = test_app()
            .oneshot(get_request("/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["service"], "prime-cloud");
    }

    #[tokio::test]
    async fn test_api_requires_session() {
        let response = test_app()
            .oneshot(get_request("/api/stores", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_bad_token_rejected() {
        let token = test_token("some-other-secret", "user-1", Some("pro"));
        let response = test_app()
            .oneshot(get_request("/api/stores", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_basic_tier_blocked_from_analytics() {
        let token = test_token(SECRET, "user-1", Some("basic"));
        let response = test_app()
            .oneshot(get_request("/api/analytics/live-pnl", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_basic_tier_blocked_from_places() {
        let token = test_token(SECRET, "user-1", None);
        let response = test_app()
            .oneshot(get_request("/api/places/search?query=pizza", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let token = test_token(SECRET, "user-1", Some("pro"));
        let response = test_app()
            .oneshot(get_request("/api/nothing-here", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_webhook_without_secret_is_unavailable() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/stripe/webhook")
            .body(Body::from("{}"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_deleted_helper() {
        assert!(deleted(true, "Task").is_ok());
        let err: AppError = deleted(false, "Task").unwrap_err().into();
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }
}
