//! prime-cloud: PrimeOS dashboard backend
//!
//! Long-running service that:
//! - Stores per-store operating data (KPIs, schedules, tasks, inventory, orders, people)
//! - Computes analytics folds over that data (sales comparison, live P&L, labor plan)
//! - Gates pro features by the subscription tier in the session JWT
//! - Reconciles Stripe checkouts and webhooks

mod analytics;
mod api;
mod auth;
mod config;
mod db;
mod email;
mod error;
mod ocr;
mod outbound;
mod places;
mod state;
mod stripe;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing (JSON lines outside development)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "prime_cloud=info,tower_http=info".into());
    if config.is_development() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    }

    tracing::info!("Starting prime-cloud (env: {})", config.environment);

    let http_port = config.http_port;
    let state = AppState::new(config).await?;
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("prime-cloud HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("prime-cloud stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
