//! Application state for prime-cloud

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state, cloned per request
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Outbound HTTP client (Stripe, email, model and places APIs)
    pub http: reqwest::Client,
    /// Immutable configuration (secrets, tier policy)
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect the pool and run embedded migrations
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Self::from_parts(config, pool)
    }

    /// Assemble state around an existing pool
    pub fn from_parts(config: Config, pool: PgPool) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("prime-cloud/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            pool,
            http,
            config: Arc::new(config),
        })
    }
}
