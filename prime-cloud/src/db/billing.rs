//! Billing customer mapping and webhook idempotency

use shared::util::now_millis;
use sqlx::PgPool;

use super::BoxError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillingCustomer {
    pub user_id: String,
    pub stripe_customer_id: String,
    pub tier: String,
    pub updated_at: i64,
}

pub async fn find_customer(pool: &PgPool, user_id: &str) -> Result<Option<BillingCustomer>, BoxError> {
    let row = sqlx::query_as("SELECT * FROM billing_customers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn upsert_customer(
    pool: &PgPool,
    user_id: &str,
    stripe_customer_id: &str,
    tier: &str,
) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO billing_customers (user_id, stripe_customer_id, tier, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE
        SET stripe_customer_id = EXCLUDED.stripe_customer_id,
            tier = EXCLUDED.tier,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(user_id)
    .bind(stripe_customer_id)
    .bind(tier)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

/// Record a webhook event id. Returns `false` when it was already processed.
pub async fn record_webhook_event(
    pool: &PgPool,
    event_id: &str,
    event_type: &str,
) -> Result<bool, BoxError> {
    let result = sqlx::query(
        r#"
        INSERT INTO processed_webhook_events (event_id, event_type, processed_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (event_id) DO NOTHING
        "#,
    )
    .bind(event_id)
    .bind(event_type)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns `false` when no customer row matches
pub async fn set_tier_by_customer(
    pool: &PgPool,
    stripe_customer_id: &str,
    tier: &str,
) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE billing_customers SET tier = $2, updated_at = $3 WHERE stripe_customer_id = $1",
    )
    .bind(stripe_customer_id)
    .bind(tier)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Drop a recorded event so a provider retry is processed again
pub async fn forget_webhook_event(pool: &PgPool, event_id: &str) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM processed_webhook_events WHERE event_id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(())
}
