//! Marketing campaign database operations

use shared::models::{CampaignCreate, CampaignUpdate, MarketingCampaign};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::BoxError;

pub async fn list(pool: &PgPool, store_id: Option<i64>) -> Result<Vec<MarketingCampaign>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM marketing_campaigns
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
        ORDER BY start_date DESC NULLS LAST, created_at DESC
        "#,
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: CampaignCreate) -> Result<MarketingCampaign, BoxError> {
    let c = MarketingCampaign::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO marketing_campaigns (
            id, store_id, name, channel, start_date, end_date, spend, new_customers,
            avg_ticket, repeat_visits, customer_cac, customer_ltv, roi_multiple,
            revenue_attributed, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#,
    )
    .bind(c.id)
    .bind(c.store_id)
    .bind(&c.name)
    .bind(&c.channel)
    .bind(c.start_date)
    .bind(c.end_date)
    .bind(c.spend)
    .bind(c.new_customers)
    .bind(c.avg_ticket)
    .bind(c.repeat_visits)
    .bind(c.customer_cac)
    .bind(c.customer_ltv)
    .bind(c.roi_multiple)
    .bind(c.revenue_attributed)
    .bind(c.created_at)
    .bind(c.updated_at)
    .execute(pool)
    .await?;
    Ok(c)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: CampaignUpdate,
) -> Result<Option<MarketingCampaign>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<MarketingCampaign> =
        sqlx::query_as("SELECT * FROM marketing_campaigns WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut c) = existing else {
        return Ok(None);
    };
    c.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE marketing_campaigns
        SET name = $2, channel = $3, start_date = $4, end_date = $5, spend = $6,
            new_customers = $7, avg_ticket = $8, repeat_visits = $9, customer_cac = $10,
            customer_ltv = $11, roi_multiple = $12, revenue_attributed = $13, updated_at = $14
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&c.name)
    .bind(&c.channel)
    .bind(c.start_date)
    .bind(c.end_date)
    .bind(c.spend)
    .bind(c.new_customers)
    .bind(c.avg_ticket)
    .bind(c.repeat_visits)
    .bind(c.customer_cac)
    .bind(c.customer_ltv)
    .bind(c.roi_multiple)
    .bind(c.revenue_attributed)
    .bind(c.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(c))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM marketing_campaigns WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
