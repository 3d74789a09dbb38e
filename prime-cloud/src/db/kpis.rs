//! Daily KPI database operations
//!
//! One row per (store, business_date); POST is an upsert on that key.

use chrono::NaiveDate;
use shared::models::{DailyKpi, DailyKpiInput, DailyKpiUpdate};
use shared::util::{now_millis, snowflake_id, today};
use sqlx::PgPool;

use super::BoxError;

pub async fn list(
    pool: &PgPool,
    store_id: Option<i64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<DailyKpi>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM daily_kpis
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
          AND ($2::DATE IS NULL OR business_date >= $2)
          AND ($3::DATE IS NULL OR business_date <= $3)
        ORDER BY business_date DESC, store_id
        "#,
    )
    .bind(store_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert or overwrite the row for (store, business_date)
pub async fn upsert(pool: &PgPool, data: DailyKpiInput) -> Result<DailyKpi, BoxError> {
    let now = now_millis();
    let business_date = data.business_date.unwrap_or_else(today);
    let row = sqlx::query_as(
        r#"
        INSERT INTO daily_kpis (
            id, store_id, business_date, net_sales, labor_dollars, labor_hours,
            food_dollars, disposables_dollars, voids_dollars, waste_dollars,
            customer_count, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        ON CONFLICT (store_id, business_date)
        DO UPDATE SET
            net_sales = EXCLUDED.net_sales, labor_dollars = EXCLUDED.labor_dollars,
            labor_hours = EXCLUDED.labor_hours, food_dollars = EXCLUDED.food_dollars,
            disposables_dollars = EXCLUDED.disposables_dollars,
            voids_dollars = EXCLUDED.voids_dollars, waste_dollars = EXCLUDED.waste_dollars,
            customer_count = EXCLUDED.customer_count, notes = EXCLUDED.notes,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(data.store_id)
    .bind(business_date)
    .bind(data.net_sales)
    .bind(data.labor_dollars)
    .bind(data.labor_hours)
    .bind(data.food_dollars)
    .bind(data.disposables_dollars)
    .bind(data.voids_dollars)
    .bind(data.waste_dollars)
    .bind(data.customer_count)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: DailyKpiUpdate,
) -> Result<Option<DailyKpi>, BoxError> {
    let mut tx = pool.begin().await?;

    let existing: Option<DailyKpi> =
        sqlx::query_as("SELECT * FROM daily_kpis WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut row) = existing else {
        return Ok(None);
    };
    row.apply_update(data);
    row.updated_at = now_millis();

    sqlx::query(
        r#"
        UPDATE daily_kpis
        SET net_sales = $2, labor_dollars = $3, labor_hours = $4, food_dollars = $5,
            disposables_dollars = $6, voids_dollars = $7, waste_dollars = $8,
            customer_count = $9, notes = $10, updated_at = $11
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(row.net_sales)
    .bind(row.labor_dollars)
    .bind(row.labor_hours)
    .bind(row.food_dollars)
    .bind(row.disposables_dollars)
    .bind(row.voids_dollars)
    .bind(row.waste_dollars)
    .bind(row.customer_count)
    .bind(&row.notes)
    .bind(row.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(row))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM daily_kpis WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
