//! Read-only queries feeding the aggregation folds

use sqlx::PgPool;

use super::BoxError;
use crate::analytics::{DateRange, SalesPoint};

/// `net_sales` per KPI row inside `range` (inclusive)
pub async fn sales_points(
    pool: &PgPool,
    range: DateRange,
    store_id: Option<i64>,
) -> Result<Vec<SalesPoint>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT business_date, net_sales FROM daily_kpis
        WHERE business_date >= $1 AND business_date <= $2
          AND ($3::BIGINT IS NULL OR store_id = $3)
        ORDER BY business_date
        "#,
    )
    .bind(range.from)
    .bind(range.to)
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
