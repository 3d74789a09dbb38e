//! Schedule (shift) database operations

use chrono::{Duration, NaiveDate};
use shared::models::{Shift, ShiftCreate, ShiftUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::BoxError;

/// Shifts dated within `[week, week + 6]`, ordered by date then start time
pub async fn list_week(
    pool: &PgPool,
    store_id: Option<i64>,
    week: NaiveDate,
) -> Result<Vec<Shift>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM shifts
        WHERE shift_date BETWEEN $1 AND $2
          AND ($3::BIGINT IS NULL OR store_id = $3)
        ORDER BY shift_date, start_time
        "#,
    )
    .bind(week)
    .bind(week + Duration::days(6))
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: ShiftCreate) -> Result<Shift, BoxError> {
    let shift = Shift::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO shifts (
            id, store_id, employee_name, role, shift_date, start_time, end_time,
            hours, labor_cost, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(shift.id)
    .bind(shift.store_id)
    .bind(&shift.employee_name)
    .bind(&shift.role)
    .bind(shift.shift_date)
    .bind(&shift.start_time)
    .bind(&shift.end_time)
    .bind(shift.hours)
    .bind(shift.labor_cost)
    .bind(&shift.notes)
    .bind(shift.created_at)
    .bind(shift.updated_at)
    .execute(pool)
    .await?;
    Ok(shift)
}

/// Merge onto the stored row; hours and labor cost follow the merged values
pub async fn update(pool: &PgPool, id: i64, data: ShiftUpdate) -> Result<Option<Shift>, BoxError> {
    let mut tx = pool.begin().await?;

    let existing: Option<Shift> = sqlx::query_as("SELECT * FROM shifts WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(mut shift) = existing else {
        return Ok(None);
    };
    shift.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE shifts
        SET employee_name = $2, role = $3, shift_date = $4, start_time = $5,
            end_time = $6, hours = $7, labor_cost = $8, notes = $9, updated_at = $10
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&shift.employee_name)
    .bind(&shift.role)
    .bind(shift.shift_date)
    .bind(&shift.start_time)
    .bind(&shift.end_time)
    .bind(shift.hours)
    .bind(shift.labor_cost)
    .bind(&shift.notes)
    .bind(shift.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(shift))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
