//! Employee roster database operations

use shared::models::{Employee, EmployeeCreate, EmployeeStatus, EmployeeUpdate};
use shared::util::{now_millis, snowflake_id, today};
use sqlx::PgPool;

use super::BoxError;

pub async fn list(
    pool: &PgPool,
    store_id: Option<i64>,
    status: Option<EmployeeStatus>,
) -> Result<Vec<Employee>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM employees
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
          AND ($2::employee_status IS NULL OR status = $2)
        ORDER BY status, name
        "#,
    )
    .bind(store_id)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: EmployeeCreate) -> Result<Employee, BoxError> {
    let e = Employee::from_create(snowflake_id(), data, today(), now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO employees (
            id, store_id, name, role, hire_date, exit_date, status, exit_reason,
            source, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(e.id)
    .bind(e.store_id)
    .bind(&e.name)
    .bind(&e.role)
    .bind(e.hire_date)
    .bind(e.exit_date)
    .bind(e.status)
    .bind(&e.exit_reason)
    .bind(&e.source)
    .bind(e.created_at)
    .bind(e.updated_at)
    .execute(pool)
    .await?;
    Ok(e)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: EmployeeUpdate,
) -> Result<Option<Employee>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<Employee> =
        sqlx::query_as("SELECT * FROM employees WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut e) = existing else {
        return Ok(None);
    };
    e.apply_update(data, today(), now_millis())?;

    sqlx::query(
        r#"
        UPDATE employees
        SET name = $2, role = $3, hire_date = $4, exit_date = $5, status = $6,
            exit_reason = $7, source = $8, updated_at = $9
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&e.name)
    .bind(&e.role)
    .bind(e.hire_date)
    .bind(e.exit_date)
    .bind(e.status)
    .bind(&e.exit_reason)
    .bind(&e.source)
    .bind(e.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(e))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
