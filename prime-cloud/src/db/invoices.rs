//! Vendor invoice database operations

use shared::models::{ApprovalStatus, Invoice, InvoiceCreate, InvoiceUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;
use sqlx::types::Json;

use super::BoxError;

pub async fn list(
    pool: &PgPool,
    store_id: Option<i64>,
    status: Option<ApprovalStatus>,
) -> Result<Vec<Invoice>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM invoices
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
          AND ($2::approval_status IS NULL OR status = $2)
        ORDER BY invoice_date DESC, created_at DESC
        "#,
    )
    .bind(store_id)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: InvoiceCreate) -> Result<Invoice, BoxError> {
    let invoice = Invoice::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, store_id, vendor, invoice_date, invoice_number, line_items,
            total, status, approved_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(invoice.id)
    .bind(invoice.store_id)
    .bind(&invoice.vendor)
    .bind(invoice.invoice_date)
    .bind(&invoice.invoice_number)
    .bind(Json(&invoice.line_items))
    .bind(invoice.total)
    .bind(invoice.status)
    .bind(invoice.approved_at)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(pool)
    .await?;
    Ok(invoice)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: InvoiceUpdate,
) -> Result<Option<Invoice>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<Invoice> =
        sqlx::query_as("SELECT * FROM invoices WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut invoice) = existing else {
        return Ok(None);
    };
    invoice.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE invoices
        SET vendor = $2, invoice_date = $3, invoice_number = $4, line_items = $5,
            total = $6, status = $7, approved_at = $8, updated_at = $9
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&invoice.vendor)
    .bind(invoice.invoice_date)
    .bind(&invoice.invoice_number)
    .bind(Json(&invoice.line_items))
    .bind(invoice.total)
    .bind(invoice.status)
    .bind(invoice.approved_at)
    .bind(invoice.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(invoice))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
