//! Party order and merch order database operations

use chrono::NaiveDate;
use shared::models::{
    ApprovalStatus, MerchOrder, MerchOrderStatus, MerchOrderUpdate, PartyOrder, PartyOrderCreate,
    PartyOrderUpdate,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use super::BoxError;

// ── Party orders ──

pub async fn list_party(
    pool: &PgPool,
    store_id: Option<i64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    status: Option<ApprovalStatus>,
) -> Result<Vec<PartyOrder>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM party_orders
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
          AND ($2::DATE IS NULL OR event_date >= $2)
          AND ($3::DATE IS NULL OR event_date <= $3)
          AND ($4::approval_status IS NULL OR status = $4)
        ORDER BY event_date, event_time NULLS LAST
        "#,
    )
    .bind(store_id)
    .bind(from)
    .bind(to)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_party(pool: &PgPool, data: PartyOrderCreate) -> Result<PartyOrder, BoxError> {
    let order = PartyOrder::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO party_orders (
            id, store_id, customer_name, customer_phone, customer_email, event_date,
            event_time, guest_count, items, subtotal, tax, total, status, approved_at,
            notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(order.id)
    .bind(order.store_id)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.customer_email)
    .bind(order.event_date)
    .bind(&order.event_time)
    .bind(order.guest_count)
    .bind(Json(&order.items))
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.total)
    .bind(order.status)
    .bind(order.approved_at)
    .bind(&order.notes)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(order)
}

pub async fn update_party(
    pool: &PgPool,
    id: i64,
    data: PartyOrderUpdate,
) -> Result<Option<PartyOrder>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<PartyOrder> =
        sqlx::query_as("SELECT * FROM party_orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut order) = existing else {
        return Ok(None);
    };
    order.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE party_orders
        SET customer_name = $2, customer_phone = $3, customer_email = $4, event_date = $5,
            event_time = $6, guest_count = $7, items = $8, subtotal = $9, tax = $10,
            total = $11, status = $12, approved_at = $13, notes = $14, updated_at = $15
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.customer_email)
    .bind(order.event_date)
    .bind(&order.event_time)
    .bind(order.guest_count)
    .bind(Json(&order.items))
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.total)
    .bind(order.status)
    .bind(order.approved_at)
    .bind(&order.notes)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(order))
}

pub async fn delete_party(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM party_orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Merch orders ──

pub async fn list_merch(
    pool: &PgPool,
    store_id: Option<i64>,
    status: Option<MerchOrderStatus>,
) -> Result<Vec<MerchOrder>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM merch_orders
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
          AND ($2::merch_order_status IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(store_id)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert an order already built by [`MerchOrder::from_create`]
pub async fn insert_merch(pool: &PgPool, order: &MerchOrder) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        INSERT INTO merch_orders (
            id, store_id, customer_name, customer_email, items, subtotal, tax, total,
            status, checkout_session_id, paid_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(order.id)
    .bind(order.store_id)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(Json(&order.items))
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.total)
    .bind(order.status)
    .bind(&order.checkout_session_id)
    .bind(order.paid_at)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

async fn write_merch(conn: &mut PgConnection, order: &MerchOrder) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        UPDATE merch_orders
        SET customer_name = $2, customer_email = $3, items = $4, subtotal = $5, tax = $6,
            total = $7, status = $8, checkout_session_id = $9, paid_at = $10, updated_at = $11
        WHERE id = $1
        "#,
    )
    .bind(order.id)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(Json(&order.items))
    .bind(order.subtotal)
    .bind(order.tax)
    .bind(order.total)
    .bind(order.status)
    .bind(&order.checkout_session_id)
    .bind(order.paid_at)
    .bind(order.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_merch(
    pool: &PgPool,
    id: i64,
    data: MerchOrderUpdate,
) -> Result<Option<MerchOrder>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<MerchOrder> =
        sqlx::query_as("SELECT * FROM merch_orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut order) = existing else {
        return Ok(None);
    };
    order.apply_update(data, now_millis())?;
    write_merch(&mut tx, &order).await?;
    tx.commit().await?;
    Ok(Some(order))
}

/// Mark an order paid after checkout. Already-paid orders keep their
/// original `paid_at`. The flag is `true` only for the call that moved the
/// row into `Paid`, decided under the row lock.
pub async fn mark_merch_paid(
    pool: &PgPool,
    id: i64,
    checkout_session_id: &str,
) -> Result<Option<(MerchOrder, bool)>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<MerchOrder> =
        sqlx::query_as("SELECT * FROM merch_orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut order) = existing else {
        return Ok(None);
    };
    let transitioned = order.mark_paid(checkout_session_id, now_millis());
    write_merch(&mut tx, &order).await?;
    tx.commit().await?;
    Ok(Some((order, transitioned)))
}

pub async fn delete_merch(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM merch_orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
