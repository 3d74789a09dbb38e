//! Inventory catalog and count database operations

use shared::models::{
    InventoryCount, InventoryCountCreate, InventoryCountUpdate, InventoryItem,
    InventoryItemCreate, InventoryItemUpdate, count_total_value, resolve_count_lines,
};
use shared::util::{now_millis, snowflake_id, today};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use super::BoxError;

// ── Catalog items ──

pub async fn list_items(pool: &PgPool, store_id: Option<i64>) -> Result<Vec<InventoryItem>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM inventory_items
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
        ORDER BY category, name
        "#,
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn catalog(conn: &mut PgConnection, store_id: i64) -> Result<Vec<InventoryItem>, BoxError> {
    let rows = sqlx::query_as("SELECT * FROM inventory_items WHERE store_id = $1")
        .bind(store_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn create_item(pool: &PgPool, data: InventoryItemCreate) -> Result<InventoryItem, BoxError> {
    let item = InventoryItem::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO inventory_items (
            id, store_id, name, category, unit, unit_cost, par_level, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(item.id)
    .bind(item.store_id)
    .bind(&item.name)
    .bind(&item.category)
    .bind(&item.unit)
    .bind(item.unit_cost)
    .bind(item.par_level)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(pool)
    .await?;
    Ok(item)
}

pub async fn update_item(
    pool: &PgPool,
    id: i64,
    data: InventoryItemUpdate,
) -> Result<Option<InventoryItem>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<InventoryItem> =
        sqlx::query_as("SELECT * FROM inventory_items WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut item) = existing else {
        return Ok(None);
    };
    item.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE inventory_items
        SET name = $2, category = $3, unit = $4, unit_cost = $5, par_level = $6, updated_at = $7
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&item.name)
    .bind(&item.category)
    .bind(&item.unit)
    .bind(item.unit_cost)
    .bind(item.par_level)
    .bind(item.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(item))
}

pub async fn delete_item(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Counts ──

pub async fn list_counts(pool: &PgPool, store_id: Option<i64>) -> Result<Vec<InventoryCount>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM inventory_counts
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
        ORDER BY count_date DESC, created_at DESC
        "#,
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lines without a cost are priced from the store's catalog
pub async fn create_count(pool: &PgPool, data: InventoryCountCreate) -> Result<InventoryCount, BoxError> {
    let mut tx = pool.begin().await?;
    let items = catalog(&mut tx, data.store_id).await?;
    let lines = resolve_count_lines(data.lines, &items)?;
    let now = now_millis();
    let count = InventoryCount {
        id: snowflake_id(),
        store_id: data.store_id,
        count_date: data.count_date.unwrap_or_else(today),
        total_value: count_total_value(&lines),
        lines,
        notes: data.notes,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO inventory_counts (
            id, store_id, count_date, lines, total_value, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(count.id)
    .bind(count.store_id)
    .bind(count.count_date)
    .bind(Json(&count.lines))
    .bind(count.total_value)
    .bind(&count.notes)
    .bind(count.created_at)
    .bind(count.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(count)
}

pub async fn update_count(
    pool: &PgPool,
    id: i64,
    data: InventoryCountUpdate,
) -> Result<Option<InventoryCount>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<InventoryCount> =
        sqlx::query_as("SELECT * FROM inventory_counts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut count) = existing else {
        return Ok(None);
    };

    if let Some(date) = data.count_date {
        count.count_date = date;
    }
    if let Some(inputs) = data.lines {
        let items = catalog(&mut tx, count.store_id).await?;
        count.lines = resolve_count_lines(inputs, &items)?;
    }
    if data.notes.is_some() {
        count.notes = data.notes;
    }
    count.total_value = count_total_value(&count.lines);
    count.updated_at = now_millis();

    sqlx::query(
        r#"
        UPDATE inventory_counts
        SET count_date = $2, lines = $3, total_value = $4, notes = $5, updated_at = $6
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(count.count_date)
    .bind(Json(&count.lines))
    .bind(count.total_value)
    .bind(&count.notes)
    .bind(count.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(count))
}

pub async fn delete_count(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM inventory_counts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
