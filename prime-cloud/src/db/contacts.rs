//! Trusted contact directory database operations

use shared::models::{TrustedContact, TrustedContactCreate, TrustedContactUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::BoxError;

/// Store-scoped listing also returns chain-wide contacts (`store_id IS NULL`)
pub async fn list(
    pool: &PgPool,
    store_id: Option<i64>,
    category: Option<&str>,
) -> Result<Vec<TrustedContact>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM trusted_contacts
        WHERE ($1::BIGINT IS NULL OR store_id = $1 OR store_id IS NULL)
          AND ($2::TEXT IS NULL OR category = $2)
        ORDER BY category, name
        "#,
    )
    .bind(store_id)
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: TrustedContactCreate) -> Result<TrustedContact, BoxError> {
    let c = TrustedContact::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO trusted_contacts (
            id, store_id, category, name, company, phone, email, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(c.id)
    .bind(c.store_id)
    .bind(&c.category)
    .bind(&c.name)
    .bind(&c.company)
    .bind(&c.phone)
    .bind(&c.email)
    .bind(&c.notes)
    .bind(c.created_at)
    .bind(c.updated_at)
    .execute(pool)
    .await?;
    Ok(c)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: TrustedContactUpdate,
) -> Result<Option<TrustedContact>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<TrustedContact> =
        sqlx::query_as("SELECT * FROM trusted_contacts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(mut c) = existing else {
        return Ok(None);
    };
    c.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE trusted_contacts
        SET category = $2, name = $3, company = $4, phone = $5, email = $6,
            notes = $7, updated_at = $8
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&c.category)
    .bind(&c.name)
    .bind(&c.company)
    .bind(&c.phone)
    .bind(&c.email)
    .bind(&c.notes)
    .bind(c.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(c))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM trusted_contacts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
