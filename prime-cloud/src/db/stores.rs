//! Store database operations

use shared::error::AppError;
use shared::models::{Store, StoreCreate, StoreUpdate, is_valid_slug};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::BoxError;

pub async fn list(pool: &PgPool) -> Result<Vec<Store>, BoxError> {
    let rows = sqlx::query_as("SELECT * FROM stores ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Store>, BoxError> {
    let row = sqlx::query_as("SELECT * FROM stores WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: StoreCreate) -> Result<Store, BoxError> {
    let slug = data.slug.trim().to_ascii_lowercase();
    if !is_valid_slug(&slug) {
        return Err(AppError::validation(
            "slug must be lowercase letters, digits or dashes",
        )
        .into());
    }
    if data.name.trim().is_empty() {
        return Err(AppError::required("name").into());
    }

    let row = sqlx::query_as(
        r#"
        INSERT INTO stores (id, slug, name, email, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(snowflake_id())
    .bind(&slug)
    .bind(&data.name)
    .bind(&data.email)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: i64, data: StoreUpdate) -> Result<Option<Store>, BoxError> {
    let row = sqlx::query_as(
        r#"
        UPDATE stores
        SET name = COALESCE($2, name),
            email = COALESCE($3, email)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM stores WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
