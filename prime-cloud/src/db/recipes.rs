//! Recipe costing database operations

use shared::models::{Recipe, RecipeCreate, RecipeUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;
use sqlx::types::Json;

use super::BoxError;

pub async fn list(pool: &PgPool, store_id: Option<i64>) -> Result<Vec<Recipe>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM recipes
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
        ORDER BY category NULLS LAST, name
        "#,
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: RecipeCreate) -> Result<Recipe, BoxError> {
    let recipe = Recipe::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO recipes (
            id, store_id, name, category, menu_price, ingredients,
            theoretical_cost, food_cost_pct, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(recipe.id)
    .bind(recipe.store_id)
    .bind(&recipe.name)
    .bind(&recipe.category)
    .bind(recipe.menu_price)
    .bind(Json(&recipe.ingredients))
    .bind(recipe.theoretical_cost)
    .bind(recipe.food_cost_pct)
    .bind(recipe.created_at)
    .bind(recipe.updated_at)
    .execute(pool)
    .await?;
    Ok(recipe)
}

pub async fn update(pool: &PgPool, id: i64, data: RecipeUpdate) -> Result<Option<Recipe>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(mut recipe) = existing else {
        return Ok(None);
    };
    recipe.apply_update(data, now_millis())?;

    sqlx::query(
        r#"
        UPDATE recipes
        SET name = $2, category = $3, menu_price = $4, ingredients = $5,
            theoretical_cost = $6, food_cost_pct = $7, updated_at = $8
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&recipe.name)
    .bind(&recipe.category)
    .bind(recipe.menu_price)
    .bind(Json(&recipe.ingredients))
    .bind(recipe.theoretical_cost)
    .bind(recipe.food_cost_pct)
    .bind(recipe.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(recipe))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
