//! Recipe costing endpoints

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Recipe, RecipeCreate, RecipeUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub store_id: Option<i64>,
}

/// GET /api/recipes?store_id=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> ApiResult<Vec<Recipe>> {
    let recipes = db::recipes::list(&state.pool, query.store_id).await?;
    Ok(ApiResponse::new("recipes", recipes))
}

/// POST /api/recipes
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<RecipeCreate>,
) -> ApiResult<Recipe> {
    let recipe = db::recipes::create(&state.pool, req).await?;
    Ok(ApiResponse::new("recipe", recipe))
}

/// PUT /api/recipes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<RecipeUpdate>,
) -> ApiResult<Recipe> {
    let recipe = db::recipes::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;
    Ok(ApiResponse::new("recipe", recipe))
}

/// DELETE /api/recipes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::recipes::delete(&state.pool, id).await?, "Recipe")
}
