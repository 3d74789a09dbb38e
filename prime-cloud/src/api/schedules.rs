//! Schedule (shift) endpoints

use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Shift, ShiftCreate, ShiftUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub store_id: Option<i64>,
    /// First day of the seven-day window
    pub week: Option<NaiveDate>,
}

/// GET /api/schedules?week=YYYY-MM-DD&store_id=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Vec<Shift>> {
    let week = query.week.ok_or_else(|| AppError::required("week"))?;
    let shifts = db::schedules::list_week(&state.pool, query.store_id, week).await?;
    Ok(ApiResponse::new("schedules", shifts))
}

/// POST /api/schedules
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ShiftCreate>,
) -> ApiResult<Shift> {
    let shift = db::schedules::create(&state.pool, req).await?;
    Ok(ApiResponse::new("schedule", shift))
}

/// PUT /api/schedules/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ShiftUpdate>,
) -> ApiResult<Shift> {
    let shift = db::schedules::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Shift"))?;
    Ok(ApiResponse::new("schedule", shift))
}

/// DELETE /api/schedules/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::schedules::delete(&state.pool, id).await?, "Shift")
}
