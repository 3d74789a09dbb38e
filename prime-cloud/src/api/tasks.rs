//! Task endpoints

use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Task, TaskCreate, TaskStatus, TaskUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub store_id: Option<i64>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
}

/// GET /api/tasks?store_id=&status=&due_date=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Vec<Task>> {
    let tasks = db::tasks::list(&state.pool, query.store_id, query.status, query.due_date).await?;
    Ok(ApiResponse::new("tasks", tasks))
}

/// POST /api/tasks
pub async fn create(State(state): State<AppState>, Json(req): Json<TaskCreate>) -> ApiResult<Task> {
    let task = db::tasks::create(&state.pool, req).await?;
    Ok(ApiResponse::new("task", task))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<TaskUpdate>,
) -> ApiResult<Task> {
    let task = db::tasks::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;
    Ok(ApiResponse::new("task", task))
}

/// POST /api/tasks/{id}/complete
pub async fn complete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Task> {
    let task = db::tasks::complete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;
    Ok(ApiResponse::new("task", task))
}

/// DELETE /api/tasks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::tasks::delete(&state.pool, id).await?, "Task")
}
