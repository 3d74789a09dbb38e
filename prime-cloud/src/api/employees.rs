//! Employee roster endpoints

use axum::extract::State;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Employee, EmployeeCreate, EmployeeStatus, EmployeeUpdate};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmployeeQuery {
    pub store_id: Option<i64>,
    pub status: Option<EmployeeStatus>,
}

/// GET /api/employees?store_id=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> ApiResult<Vec<Employee>> {
    let employees = db::employees::list(&state.pool, query.store_id, query.status).await?;
    Ok(ApiResponse::new("employees", employees))
}

/// POST /api/employees
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<EmployeeCreate>,
) -> ApiResult<Employee> {
    let employee = db::employees::create(&state.pool, req).await?;
    Ok(ApiResponse::new("employee", employee))
}

/// PUT /api/employees/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<EmployeeUpdate>,
) -> ApiResult<Employee> {
    let employee = db::employees::update(&state.pool, id, req)
        .await?
        .ok_or_else(|| AppError::not_found("Employee"))?;
    if employee.status == EmployeeStatus::Exited {
        tracing::info!(employee_id = employee.id, exit_date = ?employee.exit_date, "Employee exited");
    }
    Ok(ApiResponse::new("employee", employee))
}

/// DELETE /api/employees/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    super::deleted(db::employees::delete(&state.pool, id).await?, "Employee")
}
