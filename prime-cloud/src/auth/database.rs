//! Per-request database connectivity check

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::state::AppState;

/// Acquire a pooled connection before the handler runs.
///
/// A failure here surfaces as `DatabaseUnavailable` (503) instead of a
/// query error deep inside a handler. The connection goes straight back
/// to the pool.
pub async fn require_database(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.pool.acquire().await {
        Ok(conn) => drop(conn),
        Err(e) => {
            tracing::warn!(error = %e, "Database unavailable");
            return Err(AppError::database_unavailable());
        }
    }
    Ok(next.run(request).await)
}
