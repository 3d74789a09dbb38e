//! Unified service-layer error type for prime-cloud
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::outbound::OutboundError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (logged, message hidden)
/// - `App`: Business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<OutboundError> for ServiceError {
    fn from(e: OutboundError) -> Self {
        ServiceError::App(e.into())
    }
}

/// Map constraint violations to client errors; everything else is a 500.
fn classify_db_error(err: &sqlx::Error) -> Option<AppError> {
    match err {
        sqlx::Error::RowNotFound => Some(AppError::not_found("Record")),
        sqlx::Error::Database(db) if db.is_unique_violation() => Some(AppError::with_message(
            ErrorCode::AlreadyExists,
            "A record with the same key already exists",
        )),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            Some(AppError::new(ErrorCode::StoreNotFound))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            Some(AppError::database_unavailable())
        }
        _ => None,
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                // Business errors raised inside a DB transaction arrive boxed
                if let Some(app_err) = db_err.downcast_ref::<AppError>() {
                    return app_err.clone();
                }
                if let Some(mapped) = db_err.downcast_ref::<sqlx::Error>().and_then(classify_db_error) {
                    return mapped;
                }
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_app_error_keeps_code() {
        let boxed: BoxError = Box::new(AppError::required("week"));
        let err: AppError = ServiceError::Db(boxed).into();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "week is required");
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unknown_db_error_is_hidden() {
        let err: AppError = ServiceError::from(sqlx::Error::Protocol("bad frame".into())).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("bad frame"));
    }
}
