//! Error type and API response envelope

use super::codes::ErrorCode;
use http::StatusCode;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Application error with structured error code
///
/// `message` is what the caller sees. Validation and provider errors carry the
/// original text verbatim; system errors carry the code's default message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn required(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn tier_required(feature: &str) -> Self {
        Self::with_message(
            ErrorCode::TierRequired,
            format!("{feature} requires the pro tier"),
        )
    }

    /// Integration credential is unset; checked before any outbound call.
    pub fn not_configured(integration: &str) -> Self {
        Self::with_message(
            ErrorCode::IntegrationNotConfigured,
            format!("{integration} not configured"),
        )
    }

    /// Provider call failed; the provider's message is passed through.
    pub fn integration(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::IntegrationFailed, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn database_unavailable() -> Self {
        Self::new(ErrorCode::DatabaseUnavailable)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Failure body: `{"ok": false, "error": "...", "code": N}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
    pub code: u16,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            ok: false,
            error: err.message.clone(),
            code: err.code.code(),
        }
    }
}

/// Success envelope: `{"ok": true, "<key>": data}`
///
/// The key names the payload (`"schedules"`, `"projection"`, ...), so one type
/// serves every route without a wrapper struct per response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    key: Option<&'static str>,
    data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(key: &'static str, data: T) -> Self {
        Self {
            key: Some(key),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Bare `{"ok": true}`
    pub fn ok() -> Self {
        Self {
            key: None,
            data: None,
        }
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.key.is_some() { 2 } else { 1 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("ok", &true)?;
        if let (Some(key), Some(data)) = (self.key, &self.data) {
            map.serialize_entry(key, data)?;
        }
        map.end()
    }
}

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::validation("date is required");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.to_string(), "date is required");
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(
            AppError::not_found("Shift").message,
            "Shift not found".to_string()
        );
        assert_eq!(
            AppError::required("shift_date").code,
            ErrorCode::RequiredField
        );
        let err = AppError::not_configured("Billing");
        assert_eq!(err.code, ErrorCode::IntegrationNotConfigured);
        assert_eq!(err.message, "Billing not configured");
        assert_eq!(
            AppError::tier_required("Labor plan").http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_error_body_shape() {
        let err = AppError::validation("end_time must be after start_time");
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ok": false,
                "error": "end_time must be after start_time",
                "code": 2
            })
        );
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = ApiResponse::new("schedules", vec![1, 2, 3]);
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"ok":true,"schedules":[1,2,3]}"#
        );
    }

    #[test]
    fn test_bare_ok_envelope() {
        assert_eq!(
            serde_json::to_string(&ApiResponse::ok()).unwrap(),
            r#"{"ok":true}"#
        );
    }

    #[test]
    fn test_null_payload_is_kept() {
        let body: ApiResponse<Option<u8>> = ApiResponse::new("projection", None);
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"ok":true,"projection":null}"#
        );
    }
}
