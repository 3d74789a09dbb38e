//! Unified error system for PrimeOS
//!
//! - [`ErrorCode`]: Standardized error codes
//! - [`ErrorCategory`]: Classification of errors by code range
//! - [`AppError`]: Error type carried out of handlers
//! - [`ApiResponse`] / [`ErrorBody`]: the `{ok, ...}` response envelope
//!
//! Every failure is rendered as `{"ok": false, "error": "...", "code": N}`
//! with the HTTP status derived from the code.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorBody};
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "week is required");
//! let body = ErrorBody::from(&err);
//! assert!(!body.ok);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorBody};
