//! Shared types for PrimeOS
//!
//! Domain models, derived-field math, the unified error system and small
//! utilities used by the cloud service and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
