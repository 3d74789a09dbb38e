//! Data models
//!
//! Shared between prime-cloud and the front end (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes (see [`crate::util::snowflake_id`]).
//!
//! Each entity carries its create/update payloads. Derived fields (costs,
//! percentages, totals) are recomputed here from the merged row on every
//! write, so handlers never trust client-sent derived values.

pub mod approval;
pub mod chat;
pub mod contact;
pub mod employee;
pub mod inventory;
pub mod invoice;
pub mod kpi;
pub mod marketing;
pub mod order;
pub mod recipe;
pub mod schedule;
pub mod store;
pub mod task;

use crate::error::{AppError, AppResult};
use crate::util::normalize_clock;

// Re-exports
pub use approval::*;
pub use chat::*;
pub use contact::*;
pub use employee::*;
pub use inventory::*;
pub use invoice::*;
pub use kpi::*;
pub use marketing::*;
pub use order::*;
pub use recipe::*;
pub use schedule::*;
pub use store::*;
pub use task::*;

/// Canonicalizes an optional clock field to `"HH:MM"` so text ordering matches time ordering
pub(crate) fn optional_clock(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => normalize_clock(v)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("Invalid {field}: {v}"))),
    }
}
