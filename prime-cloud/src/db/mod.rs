//! Database access layer
//!
//! One module per table. Functions take `&PgPool` and return `BoxError`;
//! updates run fetch-merge-write inside one transaction so derived fields are
//! recomputed from the merged row. Business errors raised during a merge are
//! boxed `AppError`s and keep their code through `ServiceError`.

pub mod analytics;
pub mod billing;
pub mod chat;
pub mod contacts;
pub mod employees;
pub mod inventory;
pub mod invoices;
pub mod kpis;
pub mod marketing;
pub mod orders;
pub mod recipes;
pub mod schedules;
pub mod stores;
pub mod tasks;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
