//! Request guards: session JWT, subscription tier, database connectivity

pub mod database;
pub mod session;
pub mod tier;

pub use session::SessionIdentity;
pub use tier::Tier;
