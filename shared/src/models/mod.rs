//! Data models
//!
//! Shared between admin-server and frontends (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `Uuid`, all timestamps UTC, all money `Decimal`
//! (serialized as JSON numbers).

pub mod audit_log;
pub mod menu_item;
pub mod order;
pub mod report;
pub mod restaurant;
pub mod staff;

// Re-exports
pub use audit_log::*;
pub use menu_item::*;
pub use order::*;
pub use report::*;
pub use restaurant::*;
pub use staff::*;
