//! Shared types for the restaurant admin platform
//!
//! Domain models, the order status machine, the unified error system and
//! the JSON response envelope used by every API crate.

pub mod error;
pub mod models;
pub mod order;
pub mod response;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, ErrorCode};
pub use order::OrderStatus;
