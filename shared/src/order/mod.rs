//! Order lifecycle
//!
//! The status machine shared by every surface that moves an order along
//! (admin dashboard, kitchen tablet, customer tracking).

pub mod status;

// Re-exports
pub use status::{OrderStatus, ParseOrderStatusError};
