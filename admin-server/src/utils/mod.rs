//! Utilities

pub mod logger;
pub mod period;
pub mod validation;
