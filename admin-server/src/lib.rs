//! admin-server: restaurant back-office API
//!
//! Order lifecycle (create, move through statuses, cancel, list),
//! sales and menu analytics over historical orders, and staff management,
//! all scoped to the caller's restaurant.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
