//! PostgreSQL repositories
//!
//! All queries enforce restaurant isolation where a restaurant id is given.

mod audit;
mod menu;
mod orders;
mod restaurants;
mod staff;

use sqlx::PgPool;

/// PostgreSQL-backed implementation of every repository trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
