//! Data access layer
//!
//! Repository traits implemented by the PostgreSQL store (`postgres`) and
//! the process-local store (`memory`). Services only ever see
//! [`Database`], so both backends run the same business logic.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{
    AuditLog, Location, MenuItem, NewAuditLog, NewOrder, Order, OrderFilter, OrderItem,
    OrderWithItems, Restaurant, Staff, StaffPermissions, StaffProfileUpdate, StaffRole,
};
use shared::order::OrderStatus;
use thiserror::Error;
use uuid::Uuid;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Page of orders matching `filter`, newest first, with the total match count
    async fn list(
        &self,
        restaurant_id: Uuid,
        filter: &OrderFilter,
    ) -> RepoResult<(Vec<OrderWithItems>, u64)>;

    async fn find(&self, id: Uuid) -> RepoResult<Option<OrderWithItems>>;

    /// Write the order and its items atomically
    async fn create(&self, order: NewOrder) -> RepoResult<OrderWithItems>;

    /// Move an order from `expected` to `next`, optionally replacing notes.
    ///
    /// Returns `None` when the order no longer has status `expected`.
    async fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
        notes: Option<String>,
    ) -> RepoResult<Option<Order>>;

    /// Orders created in `[start, end]`, optionally of one status
    async fn in_range(
        &self,
        restaurant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>>;

    /// Line items of completed orders created in `[start, end]`
    async fn completed_items(
        &self,
        restaurant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<OrderItem>>;

    async fn count_by_status(
        &self,
        restaurant_id: Uuid,
        statuses: &[OrderStatus],
    ) -> RepoResult<u64>;
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Items of one restaurant among `ids`; unknown ids are skipped
    async fn find_many(&self, restaurant_id: Uuid, ids: &[Uuid]) -> RepoResult<Vec<MenuItem>>;

    async fn count_active(&self, restaurant_id: Uuid) -> RepoResult<u64>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> RepoResult<Option<Staff>>;

    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Option<Staff>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Staff>>;

    /// Staff of a restaurant ordered by creation time
    async fn list(&self, restaurant_id: Uuid, role: Option<StaffRole>) -> RepoResult<Vec<Staff>>;

    async fn update_permissions(&self, id: Uuid, permissions: StaffPermissions) -> RepoResult<Staff>;

    async fn update_role(&self, id: Uuid, role: StaffRole) -> RepoResult<Staff>;

    async fn update_profile(&self, id: Uuid, profile: &StaffProfileUpdate) -> RepoResult<Staff>;

    async fn set_active(&self, id: Uuid, is_active: bool) -> RepoResult<Staff>;
}

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> RepoResult<Option<Restaurant>>;

    /// Active locations of a restaurant
    async fn locations(&self, restaurant_id: Uuid) -> RepoResult<Vec<Location>>;
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: NewAuditLog) -> RepoResult<()>;

    /// Latest entries written by `user_id`, newest first
    async fn recent_by_user(&self, user_id: Uuid, limit: u32) -> RepoResult<Vec<AuditLog>>;
}

/// Repository handles shared by every service
#[derive(Clone)]
pub struct Database {
    pub orders: Arc<dyn OrderRepository>,
    pub menu: Arc<dyn MenuRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

impl Database {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool));
        Self {
            orders: store.clone(),
            menu: store.clone(),
            staff: store.clone(),
            restaurants: store.clone(),
            audit: store,
        }
    }

    pub fn memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            orders: store.clone(),
            menu: store.clone(),
            staff: store.clone(),
            restaurants: store.clone(),
            audit: store,
        }
    }
}
