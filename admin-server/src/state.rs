//! Application state

use std::sync::Arc;

use chrono_tz::Tz;
use sqlx::postgres::PgPoolOptions;

use crate::BoxError;
use crate::auth::JwtService;
use crate::config::{Config, StorageKind};
use crate::db::Database;
use crate::db::memory::MemoryStore;
use crate::services::{OrderService, ReportService, RestaurantService, StaffService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtService,
    /// Zone for calendar-day and hour-of-day buckets
    pub business_tz: Tz,
}

impl AppState {
    /// Connect storage per configuration and run migrations
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = match config.storage {
            StorageKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or("DATABASE_URL must be set")?;
                let pool = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
                Database::postgres(pool)
            }
            StorageKind::Memory => {
                let (store, owner) = MemoryStore::with_demo_data();
                tracing::warn!("Using in-memory storage with demo data; nothing is persisted");
                if config.is_development()
                    && let Some(user_id) = owner.user_id
                {
                    let token = JwtService::new(&config.jwt_secret)
                        .create_token(user_id, Some(&owner.email))?;
                    tracing::info!(%user_id, "Demo owner token: {token}");
                }
                Database::memory(Arc::new(store))
            }
        };

        Ok(Self::with_database(db, &config.jwt_secret, config.business_timezone))
    }

    pub fn with_database(db: Database, jwt_secret: &str, business_tz: Tz) -> Self {
        Self {
            db,
            jwt: JwtService::new(jwt_secret),
            business_tz,
        }
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.db.clone(), self.business_tz)
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.db.clone(), self.business_tz)
    }

    pub fn staff(&self) -> StaffService {
        StaffService::new(self.db.clone())
    }

    pub fn restaurants(&self) -> RestaurantService {
        RestaurantService::new(self.db.clone(), self.business_tz)
    }
}
