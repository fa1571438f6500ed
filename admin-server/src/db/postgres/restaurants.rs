//! Restaurant and location queries

use async_trait::async_trait;
use shared::models::{Location, Restaurant};
use uuid::Uuid;

use super::PgStore;
use crate::db::{RepoResult, RestaurantRepository};

#[async_trait]
impl RestaurantRepository for PgStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<Restaurant>> {
        let row: Option<Restaurant> = sqlx::query_as(
            "SELECT id, name, slug, email, phone, is_active, created_at, updated_at \
             FROM restaurants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn locations(&self, restaurant_id: Uuid) -> RepoResult<Vec<Location>> {
        let rows: Vec<Location> = sqlx::query_as(
            r#"
            SELECT id, restaurant_id, name, address, city, state, zip_code, phone,
                   is_active, business_hours, created_at
            FROM locations
            WHERE restaurant_id = $1 AND is_active
            ORDER BY name
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
