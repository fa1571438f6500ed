//! Menu item queries

use async_trait::async_trait;
use shared::models::MenuItem;
use uuid::Uuid;

use super::PgStore;
use crate::db::{MenuRepository, RepoError, RepoResult};

#[async_trait]
impl MenuRepository for PgStore {
    async fn find_many(&self, restaurant_id: Uuid, ids: &[Uuid]) -> RepoResult<Vec<MenuItem>> {
        let rows: Vec<MenuItem> = sqlx::query_as(
            r#"
            SELECT id, restaurant_id, category_id, name, description, price,
                   is_active, is_available, created_at, updated_at
            FROM menu_items
            WHERE restaurant_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(restaurant_id)
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_active(&self, restaurant_id: Uuid) -> RepoResult<u64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM menu_items WHERE restaurant_id = $1 AND is_active",
        )
        .bind(restaurant_id)
        .fetch_one(&self.pool)
        .await?;
        u64::try_from(count).map_err(|e| RepoError::Database(e.to_string()))
    }
}
