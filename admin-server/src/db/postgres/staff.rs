//! Staff queries

use async_trait::async_trait;
use shared::models::{Staff, StaffPermissions, StaffProfileUpdate, StaffRole};
use uuid::Uuid;

use super::PgStore;
use crate::db::{RepoError, RepoResult, StaffRepository};

const STAFF_COLUMNS: &str = "id, user_id, restaurant_id, email, name, role, \
     can_manage_orders, can_manage_menu, can_view_reports, \
     is_active, last_login, created_at, updated_at";

fn not_found(id: Uuid) -> RepoError {
    RepoError::NotFound(format!("Staff {id}"))
}

#[async_trait]
impl StaffRepository for PgStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<Staff>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1");
        let row: Option<Staff> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Option<Staff>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE user_id = $1");
        let row: Option<Staff> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Staff>> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE lower(email) = lower($1)");
        let row: Option<Staff> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, restaurant_id: Uuid, role: Option<StaffRole>) -> RepoResult<Vec<Staff>> {
        let sql = format!(
            r#"
            SELECT {STAFF_COLUMNS} FROM staff
            WHERE restaurant_id = $1 AND ($2::staff_role IS NULL OR role = $2)
            ORDER BY created_at
            "#
        );
        let rows: Vec<Staff> = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_permissions(&self, id: Uuid, permissions: StaffPermissions) -> RepoResult<Staff> {
        let sql = format!(
            r#"
            UPDATE staff
            SET can_manage_orders = $2, can_manage_menu = $3, can_view_reports = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "#
        );
        let row: Option<Staff> = sqlx::query_as(&sql)
            .bind(id)
            .bind(permissions.can_manage_orders)
            .bind(permissions.can_manage_menu)
            .bind(permissions.can_view_reports)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| not_found(id))
    }

    async fn update_role(&self, id: Uuid, role: StaffRole) -> RepoResult<Staff> {
        let sql = format!(
            "UPDATE staff SET role = $2, updated_at = now() WHERE id = $1 RETURNING {STAFF_COLUMNS}"
        );
        let row: Option<Staff> = sqlx::query_as(&sql)
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| not_found(id))
    }

    async fn update_profile(&self, id: Uuid, profile: &StaffProfileUpdate) -> RepoResult<Staff> {
        let sql = format!(
            r#"
            UPDATE staff
            SET name = COALESCE($2, name), email = COALESCE($3, email), updated_at = now()
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "#
        );
        let row: Option<Staff> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&profile.name)
            .bind(&profile.email)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| not_found(id))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> RepoResult<Staff> {
        let sql = format!(
            "UPDATE staff SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING {STAFF_COLUMNS}"
        );
        let row: Option<Staff> = sqlx::query_as(&sql)
            .bind(id)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| not_found(id))
    }
}
