//! Audit log queries

use async_trait::async_trait;
use shared::models::{AuditLog, NewAuditLog};
use uuid::Uuid;

use super::PgStore;
use crate::db::{AuditRepository, RepoResult};

#[async_trait]
impl AuditRepository for PgStore {
    async fn record(&self, entry: NewAuditLog) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (action, user_id, resource_type, resource_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.action)
        .bind(entry.user_id)
        .bind(entry.resource_type)
        .bind(entry.resource_id)
        .bind(entry.details)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_by_user(&self, user_id: Uuid, limit: u32) -> RepoResult<Vec<AuditLog>> {
        let rows: Vec<AuditLog> = sqlx::query_as(
            r#"
            SELECT id, action, user_id, resource_type, resource_id, details, created_at
            FROM audit_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
