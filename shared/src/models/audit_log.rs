//! Audit Log Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource type recorded for order mutations
pub const RESOURCE_ORDER: &str = "order";
/// Resource type recorded for menu item mutations
pub const RESOURCE_MENU_ITEM: &str = "menu_item";
/// Resource type recorded for staff mutations
pub const RESOURCE_STAFF: &str = "staff";

/// Audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditLog {
    pub id: Uuid,
    pub action: String,
    pub user_id: Option<Uuid>,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit log entry to be written
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub action: String,
    pub user_id: Option<Uuid>,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

impl NewAuditLog {
    pub fn new(action: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            user_id: None,
            resource_type: resource_type.into(),
            resource_id: None,
            details: None,
        }
    }

    pub fn by(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn on(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
