//! Staff Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Staff role within a restaurant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "staff_role", rename_all = "snake_case")
)]
pub enum StaffRole {
    Owner,
    Manager,
    Staff,
    Kitchen,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Owner,
        StaffRole::Manager,
        StaffRole::Staff,
        StaffRole::Kitchen,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Owner => "owner",
            StaffRole::Manager => "manager",
            StaffRole::Staff => "staff",
            StaffRole::Kitchen => "kitchen",
        }
    }

    /// Owners and managers administer the restaurant and hold every permission
    pub const fn is_admin(&self) -> bool {
        matches!(self, StaffRole::Owner | StaffRole::Manager)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StaffRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Invalid role: {s}"))
    }
}

/// Fine-grained permission flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffPermissions {
    pub can_manage_orders: bool,
    pub can_manage_menu: bool,
    pub can_view_reports: bool,
}

/// Partial permission update; absent keys keep their value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPermissionsPatch {
    pub can_manage_orders: Option<bool>,
    pub can_manage_menu: Option<bool>,
    pub can_view_reports: Option<bool>,
}

impl StaffPermissionsPatch {
    /// Permission keys accepted on the wire
    pub const KEYS: [&'static str; 3] = ["can_manage_orders", "can_manage_menu", "can_view_reports"];

    pub fn set(&mut self, key: &str, value: bool) -> bool {
        match key {
            "can_manage_orders" => self.can_manage_orders = Some(value),
            "can_manage_menu" => self.can_manage_menu = Some(value),
            "can_view_reports" => self.can_view_reports = Some(value),
            _ => return false,
        }
        true
    }

    pub fn apply(&self, permissions: &mut StaffPermissions) {
        if let Some(v) = self.can_manage_orders {
            permissions.can_manage_orders = v;
        }
        if let Some(v) = self.can_manage_menu {
            permissions.can_manage_menu = v;
        }
        if let Some(v) = self.can_view_reports {
            permissions.can_view_reports = v;
        }
    }
}

/// Staff row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: Uuid,
    /// Auth subject (JWT `sub`) this staff row belongs to
    pub user_id: Option<Uuid>,
    pub restaurant_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: StaffRole,
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub permissions: StaffPermissions,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    pub fn can_manage_orders(&self) -> bool {
        self.role.is_admin() || self.permissions.can_manage_orders
    }

    pub fn can_view_reports(&self) -> bool {
        self.role.is_admin() || self.permissions.can_view_reports
    }
}

/// Profile fields editable through the staff API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}
