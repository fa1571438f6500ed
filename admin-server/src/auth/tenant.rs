//! Per-request tenant context and permission checks

use shared::error::{AppError, ErrorCode};
use shared::models::Staff;
use uuid::Uuid;

use super::jwt::CurrentUser;

/// Fine-grained permissions checked by services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageOrders,
    ViewReports,
}

impl Permission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageOrders => "can_manage_orders",
            Permission::ViewReports => "can_view_reports",
        }
    }
}

/// The caller and the restaurant every request is scoped to
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub user: CurrentUser,
    pub staff: Staff,
}

impl TenantContext {
    pub fn new(user: CurrentUser, staff: Staff) -> Self {
        Self { user, staff }
    }

    pub fn restaurant_id(&self) -> Uuid {
        self.staff.restaurant_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user.user_id
    }

    pub fn has(&self, permission: Permission) -> bool {
        match permission {
            Permission::ManageOrders => self.staff.can_manage_orders(),
            Permission::ViewReports => self.staff.can_view_reports(),
        }
    }

    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has(permission) {
            return Ok(());
        }
        tracing::warn!(
            staff_id = %self.staff.id,
            role = %self.staff.role,
            required_permission = permission.as_str(),
            "Permission denied"
        );
        Err(AppError::permission_denied(format!(
            "Permission denied: {}",
            permission.as_str()
        )))
    }

    /// Owners and managers only
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.staff.role.is_admin() {
            return Ok(());
        }
        tracing::warn!(staff_id = %self.staff.id, role = %self.staff.role, "Admin required");
        Err(AppError::new(ErrorCode::AdminRequired))
    }

    /// Reject resources owned by another restaurant
    pub fn ensure_same_restaurant(&self, restaurant_id: Uuid) -> Result<(), AppError> {
        if restaurant_id == self.restaurant_id() {
            return Ok(());
        }
        tracing::warn!(
            caller_restaurant = %self.restaurant_id(),
            target_restaurant = %restaurant_id,
            "Cross-tenant access rejected"
        );
        Err(AppError::cross_tenant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{StaffPermissions, StaffRole};

    fn ctx(role: StaffRole, permissions: StaffPermissions) -> TenantContext {
        let user_id = Uuid::new_v4();
        TenantContext::new(
            CurrentUser {
                user_id,
                email: None,
            },
            Staff {
                id: Uuid::new_v4(),
                user_id: Some(user_id),
                restaurant_id: Uuid::new_v4(),
                email: "x@y.test".into(),
                name: None,
                role,
                permissions,
                is_active: true,
                last_login: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )
    }

    #[test]
    fn test_permission_checks() {
        let manager = ctx(StaffRole::Manager, StaffPermissions::default());
        assert!(manager.require(Permission::ViewReports).is_ok());
        assert!(manager.require_admin().is_ok());

        let kitchen = ctx(StaffRole::Kitchen, StaffPermissions::default());
        let err = kitchen.require(Permission::ManageOrders).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(kitchen.require_admin().unwrap_err().code, ErrorCode::AdminRequired);
    }

    #[test]
    fn test_cross_tenant() {
        let staff = ctx(StaffRole::Owner, StaffPermissions::default());
        assert!(staff.ensure_same_restaurant(staff.restaurant_id()).is_ok());
        let err = staff.ensure_same_restaurant(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CrossTenantAccess);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }
}
