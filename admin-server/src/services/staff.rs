//! Staff management: listing, permissions, roles, profiles, activity

use serde::Deserialize;
use serde_json::{Map, Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuditLog, NewAuditLog, RESOURCE_MENU_ITEM, RESOURCE_ORDER, RESOURCE_STAFF, Staff,
    StaffActivity, StaffPermissionsPatch, StaffProfileUpdate, StaffRole, StaffStats,
};
use uuid::Uuid;

use super::audit;
use crate::auth::TenantContext;
use crate::db::{Database, RepoError};
use crate::error::{ServiceError, ServiceResult};
use crate::utils::validation::{MAX_NAME_LEN, is_valid_email, validate_required_text};

/// Audit entries considered for the activity summary
const ACTIVITY_WINDOW: u32 = 100;

/// Searches shorter than this return the full list
const MIN_SEARCH_LEN: usize = 2;

/// `PATCH /api/staff/:id/permissions` body
#[derive(Debug, Deserialize)]
pub struct UpdatePermissionsRequest {
    pub permissions: Map<String, Value>,
}

/// `PATCH /api/staff/permissions` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPermissionsRequest {
    pub staff_ids: Vec<Uuid>,
    pub permissions: Map<String, Value>,
}

/// `PATCH /api/staff/:id/role` body
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// `PATCH /api/staff/:id/profile` body
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub profile: StaffProfileUpdate,
}

/// Validate a permission map from the wire
///
/// Every key must be a known permission and every value a boolean.
pub fn parse_permissions(raw: &Map<String, Value>) -> Result<StaffPermissionsPatch, AppError> {
    let mut patch = StaffPermissionsPatch::default();
    for (key, value) in raw {
        if !StaffPermissionsPatch::KEYS.contains(&key.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::InvalidPermission,
                format!("Invalid permission key: {key}"),
            )
            .with_detail("allowed", StaffPermissionsPatch::KEYS.to_vec()));
        }
        let Some(flag) = value.as_bool() else {
            return Err(AppError::validation(format!("Permission {key} must be a boolean"))
                .with_detail("field", key.as_str()));
        };
        patch.set(key, flag);
    }
    Ok(patch)
}

/// Case-insensitive match on name or email
/// Only an owner may change an owner's account
fn ensure_may_modify(ctx: &TenantContext, target: &Staff, action: &str) -> Result<(), AppError> {
    if target.role == StaffRole::Owner && ctx.staff.role != StaffRole::Owner {
        tracing::warn!(
            staff_id = %ctx.staff.id,
            target_id = %target.id,
            action,
            "Non-owner attempted to modify an owner"
        );
        return Err(AppError::new(ErrorCode::CannotModifyOwner));
    }
    Ok(())
}

fn matches_search(staff: &Staff, needle: &str) -> bool {
    staff.email.to_lowercase().contains(needle)
        || staff
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(needle))
}

pub fn staff_stats(staff: &[Staff]) -> StaffStats {
    StaffStats {
        total_staff: staff.len() as u64,
        admins: staff.iter().filter(|s| s.role.is_admin()).count() as u64,
        staff: staff.iter().filter(|s| s.role == StaffRole::Staff).count() as u64,
        active_this_month: staff.iter().filter(|s| s.is_active).count() as u64,
    }
}

/// Summary of the most recent audit entries, newest first
pub fn staff_activity(logs: &[AuditLog]) -> StaffActivity {
    StaffActivity {
        orders_managed: logs
            .iter()
            .filter(|l| l.resource_type == RESOURCE_ORDER)
            .count() as u64,
        menu_items_created: logs
            .iter()
            .filter(|l| l.resource_type == RESOURCE_MENU_ITEM && l.action == "create")
            .count() as u64,
        last_active: logs.iter().map(|l| l.created_at).max(),
    }
}

#[derive(Clone)]
pub struct StaffService {
    db: Database,
}

impl StaffService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Staff of the caller's restaurant, filtered by role and search text
    pub async fn list(
        &self,
        ctx: &TenantContext,
        role: Option<StaffRole>,
        search: Option<&str>,
    ) -> ServiceResult<Vec<Staff>> {
        let staff = self.db.staff.list(ctx.restaurant_id(), role).await?;
        let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        if needle.chars().count() < MIN_SEARCH_LEN {
            return Ok(staff);
        }
        Ok(staff
            .into_iter()
            .filter(|s| matches_search(s, &needle))
            .collect())
    }

    pub async fn stats(&self, ctx: &TenantContext) -> ServiceResult<StaffStats> {
        let staff = self.db.staff.list(ctx.restaurant_id(), None).await?;
        Ok(staff_stats(&staff))
    }

    async fn find_in_restaurant(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<Staff> {
        let staff = self
            .db
            .staff
            .find(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound))?;
        ctx.ensure_same_restaurant(staff.restaurant_id)?;
        Ok(staff)
    }

    /// Staff member the caller is about to modify
    pub async fn load_for_update(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<Staff> {
        let target = self.find_in_restaurant(ctx, id).await?;
        ctx.require_admin()?;
        Ok(target)
    }

    pub async fn update_permissions(
        &self,
        ctx: &TenantContext,
        target: &Staff,
        raw: &Map<String, Value>,
    ) -> ServiceResult<Staff> {
        ensure_may_modify(ctx, target, "update_permissions")?;
        let patch = parse_permissions(raw)?;
        self.apply_permissions(ctx, target, &patch).await
    }

    /// Apply one permission change to several staff members
    ///
    /// Every target is checked before the first write.
    pub async fn bulk_update_permissions(
        &self,
        ctx: &TenantContext,
        ids: &[Uuid],
        raw: &Map<String, Value>,
    ) -> ServiceResult<Vec<Staff>> {
        ctx.require_admin()?;
        if ids.is_empty() {
            return Err(AppError::validation("At least one staff member required").into());
        }
        let patch = parse_permissions(raw)?;

        let mut targets = Vec::with_capacity(ids.len());
        for id in ids {
            let target = self.find_in_restaurant(ctx, *id).await?;
            ensure_may_modify(ctx, &target, "bulk_update_permissions")?;
            targets.push(target);
        }

        let mut updated = Vec::with_capacity(targets.len());
        for target in &targets {
            updated.push(self.apply_permissions(ctx, target, &patch).await?);
        }
        tracing::info!(count = updated.len(), "Bulk permission update applied");
        Ok(updated)
    }

    async fn apply_permissions(
        &self,
        ctx: &TenantContext,
        target: &Staff,
        patch: &StaffPermissionsPatch,
    ) -> ServiceResult<Staff> {
        let mut permissions = target.permissions;
        patch.apply(&mut permissions);
        let updated = self.db.staff.update_permissions(target.id, permissions).await?;

        audit(
            &self.db,
            NewAuditLog::new("update_permissions", RESOURCE_STAFF)
                .by(ctx.user_id())
                .on(target.id)
                .details(json!({ "before": target.permissions, "after": permissions })),
        )
        .await;
        Ok(updated)
    }

    pub async fn update_role(
        &self,
        ctx: &TenantContext,
        target: &Staff,
        role: &str,
    ) -> ServiceResult<Staff> {
        let role: StaffRole = role.parse().map_err(|msg: String| {
            let allowed: Vec<&str> = StaffRole::ALL.iter().map(|r| r.as_str()).collect();
            AppError::validation(msg).with_detail("allowed", allowed)
        })?;

        ensure_may_modify(ctx, target, "update_role")?;
        if role == StaffRole::Owner && ctx.staff.role != StaffRole::Owner {
            tracing::warn!(
                staff_id = %ctx.staff.id,
                target_id = %target.id,
                "Non-owner attempted to grant the owner role"
            );
            return Err(AppError::new(ErrorCode::CannotModifyOwner).into());
        }

        let updated = self.db.staff.update_role(target.id, role).await?;
        audit(
            &self.db,
            NewAuditLog::new("update_role", RESOURCE_STAFF)
                .by(ctx.user_id())
                .on(target.id)
                .details(json!({ "from": target.role, "to": role })),
        )
        .await;
        tracing::info!(target_id = %target.id, from = %target.role, to = %role, "Staff role changed");
        Ok(updated)
    }

    pub async fn update_profile(
        &self,
        ctx: &TenantContext,
        target: &Staff,
        profile: StaffProfileUpdate,
    ) -> ServiceResult<Staff> {
        ensure_may_modify(ctx, target, "update_profile")?;
        let profile = StaffProfileUpdate {
            name: profile.name.map(|n| n.trim().to_string()),
            email: profile.email.map(|e| e.trim().to_string()),
        };
        if let Some(name) = &profile.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(email) = &profile.email {
            if !is_valid_email(email) {
                return Err(AppError::validation("Invalid email format")
                    .with_detail("field", "email")
                    .into());
            }
            if let Some(existing) = self.db.staff.find_by_email(email).await?
                && existing.id != target.id
            {
                return Err(AppError::new(ErrorCode::StaffEmailExists).into());
            }
        }

        let updated = match self.db.staff.update_profile(target.id, &profile).await {
            Ok(staff) => staff,
            // Lost a race against another writer claiming the same email
            Err(RepoError::Duplicate(_)) => {
                return Err(AppError::new(ErrorCode::StaffEmailExists).into());
            }
            Err(e) => return Err(ServiceError::Repo(e)),
        };

        audit(
            &self.db,
            NewAuditLog::new("update_profile", RESOURCE_STAFF)
                .by(ctx.user_id())
                .on(target.id)
                .details(json!({ "name": profile.name, "email": profile.email })),
        )
        .await;
        Ok(updated)
    }

    /// Flip `is_active`; nobody can deactivate their own account
    pub async fn toggle_active(&self, ctx: &TenantContext, target: &Staff) -> ServiceResult<Staff> {
        if target.id == ctx.staff.id {
            return Err(AppError::new(ErrorCode::StaffCannotDeactivateSelf).into());
        }
        ensure_may_modify(ctx, target, "toggle_active")?;
        let updated = self.db.staff.set_active(target.id, !target.is_active).await?;
        audit(
            &self.db,
            NewAuditLog::new(
                if updated.is_active { "activate" } else { "deactivate" },
                RESOURCE_STAFF,
            )
            .by(ctx.user_id())
            .on(target.id),
        )
        .await;
        tracing::info!(target_id = %target.id, is_active = updated.is_active, "Staff active flag toggled");
        Ok(updated)
    }

    /// Activity summary; admins see everyone, others only themselves
    pub async fn activity(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<StaffActivity> {
        let target = self.find_in_restaurant(ctx, id).await?;
        if target.id != ctx.staff.id {
            ctx.require_admin()?;
        }
        let Some(user_id) = target.user_id else {
            return Ok(staff_activity(&[]));
        };
        let logs = self.db.audit.recent_by_user(user_id, ACTIVITY_WINDOW).await?;
        Ok(staff_activity(&logs))
    }
}
