//! Staff endpoints
//!
//! Mutations need an owner or manager; the target is loaded (404 / 403)
//! before the body is parsed.

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Staff, StaffActivity, StaffRole, StaffStats};
use uuid::Uuid;

use super::ApiResult;
use crate::auth::TenantContext;
use crate::services::staff::{
    BulkPermissionsRequest, UpdatePermissionsRequest, UpdateProfileRequest, UpdateRoleRequest,
};
use crate::state::AppState;
use crate::utils::validation::parse_json;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/staff", get(list_staff))
        .route("/api/staff/stats", get(staff_stats))
        .route("/api/staff/permissions", patch(bulk_update_permissions))
        .route("/api/staff/{id}/permissions", patch(update_permissions))
        .route("/api/staff/{id}/role", patch(update_role))
        .route("/api/staff/{id}/profile", patch(update_profile))
        .route("/api/staff/{id}/toggle-active", post(toggle_active))
        .route("/api/staff/{id}/activity", get(staff_activity))
}

/// GET /api/staff?role=&search=
#[derive(Debug, Deserialize)]
pub struct StaffQuery {
    pub role: Option<String>,
    pub search: Option<String>,
}

pub async fn list_staff(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<StaffQuery>,
) -> ApiResult<Vec<Staff>> {
    let role = query
        .role
        .as_deref()
        .filter(|r| !r.is_empty())
        .map(str::parse::<StaffRole>)
        .transpose()
        .map_err(|msg| AppError::validation(msg))?;
    let staff = state
        .staff()
        .list(&ctx, role, query.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(staff)))
}

/// GET /api/staff/stats
pub async fn staff_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
) -> ApiResult<StaffStats> {
    let stats = state.staff().stats(&ctx).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// PATCH /api/staff/:id/permissions
pub async fn update_permissions(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Staff> {
    let service = state.staff();
    let target = service.load_for_update(&ctx, id).await?;

    let req: UpdatePermissionsRequest = parse_json(&body)?;
    let staff = service
        .update_permissions(&ctx, &target, &req.permissions)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        staff,
        "Permissions updated successfully",
    )))
}

/// PATCH /api/staff/permissions
pub async fn bulk_update_permissions(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Bytes,
) -> ApiResult<Vec<Staff>> {
    ctx.require_admin()?;
    let req: BulkPermissionsRequest = parse_json(&body)?;
    let staff = state
        .staff()
        .bulk_update_permissions(&ctx, &req.staff_ids, &req.permissions)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        staff,
        "Permissions updated successfully",
    )))
}

/// PATCH /api/staff/:id/role
pub async fn update_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Staff> {
    let service = state.staff();
    let target = service.load_for_update(&ctx, id).await?;

    let req: UpdateRoleRequest = parse_json(&body)?;
    let staff = service.update_role(&ctx, &target, &req.role).await?;
    Ok(Json(ApiResponse::success_with_message(
        staff,
        "Role updated successfully",
    )))
}

/// PATCH /api/staff/:id/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Staff> {
    let service = state.staff();
    let target = service.load_for_update(&ctx, id).await?;

    let req: UpdateProfileRequest = parse_json(&body)?;
    let staff = service.update_profile(&ctx, &target, req.profile).await?;
    Ok(Json(ApiResponse::success_with_message(
        staff,
        "Profile updated successfully",
    )))
}

/// POST /api/staff/:id/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Staff> {
    let service = state.staff();
    let target = service.load_for_update(&ctx, id).await?;
    let staff = service.toggle_active(&ctx, &target).await?;
    let message = if staff.is_active {
        "Staff member activated"
    } else {
        "Staff member deactivated"
    };
    Ok(Json(ApiResponse::success_with_message(staff, message)))
}

/// GET /api/staff/:id/activity
pub async fn staff_activity(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StaffActivity> {
    let activity = state.staff().activity(&ctx, id).await?;
    Ok(Json(ApiResponse::success(activity)))
}
