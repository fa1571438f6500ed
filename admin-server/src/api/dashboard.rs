//! Dashboard summary

use axum::{Extension, Json, Router, extract::State, routing::get};
use shared::error::ApiResponse;
use shared::models::DashboardStats;

use super::ApiResult;
use crate::auth::TenantContext;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
) -> ApiResult<DashboardStats> {
    let stats = state.reports().dashboard(&ctx).await?;
    Ok(Json(ApiResponse::success(stats)))
}
