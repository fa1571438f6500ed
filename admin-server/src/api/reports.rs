//! Report endpoints

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{MenuReport, SalesReport};

use super::ApiResult;
use crate::auth::TenantContext;
use crate::state::AppState;
use crate::utils::period::{ReportPeriod, RequestedPeriod};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reports/sales", get(sales_report))
        .route("/api/reports/menu", get(menu_report))
}

/// ?period=7d|30d|90d|1y; other values select nothing and are echoed
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
}

/// GET /api/reports/sales (default 7d)
pub async fn sales_report(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<SalesReport> {
    let period = RequestedPeriod::report(query.period.as_deref(), ReportPeriod::Days7);
    let report = state.reports().sales(&ctx, &period).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// GET /api/reports/menu (default 30d)
pub async fn menu_report(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<MenuReport> {
    let period = RequestedPeriod::report(query.period.as_deref(), ReportPeriod::Days30);
    let report = state.reports().menu(&ctx, &period).await?;
    Ok(Json(ApiResponse::success(report)))
}
