//! Order endpoints
//!
//! Mutations load the order (404, then 403 for another restaurant's order)
//! before the body is parsed, so a cross-tenant request never reaches
//! body validation.

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    routing::get,
};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Order, OrderFilter, OrderStats, OrderWithItems};
use uuid::Uuid;

use super::ApiResult;
use crate::auth::{Permission, TenantContext};
use crate::services::order::{UpdateStatusRequest, parse_status};
use crate::services::{CancelOrderRequest, CreateOrderRequest};
use crate::state::AppState;
use crate::utils::period::{DateBound, RequestedPeriod, parse_date_bound};
use crate::utils::validation::parse_json;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/stats", get(order_stats))
        .route(
            "/api/orders/{id}",
            get(get_order).patch(update_status).delete(cancel_order),
        )
}

/// GET /api/orders?status=&limit=&offset=&startDate=&endDate=
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_count(value: Option<&str>, field: &str, default: u32) -> Result<u32, AppError> {
    match value {
        None | Some("") => Ok(default),
        Some(v) => v.parse().map_err(|_| {
            AppError::validation(format!("Invalid {field}: {v}")).with_detail("field", field)
        }),
    }
}

impl ListOrdersQuery {
    fn into_filter(self, tz: chrono_tz::Tz) -> Result<OrderFilter, AppError> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(parse_status)
            .transpose()?;
        let limit = parse_count(self.limit.as_deref(), "limit", DEFAULT_LIMIT)?.clamp(1, MAX_LIMIT);
        let offset = parse_count(self.offset.as_deref(), "offset", 0)?;
        let start = self
            .start_date
            .as_deref()
            .map(|v| parse_date_bound(v, "startDate", DateBound::Start, tz))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|v| parse_date_bound(v, "endDate", DateBound::End, tz))
            .transpose()?;
        Ok(OrderFilter {
            status,
            start,
            end,
            limit,
            offset,
        })
    }
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Vec<OrderWithItems>> {
    let filter = query.into_filter(state.business_tz)?;
    let (orders, pagination) = state.orders().list(&ctx, filter).await?;
    Ok(Json(ApiResponse::success(orders).with_pagination(pagination)))
}

/// GET /api/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderWithItems> {
    let order = state.orders().get(&ctx, id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<OrderWithItems>>), AppError> {
    ctx.require(Permission::ManageOrders)?;
    let req: CreateOrderRequest = parse_json(&body)?;
    let order = state.orders().create(&ctx, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(order, "Order created successfully")),
    ))
}

/// PATCH /api/orders/:id
pub async fn update_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Order> {
    let service = state.orders();
    let current = service.load_for_update(&ctx, id).await?;

    let req: UpdateStatusRequest = parse_json(&body)?;
    let next = parse_status(&req.status)?;
    let order = service.update_status(&ctx, &current.order, next).await?;
    Ok(Json(ApiResponse::success_with_message(
        order,
        "Order status updated successfully",
    )))
}

/// DELETE /api/orders/:id
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Order> {
    let service = state.orders();
    let current = service.load_for_update(&ctx, id).await?;

    let req: CancelOrderRequest = parse_json(&body)?;
    let order = service.cancel(&ctx, &current.order, &req.reason).await?;
    Ok(Json(ApiResponse::success_with_message(
        order,
        "Order cancelled successfully",
    )))
}

/// GET /api/orders/stats?period=today|week|month
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

pub async fn order_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<OrderStats> {
    let period = RequestedPeriod::stats(query.period.as_deref());
    let stats = state.orders().stats(&ctx, &period).await?;
    Ok(Json(ApiResponse::success(stats)))
}
