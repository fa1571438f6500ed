//! HTTP API
//!
//! `/health` is public; everything under `/api` runs behind
//! [`require_auth`](crate::auth::middleware::require_auth) and
//! [`require_tenant`](crate::auth::middleware::require_tenant), so handlers
//! receive an `Extension<TenantContext>`.

pub mod dashboard;
pub mod health;
pub mod orders;
pub mod reports;
pub mod restaurant;
pub mod staff;

use axum::{Json, Router, middleware};
use http::{HeaderName, HeaderValue};
use shared::error::{ApiResponse, AppError};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::middleware::{require_auth, require_tenant};
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// In-flight requests served at once; the rest wait
const MAX_CONCURRENT_REQUESTS: usize = 100;

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Routes that need a tenant context (no middleware, no state)
pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .merge(reports::router())
        .merge(dashboard::router())
        .merge(staff::router())
        .merge(restaurant::router())
}

/// Full application with middleware and state
pub fn create_router(state: AppState) -> Router {
    // Layers run bottom-up: auth, then tenant resolution, then the handler
    let api = tenant_routes()
        .layer(middleware::from_fn_with_state(state.clone(), require_tenant))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(health::router())
        .merge(api)
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
