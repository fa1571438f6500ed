//! Restaurant profile and locations

use axum::{Extension, Json, Router, extract::State, routing::get};
use shared::error::ApiResponse;
use shared::models::Restaurant;

use super::ApiResult;
use crate::auth::TenantContext;
use crate::services::LocationView;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/restaurant", get(get_restaurant))
        .route("/api/locations", get(list_locations))
}

/// GET /api/restaurant
pub async fn get_restaurant(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
) -> ApiResult<Restaurant> {
    let restaurant = state.restaurants().current(&ctx).await?;
    Ok(Json(ApiResponse::success(restaurant)))
}

/// GET /api/locations
pub async fn list_locations(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
) -> ApiResult<Vec<LocationView>> {
    let locations = state.restaurants().locations(&ctx).await?;
    Ok(Json(ApiResponse::success(locations)))
}
