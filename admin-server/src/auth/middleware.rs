//! Authentication middleware
//!
//! `require_auth` validates the bearer token and inserts [`CurrentUser`];
//! `require_tenant` then resolves the caller's staff row and inserts
//! [`TenantContext`]. Handlers behind both layers take
//! `Extension<TenantContext>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use super::jwt::{CurrentUser, JwtError, JwtService};
use super::tenant::TenantContext;
use crate::error::ServiceError;
use crate::state::AppState;

/// Reject requests without a valid bearer token
///
/// | Failure | Code |
/// |------|------------|
/// | no Authorization header | NotAuthenticated (401) |
/// | malformed header / bad signature | TokenInvalid (401) |
/// | expired | TokenExpired (401) |
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let user = state
        .jwt
        .validate_token(token)
        .and_then(CurrentUser::try_from)
        .map_err(|e| {
            tracing::debug!(uri = %req.uri(), "Token rejected: {e}");
            match e {
                JwtError::ExpiredToken => AppError::new(ErrorCode::TokenExpired),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Resolve the caller's restaurant through their staff row
///
/// No staff row → 404 "No restaurant found"; deactivated staff → 403.
pub async fn require_tenant(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(AppError::not_authenticated)?;

    let staff = state
        .db
        .staff
        .find_by_user(user.user_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    if !staff.is_active {
        tracing::warn!(staff_id = %staff.id, "Deactivated staff member rejected");
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    req.extensions_mut().insert(TenantContext::new(user, staff));
    Ok(next.run(req).await)
}
