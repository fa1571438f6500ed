//! Unified service-layer error type for admin-server
//!
//! `ServiceError` bridges repository errors (`RepoError`) and the API-layer
//! error (`AppError`), so services can use `?` on both.

use axum::response::IntoResponse;
use shared::error::AppError;

use crate::db::RepoError;

#[derive(Debug)]
pub enum ServiceError {
    /// Storage error (logged, mapped by kind)
    Repo(RepoError),
    /// Business-rule error, passed through to the client
    App(AppError),
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        ServiceError::Repo(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Repo(RepoError::NotFound(what)) => AppError::not_found(what),
            ServiceError::Repo(RepoError::Duplicate(msg)) => AppError::conflict(msg),
            ServiceError::Repo(RepoError::Validation(msg)) => AppError::validation(msg),
            ServiceError::Repo(RepoError::Database(msg)) => {
                tracing::error!(error = %msg, "Service database error");
                AppError::database(msg)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_repo_errors_map_by_kind() {
        let err: AppError = ServiceError::Repo(RepoError::NotFound("Staff".into())).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Staff not found");
        assert_eq!(err.details.unwrap()["resource"], "Staff");

        let err: AppError = ServiceError::Repo(RepoError::Duplicate("Email already in use".into())).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError =
            ServiceError::Repo(RepoError::Database("connection reset by peer".into())).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.public_message(), "Database error");
    }

    #[test]
    fn test_app_errors_pass_through() {
        let err: AppError = ServiceError::App(AppError::new(ErrorCode::OrderNotCancellable)).into();
        assert_eq!(err.code, ErrorCode::OrderNotCancellable);
    }
}
