//! Business logic between the HTTP handlers and the repositories
//!
//! Every service method takes the caller's [`TenantContext`](crate::auth::TenantContext)
//! and enforces restaurant scoping and permissions itself, so handlers stay thin.

pub mod analytics;
pub mod order;
pub mod reports;
pub mod restaurant;
pub mod staff;

pub use order::{CancelOrderRequest, CreateOrderItem, CreateOrderRequest, OrderService};
pub use reports::ReportService;
pub use restaurant::{LocationView, RestaurantService};
pub use staff::StaffService;

use shared::models::NewAuditLog;

use crate::db::Database;

/// Write an audit entry; failures are logged and never fail the request
pub(crate) async fn audit(db: &Database, entry: NewAuditLog) {
    let action = entry.action.clone();
    if let Err(e) = db.audit.record(entry).await {
        tracing::warn!(action = %action, error = %e, "Failed to write audit log");
    }
}
