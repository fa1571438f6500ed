//! Order lifecycle: list, detail, create, status changes, cancellation, stats

use std::collections::HashMap;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    NewAuditLog, NewOrder, NewOrderItem, Order, OrderFilter, OrderStats, OrderWithItems,
    RESOURCE_ORDER, append_cancellation_note,
};
use shared::order::OrderStatus;
use shared::response::Pagination;
use uuid::Uuid;
use validator::Validate;

use super::{analytics, audit};
use crate::auth::{Permission, TenantContext};
use crate::db::Database;
use crate::error::ServiceResult;
use crate::utils::period::{RequestedPeriod, StatsPeriod};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, validate, validate_optional_text,
    validate_required_text,
};

/// Log target for order notifications (created, status changed)
const NOTIFY_TARGET: &str = "notifications";

/// `POST /api/orders` body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "At least one item required"), nested)]
    pub items: Vec<CreateOrderItem>,
    #[validate(length(min = 10, max = 30, message = "Valid phone number required"))]
    pub phone: String,
    pub delivery_address: Option<String>,
    pub customer_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub customer_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    pub quantity: i32,
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    fn check(&self) -> Result<(), AppError> {
        validate(self)?;
        validate_optional_text(self.delivery_address.as_deref(), "deliveryAddress", MAX_ADDRESS_LEN)?;
        validate_optional_text(self.customer_name.as_deref(), "customerName", MAX_NAME_LEN)?;
        validate_optional_text(self.notes.as_deref(), "notes", MAX_NOTE_LEN)?;
        for item in &self.items {
            validate_optional_text(item.notes.as_deref(), "items.notes", MAX_NOTE_LEN)?;
        }
        Ok(())
    }
}

/// `PATCH /api/orders/:id` body
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// `DELETE /api/orders/:id` body
#[derive(Debug, Deserialize)]
pub struct CancelOrderRequest {
    #[serde(default)]
    pub reason: String,
}

/// Parse a status from the wire, rejecting unknown values with a 400
pub fn parse_status(value: &str) -> Result<OrderStatus, AppError> {
    value.parse().map_err(|_| {
        let allowed: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
        AppError::with_message(ErrorCode::InvalidOrderStatus, format!("Invalid status: {value}"))
            .with_detail("allowed", allowed)
    })
}

#[derive(Clone)]
pub struct OrderService {
    db: Database,
    tz: Tz,
}

impl OrderService {
    pub fn new(db: Database, tz: Tz) -> Self {
        Self { db, tz }
    }

    /// Page of the caller's orders, newest first
    pub async fn list(
        &self,
        ctx: &TenantContext,
        filter: OrderFilter,
    ) -> ServiceResult<(Vec<OrderWithItems>, Pagination)> {
        let (orders, total) = self.db.orders.list(ctx.restaurant_id(), &filter).await?;
        tracing::debug!(
            restaurant_id = %ctx.restaurant_id(),
            returned = orders.len(),
            total,
            "Listed orders"
        );
        Ok((orders, Pagination::new(filter.limit, filter.offset, total)))
    }

    /// Order of the caller's restaurant
    ///
    /// Missing orders are 404; orders of another restaurant are 403.
    pub async fn get(&self, ctx: &TenantContext, id: Uuid) -> ServiceResult<OrderWithItems> {
        let order = self
            .db
            .orders
            .find(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        ctx.ensure_same_restaurant(order.order.restaurant_id)?;
        Ok(order)
    }

    /// Load an order the caller is about to mutate
    pub async fn load_for_update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
    ) -> ServiceResult<OrderWithItems> {
        let order = self.get(ctx, id).await?;
        ctx.require(Permission::ManageOrders)?;
        Ok(order)
    }

    pub async fn create(
        &self,
        ctx: &TenantContext,
        req: CreateOrderRequest,
    ) -> ServiceResult<OrderWithItems> {
        ctx.require(Permission::ManageOrders)?;
        req.check()?;

        let mut ids: Vec<Uuid> = req.items.iter().map(|i| i.menu_item_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let menu: HashMap<Uuid, _> = self
            .db
            .menu
            .find_many(ctx.restaurant_id(), &ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let mut unavailable: Vec<&str> = Vec::new();
        let mut items = Vec::with_capacity(req.items.len());
        let mut total = Decimal::ZERO;
        for line in &req.items {
            let Some(menu_item) = menu.get(&line.menu_item_id) else {
                return Err(AppError::with_message(
                    ErrorCode::MenuItemNotFound,
                    format!("Menu item {} not found", line.menu_item_id),
                )
                .into());
            };
            if !menu_item.is_orderable() {
                if !unavailable.contains(&menu_item.name.as_str()) {
                    unavailable.push(&menu_item.name);
                }
                continue;
            }
            total += menu_item.price * Decimal::from(line.quantity);
            items.push(NewOrderItem {
                menu_item_id: menu_item.id,
                menu_item_name: menu_item.name.clone(),
                quantity: line.quantity,
                price: menu_item.price,
                notes: line.notes.clone(),
            });
        }
        if !unavailable.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("Menu items not available: {}", unavailable.join(", ")),
            )
            .into());
        }

        let created = self
            .db
            .orders
            .create(NewOrder {
                restaurant_id: ctx.restaurant_id(),
                customer_id: Some(ctx.user_id()),
                total_amount: total,
                delivery_address: req.delivery_address,
                phone: req.phone,
                customer_name: req.customer_name,
                customer_email: req.customer_email,
                notes: req.notes,
                items,
            })
            .await?;

        let order = &created.order;
        audit(
            &self.db,
            NewAuditLog::new("create", RESOURCE_ORDER)
                .by(ctx.user_id())
                .on(order.id)
                .details(json!({ "total_amount": order.total_amount, "items": created.order_items.len() })),
        )
        .await;
        tracing::info!(
            target: NOTIFY_TARGET,
            order_id = %order.id,
            restaurant_id = %order.restaurant_id,
            total = %order.total_amount,
            "New order received"
        );

        Ok(created)
    }

    /// Move `current` to `next` if the status machine allows it
    pub async fn update_status(
        &self,
        ctx: &TenantContext,
        current: &Order,
        next: OrderStatus,
    ) -> ServiceResult<Order> {
        if !current.status.can_transition_to(next) {
            tracing::warn!(
                order_id = %current.id,
                from = %current.status,
                to = %next,
                "Rejected status transition"
            );
            return Err(invalid_transition(current.status, next).into());
        }
        let updated = self.transition(ctx, current, next, None).await?;
        tracing::info!(
            target: NOTIFY_TARGET,
            order_id = %updated.id,
            from = %current.status,
            to = %updated.status,
            "Order status changed"
        );
        Ok(updated)
    }

    /// Cancel an order that has not left the kitchen yet
    pub async fn cancel(
        &self,
        ctx: &TenantContext,
        current: &Order,
        reason: &str,
    ) -> ServiceResult<Order> {
        validate_required_text(reason, "Cancellation reason", MAX_NOTE_LEN)?;
        if !current.status.is_cancellable() {
            return Err(AppError::with_message(
                ErrorCode::OrderNotCancellable,
                format!("Cannot cancel order in {} status", current.status),
            )
            .into());
        }

        let notes = append_cancellation_note(current.notes.as_deref(), reason.trim());
        let updated = self
            .transition(ctx, current, OrderStatus::Cancelled, Some(notes))
            .await?;
        tracing::info!(
            target: NOTIFY_TARGET,
            order_id = %updated.id,
            reason = %reason.trim(),
            "Order cancelled"
        );
        Ok(updated)
    }

    async fn transition(
        &self,
        ctx: &TenantContext,
        current: &Order,
        next: OrderStatus,
        notes: Option<String>,
    ) -> ServiceResult<Order> {
        // Conditional on the status we validated against; a concurrent
        // writer that got there first makes this a stale transition.
        let Some(updated) = self
            .db
            .orders
            .update_status(current.id, current.status, next, notes)
            .await?
        else {
            tracing::warn!(order_id = %current.id, expected = %current.status, "Order changed concurrently");
            return Err(invalid_transition(current.status, next).into());
        };

        audit(
            &self.db,
            NewAuditLog::new("update_status", RESOURCE_ORDER)
                .by(ctx.user_id())
                .on(updated.id)
                .details(json!({ "from": current.status, "to": next })),
        )
        .await;
        Ok(updated)
    }

    /// Counts and completed revenue for the period
    pub async fn stats(
        &self,
        ctx: &TenantContext,
        period: &RequestedPeriod<StatsPeriod>,
    ) -> ServiceResult<OrderStats> {
        ctx.require(Permission::ViewReports)?;
        let now = shared::util::now();
        let orders = self
            .db
            .orders
            .in_range(ctx.restaurant_id(), period.start(now, self.tz), now, None)
            .await?;
        Ok(analytics::order_stats(period.label(), &orders))
    }
}

fn invalid_transition(from: OrderStatus, to: OrderStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("Invalid status transition from {from} to {to}"),
    )
    .with_detail("from", from.as_str())
    .with_detail("to", to.as_str())
}
