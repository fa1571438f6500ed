//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::order::OrderStatus;

/// Order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    /// Auth user that placed the order (None for walk-in / imported orders)
    pub customer_id: Option<Uuid>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub delivery_address: Option<String>,
    pub phone: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line item, joined with the menu item name for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    /// Unit price captured when the order was placed
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub notes: Option<String>,
    pub menu_item_name: Option<String>,
}

impl OrderItem {
    /// price × quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order with its line items (list and detail responses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

/// Priced order ready to be written
///
/// Built by the order service after menu items are resolved; the
/// repository stores it verbatim inside one transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub delivery_address: Option<String>,
    pub phone: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: Uuid,
    pub menu_item_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub notes: Option<String>,
}

/// Filters for listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: u32,
    pub offset: u32,
}

impl OrderFilter {
    /// Whether an order matches the status and date filters (paging ignored)
    pub fn matches(&self, order: &Order) -> bool {
        self.status.is_none_or(|s| order.status == s)
            && self.start.is_none_or(|start| order.created_at >= start)
            && self.end.is_none_or(|end| order.created_at <= end)
    }
}

/// Note appended to an order when it is cancelled
pub fn append_cancellation_note(notes: Option<&str>, reason: &str) -> String {
    let line = format!("Cancellation reason: {reason}");
    match notes.filter(|n| !n.is_empty()) {
        Some(existing) => format!("{existing}\n\n{line}"),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn order(status: OrderStatus, created_at: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            customer_id: None,
            status,
            total_amount: dec("12.50"),
            delivery_address: None,
            phone: "5551234567".into(),
            customer_name: None,
            customer_email: None,
            notes: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            menu_item_id: Uuid::new_v4(),
            quantity: 3,
            price: dec("4.25"),
            notes: None,
            menu_item_name: Some("Taco".into()),
        };
        assert_eq!(item.line_total(), dec("12.75"));
    }

    #[test]
    fn test_cancellation_note() {
        assert_eq!(
            append_cancellation_note(None, "Customer request"),
            "Cancellation reason: Customer request"
        );
        assert_eq!(
            append_cancellation_note(Some(""), "Out of stock"),
            "Cancellation reason: Out of stock"
        );
        assert_eq!(
            append_cancellation_note(Some("No onions"), "Out of stock"),
            "No onions\n\nCancellation reason: Out of stock"
        );
    }

    #[test]
    fn test_filter_matches() {
        use chrono::TimeZone;
        let at = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        let o = order(OrderStatus::Ready, at);

        assert!(OrderFilter::default().matches(&o));
        let filter = OrderFilter {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        };
        assert!(!filter.matches(&o));

        let filter = OrderFilter {
            start: Some(at),
            end: Some(at),
            ..Default::default()
        };
        assert!(filter.matches(&o));

        let filter = OrderFilter {
            start: Some(at + chrono::Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!filter.matches(&o));
    }

    #[test]
    fn test_order_with_items_flattens() {
        let o = OrderWithItems {
            order: order(OrderStatus::Pending, Utc::now()),
            order_items: vec![],
        };
        let json = serde_json::to_value(&o).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["total_amount"], 12.5);
        assert!(json["order_items"].as_array().unwrap().is_empty());
    }
}
