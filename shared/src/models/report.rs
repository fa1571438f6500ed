//! Analytics response types
//!
//! Field names are camelCase on the wire, as consumed by the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::order::OrderStatus;

/// `GET /api/orders/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub period: String,
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_order_value: Decimal,
    /// Every status is present, zero-filled
    pub orders_by_status: BTreeMap<OrderStatus, u64>,
}

/// `GET /api/reports/sales`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub summary: SalesSummary,
    pub daily_sales: Vec<DailySales>,
    /// Hour of day (0-23) → completed orders; hours without orders are absent
    pub hourly_orders: BTreeMap<u32, u64>,
    pub hourly_sales: Vec<HourlySales>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_order_value: Decimal,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySales {
    pub hour: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    pub orders: u64,
}

/// `GET /api/reports/menu`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuReport {
    pub popular_items: Vec<MenuItemPerformance>,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPerformance {
    pub name: String,
    pub quantity: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Number of order lines the item appeared on
    pub orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_price: Decimal,
}

/// `GET /api/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub todays_orders: u64,
    /// Revenue of today's orders, cancelled orders excluded
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    pub active_orders: u64,
    pub menu_items: u64,
}

/// `GET /api/staff/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffStats {
    pub total_staff: u64,
    /// Owners and managers
    pub admins: u64,
    pub staff: u64,
    pub active_this_month: u64,
}

/// `GET /api/staff/:id/activity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffActivity {
    pub orders_managed: u64,
    pub menu_items_created: u64,
    pub last_active: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_stats_wire_shape() {
        let stats = OrderStats {
            period: "today".into(),
            total_orders: 3,
            total_revenue: Decimal::new(4550, 2),
            average_order_value: Decimal::new(2275, 2),
            orders_by_status: OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalOrders"], 3);
        assert_eq!(json["totalRevenue"], 45.5);
        assert_eq!(json["ordersByStatus"]["out_for_delivery"], 0);
        assert_eq!(json["ordersByStatus"].as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_sales_report_wire_shape() {
        let report = SalesReport {
            summary: SalesSummary {
                total_revenue: Decimal::new(10, 0),
                total_orders: 1,
                avg_order_value: Decimal::new(10, 0),
                period: "7d".into(),
            },
            daily_sales: vec![DailySales {
                date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                revenue: Decimal::new(10, 0),
                orders: 1,
            }],
            hourly_orders: BTreeMap::from([(13, 1)]),
            hourly_sales: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["avgOrderValue"], 10.0);
        assert_eq!(json["dailySales"][0]["date"], "2025-06-01");
        assert_eq!(json["hourlyOrders"]["13"], 1);
    }
}
