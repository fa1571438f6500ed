//! Aggregation passes over fetched orders
//!
//! Pure functions; callers fetch the rows for the period and pass them in.
//! Order averages are rounded to cents; menu average prices are exact.

use std::collections::{BTreeMap, HashMap};

use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    DailySales, HourlySales, MenuItemPerformance, Order, OrderItem, OrderStats, SalesReport,
    SalesSummary,
};
use shared::order::OrderStatus;
use shared::util::{local_date, local_hour};

/// Number of items in the menu report
pub const MENU_REPORT_LIMIT: usize = 20;

/// Fallback name for line items whose menu item no longer exists
pub const UNKNOWN_ITEM: &str = "Unknown Item";

fn quotient(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

fn average(total: Decimal, count: u64) -> Decimal {
    quotient(total, count).round_dp(2)
}

/// Order statistics over every order of the period
///
/// Revenue and average count completed orders only.
pub fn order_stats(period: &str, orders: &[Order]) -> OrderStats {
    let mut orders_by_status: BTreeMap<OrderStatus, u64> =
        OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    let mut revenue = Decimal::ZERO;
    let mut completed = 0u64;

    for order in orders {
        *orders_by_status.entry(order.status).or_default() += 1;
        if order.status == OrderStatus::Completed {
            revenue += order.total_amount;
            completed += 1;
        }
    }

    OrderStats {
        period: period.to_string(),
        total_orders: orders.len() as u64,
        total_revenue: revenue,
        average_order_value: average(revenue, completed),
        orders_by_status,
    }
}

/// Sales report over completed orders, bucketed in the business time zone
pub fn sales_report(period: &str, completed: &[Order], tz: Tz) -> SalesReport {
    let mut total_revenue = Decimal::ZERO;
    let mut daily: BTreeMap<chrono::NaiveDate, (Decimal, u64)> = BTreeMap::new();
    let mut hourly: BTreeMap<u32, (Decimal, u64)> = BTreeMap::new();

    for order in completed.iter().filter(|o| o.status == OrderStatus::Completed) {
        total_revenue += order.total_amount;

        let day = daily.entry(local_date(order.created_at, tz)).or_default();
        day.0 += order.total_amount;
        day.1 += 1;

        let hour = hourly.entry(local_hour(order.created_at, tz)).or_default();
        hour.0 += order.total_amount;
        hour.1 += 1;
    }

    let total_orders: u64 = daily.values().map(|(_, n)| n).sum();

    SalesReport {
        summary: SalesSummary {
            total_revenue,
            total_orders,
            avg_order_value: average(total_revenue, total_orders),
            period: period.to_string(),
        },
        daily_sales: daily
            .into_iter()
            .map(|(date, (revenue, orders))| DailySales {
                date,
                revenue,
                orders,
            })
            .collect(),
        hourly_orders: hourly.iter().map(|(h, (_, n))| (*h, *n)).collect(),
        hourly_sales: hourly
            .into_iter()
            .map(|(hour, (revenue, orders))| HourlySales {
                hour,
                revenue,
                orders,
            })
            .collect(),
    }
}

/// Best-selling items by quantity
///
/// Items are grouped by menu item name; ties are broken by name.
pub fn menu_performance(items: &[OrderItem]) -> Vec<MenuItemPerformance> {
    let mut by_name: HashMap<&str, (u64, Decimal, u64)> = HashMap::new();
    for item in items {
        let name = item.menu_item_name.as_deref().unwrap_or(UNKNOWN_ITEM);
        let entry = by_name.entry(name).or_default();
        entry.0 += u64::try_from(item.quantity).unwrap_or(0);
        entry.1 += item.line_total();
        entry.2 += 1;
    }

    let mut ranked: Vec<MenuItemPerformance> = by_name
        .into_iter()
        .map(|(name, (quantity, revenue, orders))| MenuItemPerformance {
            name: name.to_string(),
            quantity,
            revenue,
            orders,
            avg_price: quotient(revenue, quantity),
        })
        .collect();

    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(MENU_REPORT_LIMIT);
    ranked
}
