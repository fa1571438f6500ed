//! Sales, menu and dashboard reports

use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{DashboardStats, MenuReport, SalesReport};
use shared::order::OrderStatus;
use shared::util::{now, start_of_local_day};

use super::analytics;
use crate::auth::{Permission, TenantContext};
use crate::db::Database;
use crate::error::ServiceResult;
use crate::utils::period::{ReportPeriod, RequestedPeriod};

#[derive(Clone)]
pub struct ReportService {
    db: Database,
    tz: Tz,
}

impl ReportService {
    pub fn new(db: Database, tz: Tz) -> Self {
        Self { db, tz }
    }

    /// Completed-order revenue by day and hour
    pub async fn sales(
        &self,
        ctx: &TenantContext,
        period: &RequestedPeriod<ReportPeriod>,
    ) -> ServiceResult<SalesReport> {
        ctx.require(Permission::ViewReports)?;
        let end = now();
        let orders = self
            .db
            .orders
            .in_range(
                ctx.restaurant_id(),
                period.start(end),
                end,
                Some(OrderStatus::Completed),
            )
            .await?;
        tracing::debug!(period = period.label(), orders = orders.len(), "Building sales report");
        Ok(analytics::sales_report(period.label(), &orders, self.tz))
    }

    /// Best sellers among completed orders
    pub async fn menu(
        &self,
        ctx: &TenantContext,
        period: &RequestedPeriod<ReportPeriod>,
    ) -> ServiceResult<MenuReport> {
        ctx.require(Permission::ViewReports)?;
        let end = now();
        let items = self
            .db
            .orders
            .completed_items(ctx.restaurant_id(), period.start(end), end)
            .await?;
        Ok(MenuReport {
            popular_items: analytics::menu_performance(&items),
            period: period.label().to_string(),
        })
    }

    /// Today's activity at a glance
    pub async fn dashboard(&self, ctx: &TenantContext) -> ServiceResult<DashboardStats> {
        let restaurant_id = ctx.restaurant_id();
        let end = now();
        let todays = self
            .db
            .orders
            .in_range(restaurant_id, start_of_local_day(end, self.tz), end, None)
            .await?;
        let active_orders = self
            .db
            .orders
            .count_by_status(restaurant_id, &OrderStatus::ACTIVE)
            .await?;
        let menu_items = self.db.menu.count_active(restaurant_id).await?;

        let revenue: Decimal = todays
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total_amount)
            .sum();

        Ok(DashboardStats {
            todays_orders: todays.len() as u64,
            revenue,
            active_orders,
            menu_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CurrentUser;
    use crate::db::memory::MemoryStore;
    use chrono::{Duration, Utc};
    use shared::error::{AppError, ErrorCode};
    use shared::models::{Order, OrderItem, OrderWithItems, Staff, StaffRole};
    use std::sync::Arc;
    use uuid::Uuid;

    fn ctx_for(staff: Staff) -> TenantContext {
        let user_id = staff.user_id.unwrap();
        TenantContext::new(CurrentUser { user_id, email: None }, staff)
    }

    fn put_order(
        store: &MemoryStore,
        restaurant_id: Uuid,
        status: OrderStatus,
        age: Duration,
        lines: &[(Uuid, i32, i64)],
    ) {
        let created_at = Utc::now() - age;
        let id = Uuid::new_v4();
        let order_items: Vec<OrderItem> = lines
            .iter()
            .map(|&(menu_item_id, quantity, cents)| OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                menu_item_id,
                quantity,
                price: Decimal::new(cents, 2),
                notes: None,
                menu_item_name: None,
            })
            .collect();
        let total: Decimal = order_items.iter().map(|i| i.line_total()).sum();
        store.put_order(OrderWithItems {
            order: Order {
                id,
                restaurant_id,
                customer_id: None,
                status,
                total_amount: total,
                delivery_address: None,
                phone: "5550000000".into(),
                customer_name: None,
                customer_email: None,
                notes: None,
                created_at,
                updated_at: created_at,
            },
            order_items,
        });
    }

    #[tokio::test]
    async fn test_sales_and_menu_reports() {
        let store = Arc::new(MemoryStore::new());
        let restaurant = store.add_restaurant("Bistro");
        let burger = store.add_menu_item(restaurant.id, "Burger", Decimal::new(1000, 2));
        let fries = store.add_menu_item(restaurant.id, "Fries", Decimal::new(300, 2));
        let owner = ctx_for(store.add_staff(restaurant.id, "o@bistro.test", StaffRole::Owner));

        let rid = restaurant.id;
        put_order(&store, rid, OrderStatus::Completed, Duration::days(1), &[(burger.id, 2, 1000), (fries.id, 1, 300)]);
        put_order(&store, rid, OrderStatus::Completed, Duration::days(3), &[(fries.id, 4, 300)]);
        // Outside 7d, inside 30d
        put_order(&store, rid, OrderStatus::Completed, Duration::days(10), &[(burger.id, 1, 1000)]);
        // Not completed
        put_order(&store, rid, OrderStatus::Preparing, Duration::hours(1), &[(burger.id, 5, 1000)]);

        let other = store.add_restaurant("Elsewhere");
        put_order(&store, other.id, OrderStatus::Completed, Duration::days(1), &[(burger.id, 9, 1000)]);

        let service = ReportService::new(Database::memory(store.clone()), Tz::UTC);

        let sales = service.sales(&owner, &ReportPeriod::Days7.into()).await.unwrap();
        assert_eq!(sales.summary.total_orders, 2);
        assert_eq!(sales.summary.total_revenue, Decimal::new(3500, 2));
        assert_eq!(sales.summary.period, "7d");

        let menu = service.menu(&owner, &ReportPeriod::Days30.into()).await.unwrap();
        assert_eq!(menu.popular_items[0].name, "Fries");
        assert_eq!(menu.popular_items[0].quantity, 5);
        assert_eq!(menu.popular_items[1].name, "Burger");
        assert_eq!(menu.popular_items[1].quantity, 3);
        assert_eq!(menu.popular_items[1].avg_price, Decimal::new(1000, 2));

        let unknown = RequestedPeriod::report(Some("5y"), ReportPeriod::Days7);
        let sales = service.sales(&owner, &unknown).await.unwrap();
        assert_eq!(sales.summary.period, "5y");
        assert_eq!(sales.summary.total_orders, 0);
        assert!(sales.daily_sales.is_empty());
        let menu = service.menu(&owner, &unknown).await.unwrap();
        assert_eq!(menu.period, "5y");
        assert!(menu.popular_items.is_empty());
    }

    #[tokio::test]
    async fn test_reports_require_permission() {
        let store = Arc::new(MemoryStore::new());
        let restaurant = store.add_restaurant("Bistro");
        let cook = ctx_for(store.add_staff(restaurant.id, "c@bistro.test", StaffRole::Kitchen));
        let service = ReportService::new(Database::memory(store), Tz::UTC);

        let err: AppError = service
            .sales(&cook, &ReportPeriod::Days7.into())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let store = Arc::new(MemoryStore::new());
        let restaurant = store.add_restaurant("Bistro");
        let burger = store.add_menu_item(restaurant.id, "Burger", Decimal::new(1000, 2));
        store.add_menu_item(restaurant.id, "Fries", Decimal::new(300, 2));
        let cook = ctx_for(store.add_staff(restaurant.id, "c@bistro.test", StaffRole::Kitchen));

        let rid = restaurant.id;
        put_order(&store, rid, OrderStatus::Pending, Duration::zero(), &[(burger.id, 1, 1000)]);
        put_order(&store, rid, OrderStatus::Completed, Duration::zero(), &[(burger.id, 2, 1000)]);
        put_order(&store, rid, OrderStatus::Cancelled, Duration::zero(), &[(burger.id, 3, 1000)]);
        put_order(&store, rid, OrderStatus::Ready, Duration::days(2), &[(burger.id, 1, 1000)]);

        let service = ReportService::new(Database::memory(store), Tz::UTC);
        let stats = service.dashboard(&cook).await.unwrap();

        assert_eq!(stats.todays_orders, 3);
        assert_eq!(stats.revenue, Decimal::new(3000, 2));
        assert_eq!(stats.active_orders, 2);
        assert_eq!(stats.menu_items, 2);
    }
}
