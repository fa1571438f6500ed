//! Process-local store
//!
//! Implements every repository trait over `parking_lot` locked maps. Used by
//! the test suites and by `STORAGE=memory` for local development. Writes
//! that must be atomic in PostgreSQL (order creation, conditional status
//! updates) happen under a single write lock here.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::models::{
    AuditLog, BusinessHours, Location, MenuItem, NewAuditLog, NewOrder, Order, OrderFilter,
    OrderItem, OrderWithItems, Restaurant, Staff, StaffPermissions, StaffProfileUpdate, StaffRole,
};
use shared::order::OrderStatus;
use uuid::Uuid;

use super::{
    AuditRepository, MenuRepository, OrderRepository, RepoError, RepoResult,
    RestaurantRepository, StaffRepository,
};

#[derive(Default)]
struct Inner {
    restaurants: HashMap<Uuid, Restaurant>,
    locations: Vec<Location>,
    menu_items: HashMap<Uuid, MenuItem>,
    staff: HashMap<Uuid, Staff>,
    orders: HashMap<Uuid, Order>,
    order_items: Vec<OrderItem>,
    audit_logs: Vec<AuditLog>,
}

impl Inner {
    /// Items of an order with the menu item name joined in
    fn items_of(&self, order_id: Uuid) -> Vec<OrderItem> {
        self.order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .map(|i| self.with_name(i))
            .collect()
    }

    fn with_name(&self, item: &OrderItem) -> OrderItem {
        OrderItem {
            menu_item_name: self
                .menu_items
                .get(&item.menu_item_id)
                .map(|m| m.name.clone()),
            ..item.clone()
        }
    }

    fn with_items(&self, order: &Order) -> OrderWithItems {
        OrderWithItems {
            order: order.clone(),
            order_items: self.items_of(order.id),
        }
    }

    fn staff_mut(&mut self, id: Uuid) -> RepoResult<&mut Staff> {
        self.staff
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Staff {id}")))
    }
}

/// In-memory implementation of every repository trait
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Seeding ====================

    pub fn add_restaurant(&self, name: &str) -> Restaurant {
        let now = Utc::now();
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            email: None,
            phone: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .restaurants
            .insert(restaurant.id, restaurant.clone());
        restaurant
    }

    pub fn add_location(
        &self,
        restaurant_id: Uuid,
        name: &str,
        business_hours: BusinessHours,
    ) -> Location {
        let location = Location {
            id: Uuid::new_v4(),
            restaurant_id,
            name: name.to_string(),
            address: None,
            city: None,
            state: None,
            zip_code: None,
            phone: None,
            is_active: true,
            business_hours,
            created_at: Utc::now(),
        };
        self.inner.write().locations.push(location.clone());
        location
    }

    pub fn add_menu_item(&self, restaurant_id: Uuid, name: &str, price: Decimal) -> MenuItem {
        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4(),
            restaurant_id,
            category_id: None,
            name: name.to_string(),
            description: None,
            price,
            is_active: true,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        self.put_menu_item(item.clone());
        item
    }

    /// Insert or replace a menu item
    pub fn put_menu_item(&self, item: MenuItem) {
        self.inner.write().menu_items.insert(item.id, item);
    }

    /// Staff member with a fresh auth user id and no extra permissions
    pub fn add_staff(&self, restaurant_id: Uuid, email: &str, role: StaffRole) -> Staff {
        let now = Utc::now();
        let staff = Staff {
            id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            restaurant_id,
            email: email.to_string(),
            name: None,
            role,
            permissions: StaffPermissions::default(),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        self.put_staff(staff.clone());
        staff
    }

    /// Insert or replace a staff row
    pub fn put_staff(&self, staff: Staff) {
        self.inner.write().staff.insert(staff.id, staff);
    }

    /// Insert an order verbatim (historical data, fixed timestamps)
    pub fn put_order(&self, order: OrderWithItems) {
        let mut inner = self.inner.write();
        inner.order_items.retain(|i| i.order_id != order.order.id);
        inner.order_items.extend(order.order_items);
        inner.orders.insert(order.order.id, order.order);
    }

    /// Store with one demo restaurant, its owner and a small menu
    ///
    /// Returns the owner so the caller can mint a development token.
    pub fn with_demo_data() -> (Self, Staff) {
        let store = Self::new();
        let restaurant = store.add_restaurant("Demo Kitchen");
        store.add_location(restaurant.id, "Main Street", BusinessHours::default());
        store.add_menu_item(restaurant.id, "Margherita Pizza", Decimal::new(1250, 2));
        store.add_menu_item(restaurant.id, "Caesar Salad", Decimal::new(895, 2));
        store.add_menu_item(restaurant.id, "Lemonade", Decimal::new(350, 2));
        let owner = store.add_staff(restaurant.id, "owner@demo.kitchen", StaffRole::Owner);
        (store, owner)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn list(
        &self,
        restaurant_id: Uuid,
        filter: &OrderFilter,
    ) -> RepoResult<(Vec<OrderWithItems>, u64)> {
        let inner = self.inner.read();
        let mut matching: Vec<&Order> = inner
            .orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id && filter.matches(o))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(|o| inner.with_items(o))
            .collect();
        Ok((page, total))
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<OrderWithItems>> {
        let inner = self.inner.read();
        Ok(inner.orders.get(&id).map(|o| inner.with_items(o)))
    }

    async fn create(&self, new: NewOrder) -> RepoResult<OrderWithItems> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            restaurant_id: new.restaurant_id,
            customer_id: new.customer_id,
            status: OrderStatus::Pending,
            total_amount: new.total_amount,
            delivery_address: new.delivery_address,
            phone: new.phone,
            customer_name: new.customer_name,
            customer_email: new.customer_email,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        let order_items: Vec<OrderItem> = new
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                price: item.price,
                notes: item.notes,
                menu_item_name: Some(item.menu_item_name),
            })
            .collect();

        let created = OrderWithItems {
            order,
            order_items,
        };
        self.put_order(created.clone());
        Ok(created)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
        notes: Option<String>,
    ) -> RepoResult<Option<Order>> {
        let mut inner = self.inner.write();
        let Some(order) = inner.orders.get_mut(&id) else {
            return Ok(None);
        };
        if order.status != expected {
            return Ok(None);
        }
        order.status = next;
        if notes.is_some() {
            order.notes = notes;
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn in_range(
        &self,
        restaurant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>> {
        let inner = self.inner.read();
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| {
                o.restaurant_id == restaurant_id
                    && o.created_at >= start
                    && o.created_at <= end
                    && status.is_none_or(|s| o.status == s)
            })
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn completed_items(
        &self,
        restaurant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<OrderItem>> {
        let inner = self.inner.read();
        Ok(inner
            .order_items
            .iter()
            .filter(|item| {
                inner.orders.get(&item.order_id).is_some_and(|o| {
                    o.restaurant_id == restaurant_id
                        && o.status == OrderStatus::Completed
                        && o.created_at >= start
                        && o.created_at <= end
                })
            })
            .map(|item| inner.with_name(item))
            .collect())
    }

    async fn count_by_status(
        &self,
        restaurant_id: Uuid,
        statuses: &[OrderStatus],
    ) -> RepoResult<u64> {
        let inner = self.inner.read();
        Ok(inner
            .orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id && statuses.contains(&o.status))
            .count() as u64)
    }
}

#[async_trait]
impl MenuRepository for MemoryStore {
    async fn find_many(&self, restaurant_id: Uuid, ids: &[Uuid]) -> RepoResult<Vec<MenuItem>> {
        let inner = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.menu_items.get(id))
            .filter(|m| m.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn count_active(&self, restaurant_id: Uuid) -> RepoResult<u64> {
        let inner = self.inner.read();
        Ok(inner
            .menu_items
            .values()
            .filter(|m| m.restaurant_id == restaurant_id && m.is_active)
            .count() as u64)
    }
}

#[async_trait]
impl StaffRepository for MemoryStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<Staff>> {
        Ok(self.inner.read().staff.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Option<Staff>> {
        Ok(self
            .inner
            .read()
            .staff
            .values()
            .find(|s| s.user_id == Some(user_id))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Staff>> {
        Ok(self
            .inner
            .read()
            .staff
            .values()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, restaurant_id: Uuid, role: Option<StaffRole>) -> RepoResult<Vec<Staff>> {
        let mut rows: Vec<Staff> = self
            .inner
            .read()
            .staff
            .values()
            .filter(|s| s.restaurant_id == restaurant_id && role.is_none_or(|r| s.role == r))
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.created_at);
        Ok(rows)
    }

    async fn update_permissions(&self, id: Uuid, permissions: StaffPermissions) -> RepoResult<Staff> {
        let mut inner = self.inner.write();
        let staff = inner.staff_mut(id)?;
        staff.permissions = permissions;
        staff.updated_at = Utc::now();
        Ok(staff.clone())
    }

    async fn update_role(&self, id: Uuid, role: StaffRole) -> RepoResult<Staff> {
        let mut inner = self.inner.write();
        let staff = inner.staff_mut(id)?;
        staff.role = role;
        staff.updated_at = Utc::now();
        Ok(staff.clone())
    }

    async fn update_profile(&self, id: Uuid, profile: &StaffProfileUpdate) -> RepoResult<Staff> {
        let mut inner = self.inner.write();
        if let Some(email) = &profile.email
            && inner
                .staff
                .values()
                .any(|s| s.id != id && s.email.eq_ignore_ascii_case(email))
        {
            return Err(RepoError::Duplicate(format!("staff email {email}")));
        }
        let staff = inner.staff_mut(id)?;
        if let Some(name) = &profile.name {
            staff.name = Some(name.clone());
        }
        if let Some(email) = &profile.email {
            staff.email = email.clone();
        }
        staff.updated_at = Utc::now();
        Ok(staff.clone())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> RepoResult<Staff> {
        let mut inner = self.inner.write();
        let staff = inner.staff_mut(id)?;
        staff.is_active = is_active;
        staff.updated_at = Utc::now();
        Ok(staff.clone())
    }
}

#[async_trait]
impl RestaurantRepository for MemoryStore {
    async fn find(&self, id: Uuid) -> RepoResult<Option<Restaurant>> {
        Ok(self.inner.read().restaurants.get(&id).cloned())
    }

    async fn locations(&self, restaurant_id: Uuid) -> RepoResult<Vec<Location>> {
        let mut rows: Vec<Location> = self
            .inner
            .read()
            .locations
            .iter()
            .filter(|l| l.restaurant_id == restaurant_id && l.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[async_trait]
impl AuditRepository for MemoryStore {
    async fn record(&self, entry: NewAuditLog) -> RepoResult<()> {
        self.inner.write().audit_logs.push(AuditLog {
            id: Uuid::new_v4(),
            action: entry.action,
            user_id: entry.user_id,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            details: entry.details,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn recent_by_user(&self, user_id: Uuid, limit: u32) -> RepoResult<Vec<AuditLog>> {
        let inner = self.inner.read();
        // Insertion order breaks ties between entries written in the same instant
        Ok(inner
            .audit_logs
            .iter()
            .rev()
            .filter(|log| log.user_id == Some(user_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_conditional_status_update() {
        let store = MemoryStore::new();
        let restaurant = store.add_restaurant("Cafe");
        let item = store.add_menu_item(restaurant.id, "Tea", Decimal::new(300, 2));
        let created = store
            .create(NewOrder {
                restaurant_id: restaurant.id,
                customer_id: None,
                total_amount: Decimal::new(300, 2),
                delivery_address: None,
                phone: "5550001111".into(),
                customer_name: None,
                customer_email: None,
                notes: None,
                items: vec![shared::models::NewOrderItem {
                    menu_item_id: item.id,
                    menu_item_name: item.name.clone(),
                    quantity: 1,
                    price: item.price,
                    notes: None,
                }],
            })
            .await
            .unwrap();
        let id = created.order.id;

        let moved = store
            .update_status(id, OrderStatus::Pending, OrderStatus::Confirmed, None)
            .await
            .unwrap();
        assert_eq!(moved.unwrap().status, OrderStatus::Confirmed);

        // A second writer still expecting `pending` loses
        let stale = store
            .update_status(id, OrderStatus::Pending, OrderStatus::Cancelled, None)
            .await
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(
            OrderRepository::find(&store, id)
                .await
                .unwrap()
                .unwrap()
                .order
                .status,
            OrderStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_profile_email_must_be_unique() {
        let store = MemoryStore::new();
        let restaurant = store.add_restaurant("Cafe");
        let a = store.add_staff(restaurant.id, "a@cafe.test", StaffRole::Staff);
        store.add_staff(restaurant.id, "b@cafe.test", StaffRole::Staff);

        let err = store
            .update_profile(
                a.id,
                &StaffProfileUpdate {
                    name: None,
                    email: Some("B@cafe.test".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_menu_lookup_is_scoped_to_restaurant() {
        let store = MemoryStore::new();
        let mine = store.add_restaurant("Mine");
        let theirs = store.add_restaurant("Theirs");
        let item = store.add_menu_item(theirs.id, "Soup", Decimal::new(500, 2));

        assert!(store.find_many(mine.id, &[item.id]).await.unwrap().is_empty());
        assert_eq!(store.find_many(theirs.id, &[item.id]).await.unwrap().len(), 1);
    }
}
