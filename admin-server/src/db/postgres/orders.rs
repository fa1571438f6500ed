//! Order queries

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{NewOrder, Order, OrderFilter, OrderItem, OrderWithItems};
use shared::order::OrderStatus;
use sqlx::PgPool;
use uuid::Uuid;

use super::PgStore;
use crate::db::{OrderRepository, RepoError, RepoResult};

const ORDER_COLUMNS: &str = "id, restaurant_id, customer_id, status, total_amount, \
     delivery_address, phone, customer_name, customer_email, notes, created_at, updated_at";

const ITEM_SELECT: &str = r#"
    SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, oi.price, oi.notes,
           mi.name AS menu_item_name
    FROM order_items oi
    LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id
"#;

/// Load items for a batch of orders and attach them, keeping order
async fn attach_items(pool: &PgPool, orders: Vec<Order>) -> RepoResult<Vec<OrderWithItems>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let sql = format!("{ITEM_SELECT} WHERE oi.order_id = ANY($1) ORDER BY oi.id");
    let items: Vec<OrderItem> = sqlx::query_as(&sql).bind(ids).fetch_all(pool).await?;

    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderWithItems {
            order_items: by_order.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect())
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn list(
        &self,
        restaurant_id: Uuid,
        filter: &OrderFilter,
    ) -> RepoResult<(Vec<OrderWithItems>, u64)> {
        const WHERE: &str = r#"
            WHERE restaurant_id = $1
              AND ($2::order_status IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at <= $4)
        "#;

        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders {WHERE} ORDER BY created_at DESC LIMIT $5 OFFSET $6"
        );
        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .bind(filter.status)
            .bind(filter.start)
            .bind(filter.end)
            .bind(i64::from(filter.limit))
            .bind(i64::from(filter.offset))
            .fetch_all(&self.pool)
            .await?;

        let sql = format!("SELECT COUNT(*) FROM orders {WHERE}");
        let (total,): (i64,) = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .bind(filter.status)
            .bind(filter.start)
            .bind(filter.end)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(%restaurant_id, total, "Listed orders");
        Ok((attach_items(&self.pool, orders).await?, total.max(0) as u64))
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<OrderWithItems>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let order: Option<Order> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match order {
            Some(order) => Ok(attach_items(&self.pool, vec![order]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, new: NewOrder) -> RepoResult<OrderWithItems> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO orders (restaurant_id, customer_id, status, total_amount,
                                delivery_address, phone, customer_name, customer_email, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let order: Order = sqlx::query_as(&sql)
            .bind(new.restaurant_id)
            .bind(new.customer_id)
            .bind(OrderStatus::Pending)
            .bind(new.total_amount)
            .bind(&new.delivery_address)
            .bind(&new.phone)
            .bind(&new.customer_name)
            .bind(&new.customer_email)
            .bind(&new.notes)
            .fetch_one(&mut *tx)
            .await?;

        let mut order_items = Vec::with_capacity(new.items.len());
        for item in new.items {
            let (id,): (Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO order_items (order_id, menu_item_id, quantity, price, notes)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(order.id)
            .bind(item.menu_item_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(&item.notes)
            .fetch_one(&mut *tx)
            .await?;

            order_items.push(OrderItem {
                id,
                order_id: order.id,
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                price: item.price,
                notes: item.notes,
                menu_item_name: Some(item.menu_item_name),
            });
        }

        tx.commit().await?;
        Ok(OrderWithItems { order, order_items })
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
        notes: Option<String>,
    ) -> RepoResult<Option<Order>> {
        let sql = format!(
            r#"
            UPDATE orders
            SET status = $3, notes = COALESCE($4, notes), updated_at = now()
            WHERE id = $1 AND status = $2
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let order: Option<Order> = sqlx::query_as(&sql)
            .bind(id)
            .bind(expected)
            .bind(next)
            .bind(notes)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn in_range(
        &self,
        restaurant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE restaurant_id = $1
              AND created_at >= $2 AND created_at <= $3
              AND ($4::order_status IS NULL OR status = $4)
            ORDER BY created_at
            "#
        );
        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .bind(start)
            .bind(end)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    async fn completed_items(
        &self,
        restaurant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<OrderItem>> {
        let sql = format!(
            r#"
            {ITEM_SELECT}
            JOIN orders o ON o.id = oi.order_id
            WHERE o.restaurant_id = $1
              AND o.status = 'completed'
              AND o.created_at >= $2 AND o.created_at <= $3
            "#
        );
        let items: Vec<OrderItem> = sqlx::query_as(&sql)
            .bind(restaurant_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn count_by_status(
        &self,
        restaurant_id: Uuid,
        statuses: &[OrderStatus],
    ) -> RepoResult<u64> {
        let names: Vec<&str> = statuses.iter().map(OrderStatus::as_str).collect();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders WHERE restaurant_id = $1 AND status::text = ANY($2)",
        )
        .bind(restaurant_id)
        .bind(names)
        .fetch_one(&self.pool)
        .await?;
        u64::try_from(count).map_err(|e| RepoError::Database(e.to_string()))
    }
}
