//! Order repository.
//!
//! Checkout is the only multi-row transaction in the API: it snapshots the
//! cart into an order and empties the cart atomically.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use plantsco_core::{OrderId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderLine, OrderSummary};

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    product_id: ProductId,
    product_name: String,
    unit_price_cents: i64,
    quantity: i64,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.product_name,
            unit_price: Price::from_cents(row.unit_price_cents),
            quantity: row.quantity,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user's order history, newest first.
    ///
    /// An empty list is a valid outcome ("no orders yet").
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            id: OrderId,
            created_at: DateTime<Utc>,
            total_cents: i64,
            total_qty: i64,
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT o.id, o.created_at, o.total_cents,
                    COALESCE(SUM(i.quantity), 0) AS total_qty
             FROM orders o
             LEFT JOIN order_items i ON i.order_id = o.id
             WHERE o.user_id = ?
             GROUP BY o.id, o.created_at, o.total_cents
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| OrderSummary {
                id: r.id,
                created_at: r.created_at,
                total_qty: r.total_qty,
                final_price: Price::from_cents(r.total_cents),
            })
            .collect())
    }

    /// Get one of a user's orders with its line items.
    ///
    /// Returns `None` if the order doesn't exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct OrderRow {
            id: OrderId,
            user_id: UserId,
            total_cents: i64,
            created_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, total_cents, created_at
             FROM orders WHERE id = ? AND user_id = ?",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderLineRow>(
            "SELECT product_id, product_name, unit_price_cents, quantity
             FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Order {
            id: order.id,
            user_id: order.user_id,
            created_at: order.created_at,
            final_price: Price::from_cents(order.total_cents),
            items: items.into_iter().map(OrderLine::from).collect(),
        }))
    }

    /// Create an order from a user's cart, atomically.
    ///
    /// Inside one transaction: snapshots the cart lines with their current
    /// product name and unit price, computes the total, inserts the order
    /// and its items, and deletes the cart rows.
    ///
    /// Returns `None` when the cart is empty (nothing to check out).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back and the cart is left untouched.
    pub async fn create_from_cart(
        &self,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, OrderLineRow>(
            "SELECT ci.product_id, p.name AS product_name,
                    p.price_cents AS unit_price_cents, ci.quantity
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.user_id = ?
             ORDER BY ci.id",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Ok(None);
        }

        let total_cents: i64 = lines
            .iter()
            .map(|l| l.unit_price_cents * l.quantity)
            .sum();
        let created_at = Utc::now();

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (user_id, total_cents, created_at)
             VALUES (?, ?, ?)
             RETURNING id",
        )
        .bind(user_id)
        .bind(total_cents)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, unit_price_cents, quantity)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(Order {
            id: OrderId::new(order_id),
            user_id,
            created_at,
            final_price: Price::from_cents(total_cents),
            items: lines.into_iter().map(OrderLine::from).collect(),
        }))
    }
}
