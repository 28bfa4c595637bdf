//! Cart repository.
//!
//! Every operation here is scoped to a single (user, product) key; no call
//! can touch another user's cart. Concurrent quantity updates to the same
//! row resolve as last-write-wins.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use plantsco_core::{CartItemId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{CartItem, CartLine};
use crate::models::product::Product;

const CART_COLUMNS: &str = "id, user_id, product_id, quantity, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    user_id: UserId,
    product_id: ProductId,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn map_foreign_key_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::NotFound;
    }
    RepositoryError::Database(e)
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user's cart joined with product details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored tags are invalid.
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CartLineRow {
            id: ProductId,
            name: String,
            price_cents: i64,
            quantity: i64,
            image_url: String,
            tags: String,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            cart_quantity: i64,
        }

        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT p.id, p.name, p.price_cents, p.quantity, p.image_url, p.tags,
                    p.created_at, p.updated_at, ci.quantity AS cart_quantity
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.user_id = ?
             ORDER BY ci.id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for r in rows {
            let tags: Vec<String> = serde_json::from_str(&r.tags).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid product tags in database: {e}"))
            })?;

            lines.push(CartLine {
                product: Product {
                    id: r.id,
                    name: r.name,
                    price: Price::from_cents(r.price_cents),
                    quantity: r.quantity,
                    image_url: r.image_url,
                    tags,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                },
                quantity: r.cart_quantity,
            });
        }

        Ok(lines)
    }

    /// Add a product to a user's cart.
    ///
    /// Inserts a new row, or adds to the quantity when the (user, product)
    /// pair already has one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartItem, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, CartItemRow>(&format!(
            "INSERT INTO cart_items (user_id, product_id, quantity, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + excluded.quantity,
                           updated_at = excluded.updated_at
             RETURNING {CART_COLUMNS}"
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(map_foreign_key_violation)?;

        Ok(row.into())
    }

    /// Set the quantity of an existing cart item in place.
    ///
    /// Returns `None` if the (user, product) pair has no cart row; nothing
    /// is created implicitly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(&format!(
            "UPDATE cart_items SET quantity = ?, updated_at = ?
             WHERE user_id = ? AND product_id = ?
             RETURNING {CART_COLUMNS}"
        ))
        .bind(quantity)
        .bind(Utc::now())
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CartItem::from))
    }

    /// Remove a product from a user's cart, returning the removed row.
    ///
    /// Returns `None` if the (user, product) pair has no cart row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(&format!(
            "DELETE FROM cart_items
             WHERE user_id = ? AND product_id = ?
             RETURNING {CART_COLUMNS}"
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CartItem::from))
    }
}
