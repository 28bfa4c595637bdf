//! Product repository for catalog operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use plantsco_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::product::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, price_cents, quantity, image_url, tags, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price_cents: i64,
    quantity: i64,
    image_url: String,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let tags: Vec<String> = serde_json::from_str(&self.tags).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product tags in database: {e}"))
        })?;

        Ok(Product {
            id: self.id,
            name: self.name,
            price: Price::from_cents(self.price_cents),
            quantity: self.quantity,
            image_url: self.image_url,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored tags are invalid.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Add a product to the catalog (used by seeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        price: Price,
        quantity: i64,
        image_url: &str,
        tags: &[String],
    ) -> Result<Product, RepositoryError> {
        let tags_json = serde_json::to_string(tags).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize tags: {e}"))
        })?;
        let now = Utc::now();

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, price_cents, quantity, image_url, tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(price.cents())
        .bind(quantity)
        .bind(image_url)
        .bind(tags_json)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        row.into_product()
    }
}
