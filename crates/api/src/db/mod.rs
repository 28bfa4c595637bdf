//! Database operations for the Plants & Co `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Accounts, roles, and password hashes
//! - `products` - The plant catalog
//! - `cart_items` - One row per (user, product) pair
//! - `orders` / `order_items` - Immutable checkout snapshots
//! - `auth_tokens` - Opaque bearer tokens
//! - `promo_codes` - Read-only admin listing
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p plantsco-cli -- migrate
//! ```

pub mod cart;
pub mod orders;
pub mod products;
pub mod promo_codes;
pub mod tokens;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use cart::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use promo_codes::PromoCodeRepository;
pub use tokens::TokenRepository;
pub use users::UserRepository;

/// Embedded migrations for the API database.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist and foreign keys
/// are enforced on every connection.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
