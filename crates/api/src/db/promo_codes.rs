//! Promo code repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use plantsco_core::PromoCodeId;

use super::RepositoryError;
use crate::models::promo_code::PromoCode;

#[derive(sqlx::FromRow)]
struct PromoCodeRow {
    id: PromoCodeId,
    code: String,
    percent_off: i64,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<PromoCodeRow> for PromoCode {
    fn from(row: PromoCodeRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            percent_off: row.percent_off,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Repository for promo code database operations.
pub struct PromoCodeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PromoCodeRepository<'a> {
    /// Create a new promo code repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get all promo codes for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<PromoCode>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromoCodeRow>(
            "SELECT id, code, percent_off, active, created_at FROM promo_codes ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PromoCode::from).collect())
    }

    /// Add a promo code (used by seeding).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, code: &str, percent_off: i64) -> Result<PromoCode, RepositoryError> {
        let row = sqlx::query_as::<_, PromoCodeRow>(
            "INSERT INTO promo_codes (code, percent_off, active, created_at)
             VALUES (?, ?, 1, ?)
             RETURNING id, code, percent_off, active, created_at",
        )
        .bind(code)
        .bind(percent_off)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("promo code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }
}
