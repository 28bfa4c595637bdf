//! Auth token repository.
//!
//! Tokens are opaque strings mapping to one user each; revocation is a
//! plain row delete.

use chrono::Utc;
use sqlx::SqlitePool;

use plantsco_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::CurrentUser;

/// Repository for auth token database operations.
pub struct TokenRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a freshly minted token for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, user_id: UserId, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO auth_tokens (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(Utc::now())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Resolve a token to its user.
    ///
    /// Returns `None` for unknown or revoked tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn find_user(&self, token: &str) -> Result<Option<CurrentUser>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct TokenUserRow {
            id: UserId,
            email: String,
            role: String,
            is_admin: bool,
        }

        let row = sqlx::query_as::<_, TokenUserRow>(
            "SELECT u.id, u.email, u.role, u.is_admin
             FROM auth_tokens t
             JOIN users u ON u.id = t.user_id
             WHERE t.token = ?",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let email = Email::parse(&r.email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;

                Ok(Some(CurrentUser {
                    id: r.id,
                    email,
                    role: r.role,
                    is_admin: r.is_admin,
                }))
            }
            None => Ok(None),
        }
    }

    /// Revoke a token.
    ///
    /// # Returns
    ///
    /// Returns `true` if the token existed, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, token: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token = ?")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
