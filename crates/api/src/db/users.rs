//! User repository for database operations.
//!
//! Queries select explicit column lists and map rows into domain types;
//! the password hash is only ever read by the credential lookup.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use plantsco_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::{UserProfile, UserUpdate};

/// Columns of the `users` table that are safe to return to callers.
const PROFILE_COLUMNS: &str =
    "id, first_name, last_name, email, image_url, role, is_admin, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    image_url: String,
    role: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_profile(self) -> Result<UserProfile, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(UserProfile {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            image_url: self.image_url,
            role: self.role,
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("Email address already exists".to_owned());
    }
    RepositoryError::Database(e)
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with the default role and a hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        first_name: &str,
        last_name: &str,
        image_url: &str,
        password_hash: &str,
    ) -> Result<UserProfile, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (first_name, last_name, email, image_url, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email.as_str())
        .bind(image_url)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.into_profile()
    }

    /// Get a user's profile by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_profile).transpose()
    }

    /// Get a user's profile and password hash by email, for login.
    ///
    /// Returns `None` if no user has this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_auth_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(UserProfile, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct AuthRow {
            id: UserId,
            first_name: String,
            last_name: String,
            email: String,
            image_url: String,
            role: String,
            is_admin: bool,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, AuthRow>(&format!(
            "SELECT {PROFILE_COLUMNS}, password_hash FROM users WHERE email = ?"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let password_hash = r.password_hash;
        let profile = UserRow {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            image_url: r.image_url,
            role: r.role,
            is_admin: r.is_admin,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
        .into_profile()?;

        Ok(Some((profile, password_hash)))
    }

    /// Get all users, password excluded, for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any stored email is invalid.
    pub async fn list_all(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_profile).collect()
    }

    /// Update a user's profile in place; `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        changes: &UserUpdate,
        password_hash: Option<&str>,
    ) -> Result<UserProfile, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                email = COALESCE(?, email),
                image_url = COALESCE(?, image_url),
                role = COALESCE(?, role),
                is_admin = COALESCE(?, is_admin),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
             WHERE id = ?
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.image_url.as_deref())
        .bind(changes.role.as_deref())
        .bind(changes.is_admin)
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.ok_or(RepositoryError::NotFound)?.into_profile()
    }

    /// Delete a user.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
