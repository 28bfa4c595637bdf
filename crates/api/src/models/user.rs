//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plantsco_core::{Email, UserId};

/// The authenticated identity attached to a request.
///
/// Resolved from the bearer token by the `RequireAuth` extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Role label (e.g., "customer").
    pub role: String,
    /// Whether the user bypasses ownership checks.
    pub is_admin: bool,
}

/// A user as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub role: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    pub password: String,
}

/// Payload for `PUT /users/{userId}`.
///
/// Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_admin: Option<bool>,
}
