//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use plantsco_core::{Email, UserId};

use crate::db::{CartRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::cart::CartLine;
use crate::models::user::{NewUser, UserProfile, UserUpdate};
use crate::routes::auth::TokenResponse;
use crate::services::{access, auth};
use crate::state::AppState;

/// A user profile joined with their cart products, for `GET /users/{userId}`.
#[derive(Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserProfile,
    pub products: Vec<CartLine>,
}

/// List all users (admin only). Passwords are excluded by construction.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<UserProfile>>> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}

/// Register a new user and return their auth token.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<impl IntoResponse> {
    let (_user, token) = auth::AuthService::new(state.pool()).register(&new_user).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Get a user's profile with their cart products, if self or admin.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserDetail>> {
    access::can_access(&requester, user_id).require()?;

    let user = UserRepository::new(state.pool())
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    let products = CartRepository::new(state.pool())
        .lines_for_user(user_id)
        .await?;

    Ok(Json(UserDetail { user, products }))
}

/// Update a user's profile, if self or admin.
///
/// A non-admin cannot change their role or admin flag, even on their own
/// profile.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
    Json(changes): Json<UserUpdate>,
) -> Result<Json<UserProfile>> {
    access::can_access(&requester, user_id).require()?;
    access::permits_profile_change(&requester, &changes).require()?;

    if let Some(email) = &changes.email {
        Email::parse(email).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;
    }

    let password_hash = match &changes.password {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let updated = UserRepository::new(state.pool())
        .update(user_id, &changes, password_hash.as_deref())
        .await?;

    Ok(Json(updated))
}

/// Delete a user, if self or admin.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode> {
    access::can_access(&requester, user_id).require()?;

    let deleted = UserRepository::new(state.pool()).delete(user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("user not found".to_string()))
    }
}
