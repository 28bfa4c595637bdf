//! Auth route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{BearerToken, RequireAuth};
use crate::models::user::UserProfile;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token issued on registration and login.
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Login with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let (_user, token) = AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Revoke the caller's token.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode> {
    let revoked = AuthService::new(state.pool()).logout(&token).await?;
    if revoked {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Auth(AuthError::InvalidToken))
    }
}

/// Get the current user's profile.
#[instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UserProfile>> {
    let profile = UserRepository::new(state.pool())
        .get_profile(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(Json(profile))
}
