//! Authentication extractors.
//!
//! Provides extractors for requiring a valid bearer token in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::models::user::CurrentUser;
use crate::services::{access, auth::AuthService};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Resolves the token against the store and yields the authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let user = AuthService::new(state.pool()).authenticate(token).await?;

        Ok(Self(user))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Like [`RequireAuth`] but additionally applies the admin gate, rejecting
/// non-admin users with an access-denied error.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        access::can_administer(&user).require()?;
        Ok(Self(user))
    }
}

/// Extractor for the raw bearer token (used by logout).
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(parts)
            .map(|t| Self(t.to_string()))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
