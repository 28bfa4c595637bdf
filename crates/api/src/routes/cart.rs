//! Cart route handlers.
//!
//! All four handlers apply the ownership guard before touching the store,
//! and every mutation is scoped to one (user, product) pair.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use plantsco_core::UserId;

use crate::db::{CartRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::{CartItem, CartItemRequest, CartLine};
use crate::services::access;
use crate::state::AppState;

/// Get cart contents, if self or admin.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<CartLine>>> {
    access::can_access(&requester, user_id).require()?;

    let lines = CartRepository::new(state.pool())
        .lines_for_user(user_id)
        .await?;

    Ok(Json(lines))
}

/// Add a product to the cart, inserting a row or adding to an existing one.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<CartItem>> {
    access::can_access(&requester, user_id).require()?;

    let quantity = request.qty.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest("qty must be at least 1".to_string()));
    }

    let item = CartRepository::new(state.pool())
        .add_item(user_id, request.product_id, quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("No such product!".to_string()),
            other => other.into(),
        })?;

    Ok(Json(item))
}

/// Set the quantity of an existing cart item.
///
/// Returns 404 when the item is not in the cart; nothing is created
/// implicitly.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<CartItem>> {
    access::can_access(&requester, user_id).require()?;

    let quantity = request
        .qty
        .ok_or_else(|| AppError::BadRequest("qty is required".to_string()))?;
    if quantity < 1 {
        return Err(AppError::BadRequest("qty must be at least 1".to_string()));
    }

    let item = CartRepository::new(state.pool())
        .set_quantity(user_id, request.product_id, quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Nothing to update!".to_string()))?;

    Ok(Json(item))
}

/// Remove a product from the cart, returning the removed row.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<CartItem>> {
    access::can_access(&requester, user_id).require()?;

    let item = CartRepository::new(state.pool())
        .remove_item(user_id, request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No product to delete!".to_string()))?;

    Ok(Json(item))
}
