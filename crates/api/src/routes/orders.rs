//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use plantsco_core::{OrderId, UserId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::order::OrderSummary;
use crate::services::access;
use crate::state::AppState;

/// Get a user's order history, newest first, if self or admin.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<OrderSummary>>> {
    access::can_access(&requester, user_id).require()?;

    let orders = OrderRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(orders))
}

/// Get one order with its line items, if self or admin.
#[instrument(skip_all, fields(user_id = %user_id, order_id = %order_id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path((user_id, order_id)): Path<(UserId, OrderId)>,
) -> Result<impl IntoResponse> {
    access::can_access(&requester, user_id).require()?;

    let order = OrderRepository::new(state.pool())
        .get_for_user(user_id, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    Ok(Json(order))
}

/// Check out: atomically turn the cart into an order and empty the cart.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse> {
    access::can_access(&requester, user_id).require()?;

    let order = OrderRepository::new(state.pool())
        .create_from_cart(user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Cart is empty".to_string()))?;

    Ok((StatusCode::CREATED, Json(order)))
}
