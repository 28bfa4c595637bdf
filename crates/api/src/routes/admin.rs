//! Admin aggregation route handlers.
//!
//! Read-only listings backing the dashboard tables. The users listing lives
//! at `GET /users` (see `routes::users::index`); these cover the other two
//! dashboard views. All are gated on the admin flag, not owner-match.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::{ProductRepository, PromoCodeRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::product::Product;
use crate::models::promo_code::PromoCode;
use crate::state::AppState;

/// Full product listing for the dashboard (admin only).
#[instrument(skip_all)]
pub async fn products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// Promo code listing for the dashboard (admin only).
#[instrument(skip_all)]
pub async fn promo_codes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<PromoCode>>> {
    let codes = PromoCodeRepository::new(state.pool()).list_all().await?;
    Ok(Json(codes))
}
