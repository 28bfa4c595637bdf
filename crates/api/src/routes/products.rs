//! Public catalog route handlers.
//!
//! The SPA's catalog and product-detail pages read these without a token.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use plantsco_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::state::AppState;

/// List the catalog.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// Get one product.
#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn show(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

    Ok(Json(product))
}
