//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plantsco_core::{CartItemId, ProductId, UserId};

use super::product::Product;

/// One row of the cart association table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(rename = "qty")]
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart row joined with its product, as returned by `GET /users/{id}/cart`.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product: Product,
    #[serde(rename = "qty")]
    pub quantity: i64,
}

/// Payload for cart mutations.
///
/// `qty` is required for `PUT`, defaults to 1 for `POST`, and is ignored
/// for `DELETE`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub qty: Option<i64>,
}
