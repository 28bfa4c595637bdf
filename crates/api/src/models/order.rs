//! Order domain types.
//!
//! Orders are immutable once created; line items freeze the product name
//! and unit price at checkout time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plantsco_core::{OrderId, Price, ProductId, UserId};

/// One row of the order-history table (`GET /users/{id}/orders`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    /// Total item quantity across the order.
    pub total_qty: i64,
    pub final_price: Price,
}

/// A full order with its line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub final_price: Price,
    pub items: Vec<OrderLine>,
}

/// One line item of an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    #[serde(rename = "qty")]
    pub quantity: i64,
}
