//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plantsco_core::{Price, ProductId};

/// A catalog item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Quantity on hand.
    #[serde(rename = "qty")]
    pub quantity: i64,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Descriptive tags (e.g., "low light", "pet friendly").
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
