//! Promo code domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use plantsco_core::PromoCodeId;

/// A promotional discount code (admin dashboard listing).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub id: PromoCodeId,
    pub code: String,
    pub percent_off: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
