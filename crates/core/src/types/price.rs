//! Type-safe price representation.
//!
//! Prices are stored as an integer count of cents and surfaced as
//! `rust_decimal::Decimal` on the wire, so arithmetic never touches floats.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
    /// More precision than whole cents.
    #[error("price cannot have sub-cent precision")]
    SubCentPrecision,
    /// The amount does not fit in an i64 cent count.
    #[error("price out of range")]
    OutOfRange,
}

/// A non-negative USD price, held as whole cents.
///
/// ## Examples
///
/// ```
/// use plantsco_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::from_cents(1299);
/// assert_eq!(price.amount(), Decimal::new(1299, 2));
/// assert_eq!(price.to_string(), "$12.99");
///
/// assert!(Price::parse(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from a cent count.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The cent count.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount in dollars, as a decimal with two fractional digits.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Parse a decimal dollar amount into a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative amounts,
    /// [`PriceError::SubCentPrecision`] for amounts finer than one cent, and
    /// [`PriceError::OutOfRange`] for amounts that overflow an i64 cent count.
    pub fn parse(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PriceError::OutOfRange)?;
        if cents.fract() != Decimal::ZERO {
            return Err(PriceError::SubCentPrecision);
        }

        cents
            .to_i64()
            .map(Self)
            .ok_or(PriceError::OutOfRange)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.amount())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.amount(), serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::parse(amount).map_err(serde::de::Error::custom)
    }
}
