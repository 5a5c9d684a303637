//! Money amounts.
//!
//! Catalog prices arrive either as JSON numbers (`50`, `49.9`) or as display
//! strings with a leading currency sign (`"$50.00"`). Both are converted into a
//! single decimal [`Price`] when the data enters the system, so the rest of the
//! code never re-parses a price.

use core::fmt;
use core::ops::Mul;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors produced while ingesting a price.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Nothing left after stripping whitespace and the currency sign.
    #[error("price cannot be empty")]
    Empty,
    /// The remaining text is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// Prices are never negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative unit price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency sign used in customer-facing text.
    pub const SYMBOL: &'static str = "$";

    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Parse a price from text, tolerating a leading `$` and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty, not a number, or negative.
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let trimmed = raw.trim();
        let unsigned = trimmed.strip_prefix(Self::SYMBOL).unwrap_or(trimmed).trim();
        if unsigned.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(unsigned)
            .or_else(|_| Decimal::from_scientific(unsigned))
            .map_err(|_| PriceError::Invalid(raw.to_owned()))?;
        Self::new(amount)
    }

    /// The raw decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line subtotal for `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl Mul<u32> for Price {
    type Output = Decimal;

    fn mul(self, quantity: u32) -> Decimal {
        self.times(quantity)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

/// Renders the amount with exactly two decimal places and no currency sign.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.0))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Number(serde_json::Number),
            Text(String),
        }

        match RawPrice::deserialize(deserializer)? {
            RawPrice::Number(n) => Self::parse(&n.to_string()),
            RawPrice::Text(s) => Self::parse(&s),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Format a decimal amount with two decimal places, rounding half away from zero.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
