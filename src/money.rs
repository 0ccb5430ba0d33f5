//! Dollar amounts with exactly 2 decimal places.
//!
//! ACH records carry amounts as integer cents. `Money` is the human-facing
//! side of that: it parses "1000.00" style strings from CSV and command-line
//! input and formats cents back into dollars for reports. Fractions of a cent
//! are rejected rather than rounded.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A dollar amount that maintains exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use nacha_merge::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// assert_eq!(amount.to_cents(), Some(1050));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Creates a `Money` value from an integer number of cents.
    pub fn from_cents(cents: u64) -> Self {
        Money(Decimal::from_i128_with_scale(i128::from(cents), Self::SCALE))
    }

    /// Converts to integer cents.
    ///
    /// Returns `None` for negative amounts or values that do not fit in `u64`.
    pub fn to_cents(&self) -> Option<u64> {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            return None;
        }
        (self.0 * Decimal::ONE_HUNDRED).trunc().to_u64()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut decimal = Decimal::from_str(s.trim())?;
        if decimal.normalize().scale() > Self::SCALE {
            return Err(rust_decimal::Error::ErrorString(format!(
                "{} has fractions of a cent",
                s.trim()
            )));
        }
        decimal.rescale(Self::SCALE);
        Ok(Money(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}
