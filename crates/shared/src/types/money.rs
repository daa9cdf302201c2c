//! Amount handling with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//!
//! Amount fields arrive from forms and peers as numbers, numeric strings or
//! blank strings. They are held as `Option<Decimal>`: anything that does not
//! parse is "unset", and every computation reads unset as zero.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

/// Parses user-entered text into a decimal.
///
/// Blank or non-numeric input yields `None`.
#[must_use]
pub fn parse_lenient(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parses user-entered text into a whole quantity.
///
/// Accepts "3" and "3.0"; rejects fractions, negatives and non-numeric text.
#[must_use]
pub fn parse_quantity(input: &str) -> Option<u32> {
    let value = parse_lenient(input)?;
    if !value.fract().is_zero() {
        return None;
    }
    value.to_u32()
}

/// Reads an optional amount, treating unset as zero.
#[must_use]
pub fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Adds amounts, clamping at `Decimal::MAX` / `Decimal::MIN` instead of
/// overflowing.
#[must_use]
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Adds amounts, returning `None` if the sum does not fit in a `Decimal`.
#[must_use]
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Formats an amount for display with exactly two decimal places.
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// Serde adapter for `Option<Decimal>` fields fed by form input.
///
/// Deserializes numbers, numeric strings, blanks and nulls; serializes as a
/// string so no precision is lost on the wire.
pub mod lenient_decimal {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    /// Serializes the amount as a decimal string, or null when unset.
    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(amount) => serializer.serialize_str(&amount.to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes any JSON scalar, mapping unparseable input to `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) => super::parse_lenient(&s),
            Some(Value::Number(n)) => super::parse_lenient(&n.to_string()),
            _ => None,
        })
    }
}

/// Serde adapter for `Option<u32>` quantity fields fed by form input.
pub mod lenient_quantity {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    /// Serializes the quantity as a number, or null when unset.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(q) => serializer.serialize_u32(*q),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes any JSON scalar, mapping unparseable input to `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(s)) => super::parse_quantity(&s),
            Some(Value::Number(n)) => super::parse_quantity(&n.to_string()),
            _ => None,
        })
    }
}
