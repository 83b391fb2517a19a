//! Reusable field validators
//!
//! Each validator takes the already-coerced value and the message to report,
//! and returns `Err(message)` when the value is rejected.

use crate::core::invoice::to_minor_units;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Coerce raw form text to an exact decimal number.
///
/// Blank input coerces to zero so that a missing amount fails the positivity
/// check rather than the type check. Plain and scientific notation are
/// accepted; anything else, including `inf` and `NaN`, is rejected.
pub fn coerce_number(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Validator: text must not be empty
pub fn non_empty(value: &str, message: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Validator: number must be strictly greater than `bound`
pub fn greater_than(value: Decimal, bound: Decimal, message: &str) -> Result<(), String> {
    if value > bound {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Validator: text must be exactly one of `allowed`
pub fn one_of(value: &str, allowed: &[&str], message: &str) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Validator: a positive amount must survive scaling to minor units
///
/// Rejects amounts that round to zero and amounts that overflow `i64`.
pub fn minor_units(value: Decimal, zero: &str, overflow: &str) -> Result<(), String> {
    match to_minor_units(value) {
        None => Err(overflow.to_string()),
        Some(units) if units <= 0 => Err(zero.to_string()),
        Some(_) => Ok(()),
    }
}
