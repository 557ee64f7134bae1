//! Business-invariant checks shared by the aggregates.
//!
//! Arguments arrive already typed from the transport layer; these checks cover
//! the rules types cannot express (non-negative money, ordered dates, ...).

use crate::errors::{Error, Result};
use chrono::NaiveDate;

/// Currency used when neither the caller nor a parent supplies one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Trims a required name, rejecting blank input.
pub fn require_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Rejects negative, NaN and infinite amounts.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Upper-cases a three-letter currency code.
pub fn normalize_currency(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::invalid(format!(
            "Currency must be a three-letter code, got '{code}'"
        )));
    }
    Ok(code)
}

/// Requires `start <= end`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::invalid(format!(
            "End date {end} is before start date {start}"
        )));
    }
    Ok(())
}
