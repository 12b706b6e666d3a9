//! Input checks shared by the record writers.
//!
//! Dates are normalized here, at the boundary, so every stored date is a UTC
//! date-time regardless of whether the client sent `2024-01-01` or a full
//! RFC 3339 timestamp.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses a client-supplied date into a UTC date-time.
///
/// Accepted forms: RFC 3339 (`2024-01-01T10:00:00Z`, with any offset), a naive
/// date-time (`2024-01-01T10:00:00`, read as UTC) and a plain date
/// (`2024-01-01`, read as midnight UTC).
pub fn parse_date(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| Error::validation(format!("{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp")))
}

/// Trims `value` and rejects it when empty.
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Like [`require_text`] for optional query parameters.
pub fn require_param(field: &str, value: Option<&str>) -> Result<String> {
    require_text(field, value.unwrap_or_default())
}

/// Amounts must be finite and strictly positive.
pub fn require_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Empty or whitespace-only optional text is stored as `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
