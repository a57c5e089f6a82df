//! # Value Normalization Module
//!
//! ## Purpose
//! Maps raw CSV cells into the optional-value contract of the API boundary.
//! The source datasets come out of spreadsheet and dataframe tooling, so a
//! "missing" cell may be an empty string or a literal `NaN`, and numeric
//! columns routinely carry float artifacts (`5551234567.0` for a phone
//! number, `12.0` for a unit count).
//!
//! ## Input/Output Specification
//! - **Input**: One raw cell (string slice) at a time
//! - **Output**: `Option<String>` for optional fields, `Result` for required
//!   fields where absence is a data defect
//! - **Policy**: Required fields never default silently; absence or an
//!   unparseable value is a typed `Normalization` error naming the column
//!
//! All functions are pure; no side effects.

use crate::errors::{LookupError, Result};

/// Whether a raw cell carries no meaningful value.
///
/// Empty (after trimming) and the case-insensitive literal `nan` are the two
/// shapes dataframe-exported CSVs use for missing cells.
pub fn is_absent(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

/// Normalize an optional string field: absent becomes `None`, anything else
/// is kept in trimmed string form.
pub fn optional_string(raw: &str) -> Option<String> {
    if is_absent(raw) {
        None
    } else {
        Some(raw.trim().to_string())
    }
}

/// Normalize a required string field. Absence is a data defect, not a value.
pub fn required_string(raw: &str, column: &str) -> Result<String> {
    optional_string(raw).ok_or_else(|| LookupError::Normalization {
        column: column.to_string(),
        details: "required field is absent".to_string(),
    })
}

/// Normalize a phone number cell to a plain digit string.
///
/// The value is interpreted numerically, truncated to drop any fractional
/// artifact, and rendered without punctuation: `"5551234567.0"` becomes
/// `"5551234567"`. Absent cells yield `None`; a present but non-numeric cell
/// is an error.
pub fn phone(raw: &str, column: &str) -> Result<Option<String>> {
    if is_absent(raw) {
        return Ok(None);
    }
    let digits = parse_integer(raw).ok_or_else(|| LookupError::Normalization {
        column: column.to_string(),
        details: format!("'{}' is not a numeric phone value", raw.trim()),
    })?;
    Ok(Some(digits.to_string()))
}

/// Normalize a required integer field, truncating float artifacts.
///
/// Absent cells are an error: the source has no defined meaning for a missing
/// unit count, and a silent zero would be indistinguishable from real data.
pub fn integer(raw: &str, column: &str) -> Result<i64> {
    if is_absent(raw) {
        return Err(LookupError::Normalization {
            column: column.to_string(),
            details: "required numeric field is absent".to_string(),
        });
    }
    parse_integer(raw).ok_or_else(|| LookupError::Normalization {
        column: column.to_string(),
        details: format!("'{}' is not an integer", raw.trim()),
    })
}

/// Normalize a cell from the open column set of a wide record: verbatim
/// passthrough except that absent maps to `None`.
pub fn passthrough(raw: &str) -> Option<String> {
    if is_absent(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Lenient integer parse for dataframe-shaped cells: accepts `"42"` and
/// `"42.0"`, truncating toward zero. Values that lose integer precision in
/// the float path are rejected rather than silently rounded.
pub(crate) fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    let f = trimmed.parse::<f64>().ok()?;
    if !f.is_finite() {
        return None;
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    // f64 holds integers exactly up to 2^53; beyond that the cell text no
    // longer round-trips and the value cannot be trusted.
    if truncated.abs() > (1u64 << 53) as f64 {
        return None;
    }
    Some(truncated as i64)
}
