//! Tolerant cell-text normalizers.
//!
//! The source table mixes well-formed and occasionally malformed cells, so
//! every function here degrades to a default or to the original text instead
//! of erroring. A single bad cell must not lose the whole row.

use chrono::NaiveDate;

/// Parses a numeric cell, stripping thousands separators and whitespace.
/// Returns `0.0` on anything that is not a decimal number.
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != ',' && *c != ' ').collect();
    finite_or_zero(cleaned.trim().parse())
}

// Overflowing literals like "1e999" parse to infinity; clamp those to the
// same fallback as unparseable text.
fn finite_or_zero(parsed: Result<f64, std::num::ParseFloatError>) -> f64 {
    match parsed {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parses a percentage cell, stripping the `%` sign and whitespace.
/// An empty cell or a lone `-` placeholder reads as `0.0`, as does any
/// other unparseable text.
pub fn parse_percentage(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '%' && *c != ' ')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" {
        return 0.0;
    }
    finite_or_zero(cleaned.parse())
}

/// Normalizes a `"Mon/Day"` cell (e.g. `"Nov/28"`) to `"YYYY/MM/DD"` using
/// the caller-supplied reference year.
///
/// Returns the original text unchanged when the cell does not split into
/// exactly two `/`-separated parts or the month abbreviation is
/// unrecognized; callers must tolerate a non-normalized date downstream.
///
/// The source cell carries no year, so rows quoted near a year boundary can
/// resolve to the wrong year when the reference year does not match the
/// quote's actual year.
pub fn parse_date(text: &str, reference_year: i32) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.len() != 2 {
        return text.to_string();
    }

    match NaiveDate::parse_from_str(
        &format!("{} {} {}", parts[0], parts[1], reference_year),
        "%b %d %Y",
    ) {
        Ok(date) => date.format("%Y/%m/%d").to_string(),
        Err(_) => text.to_string(),
    }
}
