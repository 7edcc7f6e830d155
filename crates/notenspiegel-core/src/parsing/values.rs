use crate::error::NotenspiegelError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a decimal cell written with a German decimal comma.
///
/// Handles formats like:
/// - "1,3" -> 1.3
/// - "0,65" -> 0.65
/// - "100" -> 100
/// - "27.83" -> 27.83 (already dot-separated)
///
/// Thousands separators are not supported: "1.234,5" is rejected.
pub fn parse_comma_decimal(s: &str) -> Result<Decimal, NotenspiegelError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotenspiegelError::Schema("empty numeric cell".into()));
    }
    let normalized = s.replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|e| NotenspiegelError::Schema(format!("invalid number '{}': {}", s, e)))
}

/// Parse a student count.
pub fn parse_count(s: &str) -> Result<u32, NotenspiegelError> {
    let s = s.trim();
    s.parse::<u32>()
        .map_err(|e| NotenspiegelError::Schema(format!("invalid count '{}': {}", s, e)))
}

/// Loose check used to tell data lines from prose when detecting tables.
pub fn looks_numeric(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty()
        && s.chars().any(|c| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '%' | '-' | '+'))
}
