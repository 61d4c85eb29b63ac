//! Identifier and phone normalization.
//!
//! Both functions are total: malformed input degrades to a sentinel or
//! passes through, never an error. Field-level noise must not interrupt
//! the pipeline.

use crate::model::Mode;

/// Placeholder for "no valid phone". Distinguishable from a genuine empty
/// cell and survives the merge like any other value.
pub const PHONE_SENTINEL: &str = "0";

/// Canonicalize a CPF: strip non-digits, left-pad with zeros to 11.
///
/// Input with no digits at all (including the empty/missing cell) passes
/// through unchanged — callers treat such identifiers as unmatchable.
pub fn normalize_cpf(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return raw.to_string();
    }
    format!("{digits:0>11}")
}

/// Canonicalize and validate a phone number.
///
/// Accepts 11 digits, or 13 digits with the "55" country code; Outbound
/// mode strips the country code, App mode keeps it. Everything else yields
/// the sentinel. The trailing ".0" artifact of float-coerced numbers is
/// removed before digit stripping so its zero does not join the number.
pub fn validate_phone(raw: &str, mode: Mode) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 => digits,
        13 if digits.starts_with("55") => match mode {
            Mode::Outbound => digits[2..].to_string(),
            Mode::App => digits,
        },
        _ => PHONE_SENTINEL.to_string(),
    }
}
