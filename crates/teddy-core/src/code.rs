//! # Shop Code Module
//!
//! The human-assigned inventory identifier, canonically `TDY-####`.
//!
//! Staff enter codes in whatever shape is fastest at the counter - `1234`,
//! `tdy1234`, `TDY-1234` - and every entry point normalizes to the canonical
//! form before lookups, so the same device always resolves to one code.
//!
//! ## Normalization Rules
//! ```text
//! "1234"      → TDY-1234     (bare digits)
//! "42"        → TDY-0042     (zero-padded to 4)
//! "987654321" → TDY-4321     (long digit runs keep their last 4)
//! "tdy1234"   → TDY-1234     (prefix without dash)
//! "TDY-1234"  → TDY-1234     (already canonical)
//! "coffee"    → error        (not a code)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::SHOP_CODE_PREFIX;

/// A canonical shop inventory code in `TDY-####` form.
///
/// Construct via [`ShopCode::parse`] so the invariant holds; the inner
/// string is never exposed mutably.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct ShopCode(String);

impl ShopCode {
    /// Parses and normalizes a raw user entry into a canonical code.
    ///
    /// ## Example
    /// ```rust
    /// use teddy_core::code::ShopCode;
    ///
    /// assert_eq!(ShopCode::parse("1234").unwrap().as_str(), "TDY-1234");
    /// assert_eq!(ShopCode::parse("42").unwrap().as_str(), "TDY-0042");
    /// assert!(ShopCode::parse("not-a-code").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let raw = input.trim().to_ascii_uppercase();

        if raw.is_empty() {
            return Err(ValidationError::Required { field: "code" });
        }

        // Strip an optional TDY prefix (with or without the dash)
        let digits = match raw.strip_prefix(SHOP_CODE_PREFIX) {
            Some(rest) => rest.trim_start_matches('-'),
            None => raw.as_str(),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "code",
                reason: format!("expected TDY-#### style, got '{}'", input.trim()),
            });
        }

        // Keep the last 4 digits of long entries, zero-pad short ones
        let tail = if digits.len() > 4 {
            digits[digits.len() - 4..].to_string()
        } else {
            format!("{:0>4}", digits)
        };

        Ok(ShopCode(format!("{}-{}", SHOP_CODE_PREFIX, tail)))
    }

    /// The canonical `TDY-####` string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 4-digit portion without the prefix (for display in compact lists).
    #[inline]
    pub fn digits(&self) -> &str {
        &self.0[SHOP_CODE_PREFIX.len() + 1..]
    }
}

impl fmt::Display for ShopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShopCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_digits() {
        assert_eq!(ShopCode::parse("1234").unwrap().as_str(), "TDY-1234");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(ShopCode::parse("42").unwrap().as_str(), "TDY-0042");
        assert_eq!(ShopCode::parse("7").unwrap().as_str(), "TDY-0007");
    }

    #[test]
    fn test_long_digit_runs_keep_last_four() {
        assert_eq!(ShopCode::parse("987654321").unwrap().as_str(), "TDY-4321");
    }

    #[test]
    fn test_prefixed_forms() {
        assert_eq!(ShopCode::parse("TDY-1234").unwrap().as_str(), "TDY-1234");
        assert_eq!(ShopCode::parse("tdy1234").unwrap().as_str(), "TDY-1234");
        assert_eq!(ShopCode::parse("TDY34").unwrap().as_str(), "TDY-0034");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(ShopCode::parse("").is_err());
        assert!(ShopCode::parse("   ").is_err());
        assert!(ShopCode::parse("coffee").is_err());
        assert!(ShopCode::parse("TDY-12AB").is_err());
    }

    #[test]
    fn test_digits_accessor() {
        assert_eq!(ShopCode::parse("5678").unwrap().digits(), "5678");
    }
}
