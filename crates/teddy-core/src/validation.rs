//! # Validation Module
//!
//! Input validation utilities for Teddy Mobile.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API Handler (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (code, IMEI)                                   │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A validation failure refuses the operation before anything touches
//! storage; the caller surfaces the message inline and nothing is retried.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank string field, returning the trimmed value.
///
/// ## Example
/// ```rust
/// use teddy_core::validation::require;
///
/// assert_eq!(require("model", " iPhone 14 ").unwrap(), "iPhone 14");
/// assert!(require("model", "   ").is_err());
/// ```
pub fn require(field: &'static str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    Ok(value.to_string())
}

/// Validates an IMEI.
///
/// ## Rules
/// - Digits only
/// - 14 to 16 digits (15 is standard; 14 appears without the check digit,
///   16 for IMEISV as printed on some boxes)
///
/// ## Example
/// ```rust
/// use teddy_core::validation::validate_imei;
///
/// assert!(validate_imei("123456789012345").is_ok());
/// assert!(validate_imei("12345").is_err());
/// assert!(validate_imei("12345678901234A").is_err());
/// ```
pub fn validate_imei(imei: &str) -> ValidationResult<()> {
    let imei = imei.trim();

    if imei.is_empty() {
        return Err(ValidationError::Required { field: "imei" });
    }

    if !imei.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "imei",
            reason: "must contain only digits".to_string(),
        });
    }

    if !(14..=16).contains(&imei.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "imei",
            reason: format!("expected 14-16 digits, got {}", imei.len()),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an amount in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free accessories, zero-amount adjustments)
///
/// ## Example
/// ```rust
/// use teddy_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("cost", 1099).is_ok());
/// assert!(validate_amount_cents("cost", 0).is_ok());
/// assert!(validate_amount_cents("cost", -100).is_err());
/// ```
pub fn validate_amount_cents(field: &'static str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative { field });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates an inclusive date period (payslips, report range stats).
pub fn validate_period(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvertedPeriod {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require("model", "iPhone").unwrap(), "iPhone");
        assert_eq!(require("model", "  spaced  ").unwrap(), "spaced");
        assert!(require("model", "").is_err());
        assert!(require("model", "   ").is_err());
    }

    #[test]
    fn test_validate_imei() {
        assert!(validate_imei("12345678901234").is_ok()); // 14
        assert!(validate_imei("123456789012345").is_ok()); // 15
        assert!(validate_imei("1234567890123456").is_ok()); // 16
        assert!(validate_imei("1234567890123").is_err()); // 13
        assert!(validate_imei("12345678901234567").is_err()); // 17
        assert!(validate_imei("").is_err());
        assert!(validate_imei("12345678901234x").is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents("amount", 0).is_ok());
        assert!(validate_amount_cents("amount", 500).is_ok());
        assert!(validate_amount_cents("amount", -1).is_err());
    }

    #[test]
    fn test_validate_period() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        assert!(validate_period(jan, feb).is_ok());
        assert!(validate_period(jan, jan).is_ok());
        assert!(validate_period(feb, jan).is_err());
    }
}
