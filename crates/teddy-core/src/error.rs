//! # Error Types
//!
//! Domain-specific error types for teddy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  teddy-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  teddy-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  teddy-ledger errors (separate crate)                                  │
//! │  └── LedgerError      - Multi-step transition failures                 │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError → Frontend │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, IMEI, etc.)
//! 3. Errors are enum variants, never String
//! 4. "Not found" lookups are NOT errors in this crate - they are typed
//!    business outcomes (see [`crate::audit::VerifyOutcome`])

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An index into a worksheet entry list does not exist.
    ///
    /// ## When This Occurs
    /// - Editing or deleting a sale line that was already removed
    /// - A stale edit index after the list was mutated
    #[error("No {kind} entry at index {index}")]
    EntryNotFound { kind: &'static str, index: usize },

    /// Attempted to remove a system-computed ledger line.
    ///
    /// Only manually added adjustment lines may be deleted; the computed
    /// subset is regenerated from the sale lines on every change.
    #[error("Ledger line {index} is system-computed and cannot be removed")]
    ComputedLineImmutable { index: usize },

    /// Operation attempted on a completed audit session.
    ///
    /// A completed session is frozen: its verified/missing lists are only
    /// used for reporting and export.
    #[error("Stock check {0} is completed and read-only")]
    AuditCompleted(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs - the operation is
/// refused and never attempted against storage.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    /// Invalid format (e.g., malformed shop code or IMEI).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: String,
    },

    /// Period start is after period end.
    #[error("period start {start} is after end {end}")]
    InvertedPeriod { start: String, end: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::EntryNotFound {
            kind: "phone",
            index: 3,
        };
        assert_eq!(err.to_string(), "No phone entry at index 3");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required { field: "model" };
        assert_eq!(err.to_string(), "model is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "imei" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
