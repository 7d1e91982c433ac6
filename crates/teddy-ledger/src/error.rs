//! # Ledger Error Types
//!
//! The interesting type here is [`TransitionFailure`]: multi-step
//! transitions don't just fail, they fail AT a step, and the caller needs
//! to know what happened to the step that had already completed.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Anatomy of a Transition Failure                            │
//! │                                                                         │
//! │  step 1: insert destination row ──── fails ──► InsertDestination       │
//! │     │                                          (nothing to undo)       │
//! │     ▼                                                                   │
//! │  step 2: delete source row ───────── fails ──► DeleteSource            │
//! │                                                + compensation outcome: │
//! │                                                  Succeeded  (undone)   │
//! │                                                  Failed     (stuck in  │
//! │                                                              BOTH)     │
//! │                                                  NotAttempted (by      │
//! │                                                   design, duplicate    │
//! │                                                   preferred to loss)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use teddy_core::error::{CoreError, ValidationError};
use teddy_db::DbError;

// =============================================================================
// Transition Failure
// =============================================================================

/// Which step of a two-step transition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    /// Inserting the destination-ledger row.
    InsertDestination,
    /// Deleting the source-ledger row (the destination row already exists).
    DeleteSource,
}

impl std::fmt::Display for TransitionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionStep::InsertDestination => f.write_str("insert destination"),
            TransitionStep::DeleteSource => f.write_str("delete source"),
        }
    }
}

/// What happened to the compensating delete after a `DeleteSource` failure.
#[derive(Debug)]
pub enum CompensationOutcome {
    /// No compensation ran. Either the failure was at the first step
    /// (nothing to undo) or the transition defines none - the sold→in-stock
    /// reversal deliberately leaves the duplicate rather than risk deleting
    /// the only copy.
    NotAttempted,
    /// The freshly inserted destination row was removed; storage is back
    /// where it started.
    Succeeded,
    /// The compensating delete itself failed: the device now exists in BOTH
    /// ledgers and needs manual cleanup.
    Failed(DbError),
}

impl std::fmt::Display for CompensationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompensationOutcome::NotAttempted => f.write_str("not attempted"),
            CompensationOutcome::Succeeded => f.write_str("succeeded"),
            CompensationOutcome::Failed(e) => write!(f, "failed ({e})"),
        }
    }
}

/// A multi-step transition failure with full saga context.
#[derive(Debug, Error)]
#[error("{transition} failed at {step}: {source}; compensation {compensation}")]
pub struct TransitionFailure {
    /// Which transition was running (`"sell"`, `"issue_repair"`, ...).
    pub transition: &'static str,
    pub step: TransitionStep,
    #[source]
    pub source: DbError,
    pub compensation: CompensationOutcome,
}

impl TransitionFailure {
    /// True when storage was left inconsistent (the device is in both
    /// ledgers, or in neither).
    pub fn left_inconsistent(&self) -> bool {
        matches!(
            (self.step, &self.compensation),
            (TransitionStep::DeleteSource, CompensationOutcome::Failed(_))
                | (TransitionStep::DeleteSource, CompensationOutcome::NotAttempted)
        )
    }
}

// =============================================================================
// Ledger Error
// =============================================================================

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input refused before anything touched storage.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A domain rule refused the operation (completed audit, bad index).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A multi-step transition failed partway; see the saga context.
    #[error(transparent)]
    Transition(#[from] TransitionFailure),

    /// A single-step read or write failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_carries_saga_context() {
        let failure = TransitionFailure {
            transition: "sell",
            step: TransitionStep::DeleteSource,
            source: DbError::QueryFailed("disk I/O error".into()),
            compensation: CompensationOutcome::Succeeded,
        };

        let msg = failure.to_string();
        assert!(msg.contains("sell"));
        assert!(msg.contains("delete source"));
        assert!(msg.contains("compensation succeeded"));
    }

    #[test]
    fn test_inconsistency_classification() {
        let clean = TransitionFailure {
            transition: "sell",
            step: TransitionStep::DeleteSource,
            source: DbError::QueryFailed("x".into()),
            compensation: CompensationOutcome::Succeeded,
        };
        assert!(!clean.left_inconsistent());

        let stuck = TransitionFailure {
            transition: "sell",
            step: TransitionStep::DeleteSource,
            source: DbError::QueryFailed("x".into()),
            compensation: CompensationOutcome::Failed(DbError::QueryFailed("y".into())),
        };
        assert!(stuck.left_inconsistent());

        let duplicate = TransitionFailure {
            transition: "return_from_sold",
            step: TransitionStep::DeleteSource,
            source: DbError::QueryFailed("x".into()),
            compensation: CompensationOutcome::NotAttempted,
        };
        assert!(duplicate.left_inconsistent());

        let nothing_happened = TransitionFailure {
            transition: "issue_repair",
            step: TransitionStep::InsertDestination,
            source: DbError::QueryFailed("x".into()),
            compensation: CompensationOutcome::NotAttempted,
        };
        assert!(!nothing_happened.left_inconsistent());
    }
}
