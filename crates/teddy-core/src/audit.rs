//! # Stock Audit Session
//!
//! A bounded verification pass reconciling physical presence against the
//! recorded in-stock set.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Audit Session Lifecycle                            │
//! │                                                                         │
//! │   start ──► InProgress ──────────► Completed (read-only)               │
//! │               │    ▲                                                    │
//! │               ▼    │                                                    │
//! │            verify(entry)                                                │
//! │               │                                                         │
//! │               ├── in snapshot, not yet seen → Verified (appended)      │
//! │               ├── already seen              → AlreadyVerified (no-op)  │
//! │               └── not in snapshot           → NotFound (no-op)         │
//! │                                                                         │
//! │   complete: missing = snapshot − verified, lists freeze                │
//! │                                                                         │
//! │   Invariants while InProgress:                                          │
//! │     verified ⊆ snapshot, no duplicates                                 │
//! │   After completion:                                                     │
//! │     verified ∪ missing == snapshot, verified ∩ missing == ∅           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session itself is pure state. Resolving a scanned IMEI to a shop code
//! needs a stock lookup and lives in the ledger crate's audit runner; by the
//! time input reaches [`AuditSession::verify`] it is a canonical code.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::code::ShopCode;
use crate::error::{CoreError, ValidationError};
use crate::types::{CheckStatus, StockCheck};

// =============================================================================
// Audit Query Normalization
// =============================================================================

/// A normalized scan/entry during an audit.
///
/// Staff scan IMEI barcodes or type shop codes interchangeably; a 14-15
/// digit numeric string is an IMEI, anything else goes through shop-code
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditQuery {
    /// Look the device up by IMEI.
    Imei(String),
    /// Look the device up by canonical shop code.
    Code(ShopCode),
}

impl AuditQuery {
    /// Normalizes a raw scan/entry.
    ///
    /// ## Example
    /// ```rust
    /// use teddy_core::audit::AuditQuery;
    ///
    /// assert!(matches!(AuditQuery::parse("123456789012345"), Ok(AuditQuery::Imei(_))));
    /// assert!(matches!(AuditQuery::parse("1234"), Ok(AuditQuery::Code(_))));
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ValidationError::Required { field: "entry" });
        }

        // 14-15 digits is an IMEI scan; shorter digit runs are shop codes
        if (14..=15).contains(&input.len()) && input.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(AuditQuery::Imei(input.to_string()));
        }

        Ok(AuditQuery::Code(ShopCode::parse(input)?))
    }
}

// =============================================================================
// Verify Outcome
// =============================================================================

/// The typed business outcome of one verification attempt.
///
/// Not-found and already-verified are outcomes, not errors: the session
/// stays usable and unchanged, and the caller decides what to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// The code was in the snapshot and is now marked verified.
    Verified { code: ShopCode },
    /// The code was already verified in this session; nothing changed.
    AlreadyVerified { code: ShopCode },
    /// The code is not in the session snapshot; nothing changed.
    NotFound,
}

// =============================================================================
// Audit Session
// =============================================================================

/// An in-progress stock audit.
///
/// Constructed by [`AuditSession::start`] (fresh snapshot) or
/// [`AuditSession::resume`] (reloading a persisted in-progress check).
/// Completing consumes the session and yields the frozen [`StockCheck`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSession {
    id: String,
    check_date: NaiveDate,
    checked_by: String,
    snapshot: Vec<ShopCode>,
    verified: Vec<ShopCode>,
    started_at: DateTime<Utc>,
}

impl AuditSession {
    /// Starts a session over a snapshot of the current in-stock codes.
    pub fn start(
        id: impl Into<String>,
        check_date: NaiveDate,
        checked_by: impl Into<String>,
        snapshot: Vec<ShopCode>,
        started_at: DateTime<Utc>,
    ) -> Self {
        AuditSession {
            id: id.into(),
            check_date,
            checked_by: checked_by.into(),
            snapshot,
            verified: Vec::new(),
            started_at,
        }
    }

    /// Resumes a persisted in-progress check.
    ///
    /// A completed check is read-only and refuses to resume.
    pub fn resume(check: &StockCheck) -> Result<Self, CoreError> {
        if check.status == CheckStatus::Completed {
            return Err(CoreError::AuditCompleted(check.id.clone()));
        }

        Ok(AuditSession {
            id: check.id.clone(),
            check_date: check.check_date,
            checked_by: check.checked_by.clone(),
            snapshot: check.snapshot_codes.clone(),
            verified: check.verified_codes.clone(),
            started_at: check.created_at,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn snapshot(&self) -> &[ShopCode] {
        &self.snapshot
    }

    #[inline]
    pub fn verified(&self) -> &[ShopCode] {
        &self.verified
    }

    /// Codes still unaccounted for, in snapshot order.
    pub fn outstanding(&self) -> Vec<ShopCode> {
        self.snapshot
            .iter()
            .filter(|c| !self.verified.contains(c))
            .cloned()
            .collect()
    }

    /// Attempts to verify one code against the snapshot.
    ///
    /// Idempotent for repeated codes, a no-op for unknown ones.
    pub fn verify(&mut self, code: &ShopCode) -> VerifyOutcome {
        if !self.snapshot.contains(code) {
            return VerifyOutcome::NotFound;
        }

        if self.verified.contains(code) {
            return VerifyOutcome::AlreadyVerified { code: code.clone() };
        }

        self.verified.push(code.clone());
        VerifyOutcome::Verified { code: code.clone() }
    }

    /// The persistable record of the session as it stands, still in
    /// progress. Missing codes are not computed until completion.
    pub fn checkpoint(&self) -> StockCheck {
        StockCheck {
            id: self.id.clone(),
            check_date: self.check_date,
            checked_by: self.checked_by.clone(),
            snapshot_codes: self.snapshot.clone(),
            verified_codes: self.verified.clone(),
            missing_codes: Vec::new(),
            status: CheckStatus::InProgress,
            created_at: self.started_at,
        }
    }

    /// Completes the session: computes `missing = snapshot − verified` and
    /// freezes the record.
    pub fn complete(self) -> StockCheck {
        let missing = self.outstanding();

        StockCheck {
            id: self.id,
            check_date: self.check_date,
            checked_by: self.checked_by,
            snapshot_codes: self.snapshot,
            verified_codes: self.verified,
            missing_codes: missing,
            status: CheckStatus::Completed,
            created_at: self.started_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(raw: &[&str]) -> Vec<ShopCode> {
        raw.iter().map(|c| ShopCode::parse(c).unwrap()).collect()
    }

    fn session() -> AuditSession {
        AuditSession::start(
            "chk-1",
            NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
            "user-1",
            codes(&["TDY-1234", "TDY-5678", "TDY-9012"]),
            Utc::now(),
        )
    }

    #[test]
    fn test_query_parse_imei_vs_code() {
        assert_eq!(
            AuditQuery::parse("123456789012345").unwrap(),
            AuditQuery::Imei("123456789012345".into())
        );
        assert_eq!(
            AuditQuery::parse("12345678901234").unwrap(),
            AuditQuery::Imei("12345678901234".into())
        );
        // 13 digits is not an IMEI; shop-code normalization keeps the last 4
        assert_eq!(
            AuditQuery::parse("1234567890123").unwrap(),
            AuditQuery::Code(ShopCode::parse("0123").unwrap())
        );
        assert_eq!(
            AuditQuery::parse("1234").unwrap(),
            AuditQuery::Code(ShopCode::parse("TDY-1234").unwrap())
        );
        assert!(AuditQuery::parse("").is_err());
        assert!(AuditQuery::parse("???").is_err());
    }

    #[test]
    fn test_verify_normalized_entry() {
        let mut s = session();
        // "1234" normalizes to TDY-1234 before reaching the session
        let code = match AuditQuery::parse("1234").unwrap() {
            AuditQuery::Code(c) => c,
            _ => panic!("expected code"),
        };
        assert_eq!(s.verify(&code), VerifyOutcome::Verified { code: code.clone() });
        assert_eq!(
            s.verify(&code),
            VerifyOutcome::AlreadyVerified { code: code.clone() }
        );
        assert_eq!(s.verified().len(), 1); // idempotent, no duplicate
    }

    #[test]
    fn test_verify_unknown_code_is_a_no_op() {
        let mut s = session();
        let unknown = ShopCode::parse("TDY-0001").unwrap();
        assert_eq!(s.verify(&unknown), VerifyOutcome::NotFound);
        assert!(s.verified().is_empty());
    }

    #[test]
    fn test_completion_invariants() {
        let mut s = session();
        s.verify(&ShopCode::parse("TDY-5678").unwrap());

        let check = s.complete();
        assert_eq!(check.status, CheckStatus::Completed);
        assert_eq!(check.total_items(), 3);
        assert_eq!(check.verified_items(), 1);
        assert_eq!(check.missing_items(), 2);

        // verified ∩ missing == ∅
        assert!(check
            .verified_codes
            .iter()
            .all(|c| !check.missing_codes.contains(c)));
        // verified ∪ missing == snapshot
        let mut union: Vec<_> = check
            .verified_codes
            .iter()
            .chain(check.missing_codes.iter())
            .cloned()
            .collect();
        union.sort();
        let mut snapshot = check.snapshot_codes.clone();
        snapshot.sort();
        assert_eq!(union, snapshot);
    }

    #[test]
    fn test_completed_check_cannot_resume() {
        let check = session().complete();
        assert!(matches!(
            AuditSession::resume(&check),
            Err(CoreError::AuditCompleted(_))
        ));
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let mut s = session();
        s.verify(&ShopCode::parse("TDY-1234").unwrap());

        let check = s.checkpoint();
        assert_eq!(check.status, CheckStatus::InProgress);
        assert!(check.missing_codes.is_empty());

        let mut resumed = AuditSession::resume(&check).unwrap();
        assert_eq!(
            resumed.verify(&ShopCode::parse("TDY-1234").unwrap()),
            VerifyOutcome::AlreadyVerified {
                code: ShopCode::parse("TDY-1234").unwrap()
            }
        );
    }
}
