//! # Audit Runner
//!
//! Drives a stock check against live storage: the pure session state
//! machine lives in `teddy_core::audit`, and this runner feeds it
//! normalized entries, resolves IMEI scans to shop codes, stamps verified
//! items, and checkpoints progress after every scan so a session survives
//! a page reload.

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use teddy_core::audit::{AuditQuery, AuditSession, VerifyOutcome};
use teddy_core::StockCheck;

use crate::error::LedgerResult;
use crate::gateway::StockGateway;

/// Runs stock check sessions over a [`StockGateway`].
#[derive(Debug, Clone)]
pub struct AuditRunner<G> {
    gateway: G,
}

impl<G: StockGateway> AuditRunner<G> {
    pub fn new(gateway: G) -> Self {
        AuditRunner { gateway }
    }

    /// Starts a session: snapshots the current in-stock codes and persists
    /// the in-progress record.
    pub async fn start(&self, check_date: NaiveDate, checked_by: &str) -> LedgerResult<StockCheck> {
        let snapshot = self.gateway.in_stock_codes().await?;

        let session = AuditSession::start(
            Uuid::new_v4().to_string(),
            check_date,
            checked_by,
            snapshot,
            Utc::now(),
        );

        let check = session.checkpoint();
        self.gateway.insert_check(&check).await?;

        info!(id = %check.id, items = check.total_items(), "Stock check started");
        Ok(check)
    }

    /// Verifies one raw scan/entry against an in-progress check.
    ///
    /// The entry is normalized first: a 14-15 digit number is resolved to a
    /// code via an IMEI lookup, anything else goes through shop-code
    /// normalization. On a successful verification the matched item's
    /// last-checked timestamp is stamped and the session is checkpointed;
    /// not-found and already-verified leave everything unchanged.
    pub async fn verify(
        &self,
        check: &StockCheck,
        raw_entry: &str,
    ) -> LedgerResult<(StockCheck, VerifyOutcome)> {
        let mut session = AuditSession::resume(check)?;

        let code = match AuditQuery::parse(raw_entry)? {
            AuditQuery::Code(code) => code,
            AuditQuery::Imei(imei) => match self.gateway.find_stock_by_imei(&imei).await? {
                Some(item) => item.code,
                None => return Ok((check.clone(), VerifyOutcome::NotFound)),
            },
        };

        let outcome = session.verify(&code);

        if let VerifyOutcome::Verified { code } = &outcome {
            // Stamp the item as seen. The row can legitimately be gone if
            // it was sold mid-audit; the verification still counts.
            if let Some(item) = self.gateway.find_stock_by_code(code).await? {
                self.gateway.touch_last_checked(&item.id, Utc::now()).await?;
            }

            let checkpoint = session.checkpoint();
            self.gateway.update_check_progress(&checkpoint).await?;

            info!(
                id = %checkpoint.id,
                code = %code,
                verified = checkpoint.verified_items(),
                total = checkpoint.total_items(),
                "Item verified"
            );
        }

        Ok((session.checkpoint(), outcome))
    }

    /// Completes an in-progress check: computes the missing set, freezes
    /// the record, and persists it.
    pub async fn complete(&self, check: &StockCheck) -> LedgerResult<StockCheck> {
        let session = AuditSession::resume(check)?;
        let done = session.complete();

        self.gateway.complete_check(&done).await?;

        info!(
            id = %done.id,
            verified = done.verified_items(),
            missing = done.missing_items(),
            "Stock check completed"
        );
        Ok(done)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::mock::fixtures::stock_item;
    use crate::mock::MockGateway;
    use teddy_core::{CheckStatus, CoreError, ShopCode};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 20).unwrap()
    }

    fn runner_with_three_items() -> AuditRunner<MockGateway> {
        AuditRunner::new(
            MockGateway::new()
                .with_stock(stock_item("1234", "123456789012345"))
                .with_stock(stock_item("5678", "490154203237518"))
                .with_stock(stock_item("9012", "356938035643809")),
        )
    }

    #[tokio::test]
    async fn test_start_snapshots_in_stock_codes() {
        let runner = runner_with_three_items();
        let check = runner.start(date(), "user-1").await.unwrap();

        assert_eq!(check.total_items(), 3);
        assert_eq!(check.status, CheckStatus::InProgress);
        assert_eq!(runner.gateway.saved_checks().len(), 1);
    }

    #[tokio::test]
    async fn test_verify_by_code_normalizes_and_is_idempotent() {
        let runner = runner_with_three_items();
        let check = runner.start(date(), "user-1").await.unwrap();

        // Bare digits normalize to TDY-1234
        let (check, outcome) = runner.verify(&check, "1234").await.unwrap();
        assert_eq!(
            outcome,
            VerifyOutcome::Verified { code: ShopCode::parse("TDY-1234").unwrap() }
        );
        assert_eq!(check.verified_items(), 1);

        // Second scan of the same code: reported, not duplicated
        let (check, outcome) = runner.verify(&check, "1234").await.unwrap();
        assert_eq!(
            outcome,
            VerifyOutcome::AlreadyVerified { code: ShopCode::parse("TDY-1234").unwrap() }
        );
        assert_eq!(check.verified_items(), 1);

        // The item got its last-checked stamp
        let stocks = runner.gateway.stocks();
        let item = stocks.iter().find(|s| s.code.as_str() == "TDY-1234").unwrap();
        assert!(item.last_checked_at.is_some());
    }

    #[tokio::test]
    async fn test_verify_by_imei_resolves_to_code() {
        let runner = runner_with_three_items();
        let check = runner.start(date(), "user-1").await.unwrap();

        let (check, outcome) = runner.verify(&check, "490154203237518").await.unwrap();
        assert_eq!(
            outcome,
            VerifyOutcome::Verified { code: ShopCode::parse("TDY-5678").unwrap() }
        );
        assert_eq!(check.verified_items(), 1);
    }

    #[tokio::test]
    async fn test_verify_unknown_entries_leave_state_unchanged() {
        let runner = runner_with_three_items();
        let check = runner.start(date(), "user-1").await.unwrap();

        // Unknown IMEI
        let (check, outcome) = runner.verify(&check, "999999999999999").await.unwrap();
        assert_eq!(outcome, VerifyOutcome::NotFound);

        // Code not in the snapshot
        let (check, outcome) = runner.verify(&check, "0042").await.unwrap();
        assert_eq!(outcome, VerifyOutcome::NotFound);
        assert_eq!(check.verified_items(), 0);

        // Garbage is a validation error, not a state change
        assert!(matches!(
            runner.verify(&check, "???").await.unwrap_err(),
            LedgerError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_complete_freezes_missing_set() {
        let runner = runner_with_three_items();
        let check = runner.start(date(), "user-1").await.unwrap();

        let (check, _) = runner.verify(&check, "1234").await.unwrap();
        let (check, _) = runner.verify(&check, "9012").await.unwrap();

        let done = runner.complete(&check).await.unwrap();
        assert_eq!(done.status, CheckStatus::Completed);
        assert_eq!(done.verified_items(), 2);
        assert_eq!(done.missing_codes, vec![ShopCode::parse("TDY-5678").unwrap()]);

        // The persisted record matches
        let saved = runner.gateway.saved_checks();
        assert_eq!(saved[0].status, CheckStatus::Completed);
        assert_eq!(saved[0].missing_codes, done.missing_codes);

        // A completed check refuses further verification
        assert!(matches!(
            runner.verify(&done, "5678").await.unwrap_err(),
            LedgerError::Core(CoreError::AuditCompleted(_))
        ));
    }
}
