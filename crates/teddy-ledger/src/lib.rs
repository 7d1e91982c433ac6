//! # teddy-ledger: Stock Ledger Sagas + Report Settlement
//!
//! Every flow that moves a device between the in-stock, sold, and repair
//! ledgers lives here, expressed as an explicit saga: ordered steps with a
//! defined compensating action per step.
//!
//! ## The Four Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Device Lifecycle Transitions                        │
//! │                                                                         │
//! │                   sell                    issue_repair                  │
//! │      ┌────────────────────────┐   ┌────────────────────────┐           │
//! │      │                        ▼   │                        ▼           │
//! │  ┌───┴──────┐           ┌─────────┴┐                 ┌──────────┐      │
//! │  │   SOLD   │           │ IN STOCK │                 │ IN REPAIR│      │
//! │  └───┬──────┘           └─────────┬┘                 └──────────┘      │
//! │      │                        ▲   │                        │           │
//! │      └────────────────────────┘   └────────────────────────┘           │
//! │         return_from_sold              receive_repair                   │
//! │                                                                         │
//! │  Each transition = insert destination row, delete source row.          │
//! │  NOT transactional: the two statements are independent network-        │
//! │  visible steps, and a defined compensating delete runs when the       │
//! │  second step fails (except return_from_sold - see transitions.rs).    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`gateway`] - The narrow async storage contract the sagas need
//! - [`transitions`] - The four sagas and their compensation reporting
//! - [`settlement`] - Saving a profit report + moving its phones to sold
//! - [`audit`] - Running a stock check against live storage
//! - [`error`] - Ledger error types

pub mod audit;
pub mod error;
pub mod gateway;
pub mod settlement;
pub mod transitions;

#[cfg(test)]
pub(crate) mod mock;

pub use audit::AuditRunner;
pub use error::{CompensationOutcome, LedgerError, LedgerResult, TransitionFailure, TransitionStep};
pub use gateway::StockGateway;
pub use settlement::{SaveMode, SettlementSummary, SkipReason, SkippedEntry};
pub use transitions::{RepairIntake, ReturnTerms, SaleTerms, StockLedger};
