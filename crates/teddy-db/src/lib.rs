//! # teddy-db: Database Layer for Teddy Mobile
//!
//! This crate provides database access for the Teddy Mobile inventory
//! system. It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Teddy Mobile Data Flow                             │
//! │                                                                         │
//! │  API Handler (save_report, issue_repair, ...)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     teddy-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (stock.rs,   │    │  (embedded)  │  │   │
//! │  │   │               │    │   report.rs,  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│   check.rs,   │    │ 001_init.sql │  │   │
//! │  │   │ Management    │    │   ...)        │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (./teddy.db, WAL mode)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (one per table)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use teddy_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./teddy.db")).await?;
//! let items = db.stocks().list(&StockListQuery::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::check::StockCheckRepository;
pub use repository::payment::KelanPaymentRepository;
pub use repository::preference::{Preference, PreferenceRepository};
pub use repository::repair::RepairRepository;
pub use repository::report::ProfitReportRepository;
pub use repository::sold::SoldStockRepository;
pub use repository::stock::{StockListQuery, StockRepository, StockSort};
pub use repository::user::UserRepository;
