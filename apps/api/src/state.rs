//! Shared application state handed to every handler.

use std::sync::Arc;

use teddy_db::Database;
use teddy_ledger::{AuditRunner, StockLedger};

use crate::auth::TokenService;
use crate::config::ApiConfig;

/// Shared application state.
///
/// Everything in here is cheap to clone: the database wraps a pool handle,
/// and the ledger/audit layers wrap clones of it.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ledger: StockLedger<Database>,
    pub audits: AuditRunner<Database>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            ledger: StockLedger::new(db.clone()),
            audits: AuditRunner::new(db.clone()),
            tokens: Arc::new(TokenService::new(
                config.jwt_secret.clone(),
                config.jwt_lifetime_secs,
            )),
            config: Arc::new(config),
            db,
        }
    }
}
