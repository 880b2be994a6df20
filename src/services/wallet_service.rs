//! Request handlers shared by every transport
//!
//! `import` turns user text into a stored keypair; `balance` looks the
//! keypair up and runs the aggregation. Neither formats output for display.

use crate::error::{BalanceError, ImportError};
use crate::services::balance::{BalanceAggregator, BalanceReport, EndpointSet};
use crate::services::cancel::CancelSignal;
use crate::services::metrics::Metrics;
use crate::services::session_store::SessionStore;
use crate::types::UserId;
use crate::wallet::{KeyDeriver, SecretParser};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub address: String,
    /// A previous wallet for this user was replaced
    pub replaced: bool,
}

/// Result of a balance request
#[derive(Debug, Clone)]
pub struct BalanceSummary {
    pub address: String,
    pub report: BalanceReport,
}

#[derive(Clone)]
pub struct WalletService {
    sessions: SessionStore,
    endpoints: Arc<EndpointSet>,
    metrics: Metrics,
    balance_timeout: Option<Duration>,
}

impl WalletService {
    pub fn new(endpoints: EndpointSet) -> Self {
        Self {
            sessions: SessionStore::new(),
            endpoints: Arc::new(endpoints),
            metrics: Metrics::new(),
            balance_timeout: None,
        }
    }

    /// Cancel still-pending endpoint queries after `timeout`
    pub fn with_balance_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.balance_timeout = timeout;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn endpoints(&self) -> &EndpointSet {
        &self.endpoints
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Parse, derive and store a wallet for `user`.
    ///
    /// On any error the user's existing session is left untouched.
    pub async fn import(&self, user: &UserId, text: &str) -> Result<ImportOutcome, ImportError> {
        let keypair = match SecretParser::parse(text)
            .map_err(ImportError::from)
            .and_then(|secret| KeyDeriver::derive(&secret).map_err(ImportError::from))
        {
            Ok(keypair) => keypair,
            Err(e) => {
                warn!("[Wallet] Import rejected for user {}: {}", user, e.kind());
                self.metrics.inc_import(false);
                return Err(e);
            }
        };

        let address = keypair.address();
        let replaced = self.sessions.insert(user, keypair).await.is_some();
        self.metrics.inc_import(true);
        info!("[Wallet] User {} imported {}", user, address);

        Ok(ImportOutcome { address, replaced })
    }

    /// Query every configured network for the user's current wallet
    pub async fn balance(
        &self,
        user: &UserId,
        cancel: &CancelSignal,
    ) -> Result<BalanceSummary, BalanceError> {
        self.metrics.inc_balance_requests();

        let Some(keypair) = self.sessions.get(user).await else {
            self.metrics.inc_balance_no_session();
            return Err(BalanceError::NoSessionFound);
        };

        let pubkey = keypair.public_key();
        let report = match self.balance_timeout {
            Some(timeout) => {
                BalanceAggregator::fetch_all_with_timeout(pubkey, &self.endpoints, cancel, timeout)
                    .await
            }
            None => BalanceAggregator::fetch_all(pubkey, &self.endpoints, cancel).await,
        };
        self.metrics.record_report(&report);

        Ok(BalanceSummary {
            address: keypair.address(),
            report,
        })
    }

    /// Forget the user's wallet. Returns whether one existed.
    pub async fn forget(&self, user: &UserId) -> bool {
        self.sessions.remove(user).await.is_some()
    }
}
