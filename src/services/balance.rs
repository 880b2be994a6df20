//! Concurrent balance aggregation across networks
//!
//! One spawned task per endpoint, all started before any is awaited, then
//! joined as a barrier. A failed or slow endpoint never hides a sibling's
//! result, and no task outlives the call: dropping the returned future
//! aborts whatever is still running.

use crate::error::{FetchError, NetworkError};
use crate::services::cancel::CancelSignal;
use crate::services::rpc::BalanceSource;
use crate::types::Lamports;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// A named, pre-connected balance source
#[derive(Clone)]
pub struct Endpoint {
    name: String,
    source: Arc<dyn BalanceSource>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, source: Arc<dyn BalanceSource>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("name", &self.name).finish()
    }
}

/// Ordered endpoints, fixed for the life of the process
#[derive(Debug, Clone, Default)]
pub struct EndpointSet {
    endpoints: Vec<Endpoint>,
}

impl EndpointSet {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Result of one endpoint query
#[derive(Debug, Clone)]
pub struct BalanceEntry {
    pub network: String,
    pub outcome: Result<Lamports, FetchError>,
}

impl BalanceEntry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-endpoint balances for one request, in endpoint-set order
#[derive(Debug, Clone)]
pub struct BalanceReport {
    entries: Vec<BalanceEntry>,
    fetched_at: DateTime<Utc>,
}

impl BalanceReport {
    pub fn entries(&self) -> &[BalanceEntry] {
        &self.entries
    }

    pub fn get(&self, network: &str) -> Option<&Result<Lamports, FetchError>> {
        self.entries
            .iter()
            .find(|e| e.network == network)
            .map(|e| &e.outcome)
    }

    pub fn successes(&self) -> impl Iterator<Item = (&str, Lamports)> {
        self.entries.iter().filter_map(|e| match e.outcome {
            Ok(lamports) => Some((e.network.as_str(), lamports)),
            Err(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            Ok(_) => None,
            Err(err) => Some((e.network.as_str(), err)),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every endpoint answered
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(BalanceEntry::is_ok)
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Aborts every still-running query if the aggregation future is dropped
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Fan-out / fan-in balance queries
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Query every endpoint concurrently and wait for all of them.
    ///
    /// Never fails as a whole: each endpoint's error is recorded in its own
    /// entry. No retries and no internal deadline; firing `cancel` resolves
    /// every pending query as [`FetchError::Cancelled`].
    pub async fn fetch_all(
        pubkey: [u8; 32],
        endpoints: &EndpointSet,
        cancel: &CancelSignal,
    ) -> BalanceReport {
        let handles: Vec<_> = endpoints
            .iter()
            .map(|endpoint| {
                let source = endpoint.source.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => Err(FetchError::Cancelled),
                        result = source.get_balance(&pubkey) => {
                            result.map(Lamports).map_err(FetchError::from)
                        }
                    }
                })
            })
            .collect();

        let _guard = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

        let results = join_all(handles).await;

        let entries: Vec<BalanceEntry> = endpoints
            .iter()
            .zip(results)
            .map(|(endpoint, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    Err(FetchError::Network(NetworkError::Task(e.to_string())))
                });
                match &outcome {
                    Ok(lamports) => debug!("[Balance] {}: {}", endpoint.name, lamports),
                    Err(e) => warn!("[Balance] {} failed: {}", endpoint.name, e),
                }
                BalanceEntry {
                    network: endpoint.name.clone(),
                    outcome,
                }
            })
            .collect();

        let report = BalanceReport {
            entries,
            fetched_at: Utc::now(),
        };

        info!(
            "[Balance] Queried {} endpoints: {} ok, {} failed",
            report.len(),
            report.successes().count(),
            report.failures().count()
        );

        report
    }

    /// [`fetch_all`](Self::fetch_all) with a caller-level deadline.
    ///
    /// When `timeout` elapses or `cancel` fires, still-pending endpoints
    /// resolve as cancelled and finished ones keep their results.
    pub async fn fetch_all_with_timeout(
        pubkey: [u8; 32],
        endpoints: &EndpointSet,
        cancel: &CancelSignal,
        timeout: Duration,
    ) -> BalanceReport {
        let deadline = CancelSignal::new();
        let fetch = Self::fetch_all(pubkey, endpoints, &deadline);
        tokio::pin!(fetch);

        tokio::select! {
            report = &mut fetch => return report,
            _ = tokio::time::sleep(timeout) => {
                warn!("[Balance] Deadline of {:?} reached, cancelling pending queries", timeout);
            }
            _ = cancel.cancelled() => {
                debug!("[Balance] Request cancelled by caller");
            }
        }

        deadline.cancel();
        fetch.await
    }
}
