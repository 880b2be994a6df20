//! Metrics collection for wallet imports and balance queries

use crate::error::FetchError;
use crate::services::balance::BalanceReport;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Import attempts
    pub imports_total: u64,
    pub imports_succeeded: u64,
    pub imports_failed: u64,
    /// Balance requests (one per user request, not per endpoint)
    pub balance_requests: u64,
    pub balance_no_session: u64,
    /// Per-endpoint outcomes across all requests
    pub endpoint_successes: u64,
    pub endpoint_network_errors: u64,
    pub endpoint_cancelled: u64,
}

/// Thread-safe metrics collector
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    imports_total: AtomicU64,
    imports_succeeded: AtomicU64,
    imports_failed: AtomicU64,
    balance_requests: AtomicU64,
    balance_no_session: AtomicU64,
    endpoint_successes: AtomicU64,
    endpoint_network_errors: AtomicU64,
    endpoint_cancelled: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_import(&self, succeeded: bool) {
        self.inner.imports_total.fetch_add(1, Ordering::Relaxed);
        if succeeded {
            self.inner.imports_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.imports_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn inc_balance_requests(&self) {
        self.inner.balance_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_balance_no_session(&self) {
        self.inner.balance_no_session.fetch_add(1, Ordering::Relaxed);
    }

    /// Count every endpoint outcome in a finished report
    pub fn record_report(&self, report: &BalanceReport) {
        for entry in report.entries() {
            let counter = match &entry.outcome {
                Ok(_) => &self.inner.endpoint_successes,
                Err(FetchError::Network(_)) => &self.inner.endpoint_network_errors,
                Err(FetchError::Cancelled) => &self.inner.endpoint_cancelled,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            imports_total: self.inner.imports_total.load(Ordering::Relaxed),
            imports_succeeded: self.inner.imports_succeeded.load(Ordering::Relaxed),
            imports_failed: self.inner.imports_failed.load(Ordering::Relaxed),
            balance_requests: self.inner.balance_requests.load(Ordering::Relaxed),
            balance_no_session: self.inner.balance_no_session.load(Ordering::Relaxed),
            endpoint_successes: self.inner.endpoint_successes.load(Ordering::Relaxed),
            endpoint_network_errors: self.inner.endpoint_network_errors.load(Ordering::Relaxed),
            endpoint_cancelled: self.inner.endpoint_cancelled.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::balance::BalanceAggregator;
    use crate::services::cancel::CancelSignal;
    use crate::services::testing::{endpoint, endpoint_set, HangingSource, StaticSource};

    #[test]
    fn test_import_counters() {
        let metrics = Metrics::new();
        metrics.inc_import(true);
        metrics.inc_import(false);
        metrics.inc_import(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.imports_total, 3);
        assert_eq!(snapshot.imports_succeeded, 1);
        assert_eq!(snapshot.imports_failed, 2);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let clone = metrics.clone();
        clone.inc_balance_requests();
        clone.inc_balance_no_session();
        assert_eq!(metrics.snapshot().balance_requests, 1);
        assert_eq!(metrics.snapshot().balance_no_session, 1);
    }

    #[tokio::test]
    async fn test_record_report() {
        let endpoints = endpoint_set(vec![
            endpoint("mainnet", Arc::new(StaticSource::ok(1))),
            endpoint("devnet", Arc::new(StaticSource::failing())),
            endpoint("testnet", Arc::new(HangingSource)),
        ]);
        let cancel = CancelSignal::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let report = BalanceAggregator::fetch_all([1u8; 32], &endpoints, &cancel).await;
        let metrics = Metrics::new();
        metrics.record_report(&report);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.endpoint_successes, 1);
        assert_eq!(snapshot.endpoint_network_errors, 1);
        assert_eq!(snapshot.endpoint_cancelled, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(Metrics::new().snapshot()).unwrap();
        assert_eq!(json["imports_total"], 0);
        assert_eq!(json["endpoint_cancelled"], 0);
    }
}
