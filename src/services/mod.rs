//! Session, network and aggregation services

pub mod balance;
pub mod cancel;
pub mod metrics;
pub mod rpc;
pub mod session_store;
pub mod wallet_service;

#[cfg(test)]
pub(crate) mod testing;

pub use balance::{BalanceAggregator, BalanceEntry, BalanceReport, Endpoint, EndpointSet};
pub use cancel::CancelSignal;
pub use metrics::{Metrics, MetricsSnapshot};
pub use rpc::{BalanceSource, SolanaRpcClient};
pub use session_store::SessionStore;
pub use wallet_service::{BalanceSummary, ImportOutcome, WalletService};
