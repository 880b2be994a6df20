//! In-memory balance sources for tests

use crate::error::NetworkError;
use crate::services::balance::{Endpoint, EndpointSet};
use crate::services::rpc::BalanceSource;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Answers with a fixed result after an optional delay
pub struct StaticSource {
    result: Result<u64, NetworkError>,
    delay: Duration,
    calls: AtomicU32,
}

impl StaticSource {
    pub fn ok(lamports: u64) -> Self {
        Self {
            result: Ok(lamports),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(NetworkError::Http("connection failed".to_string())),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for StaticSource {
    async fn get_balance(&self, _pubkey: &[u8; 32]) -> Result<u64, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

/// Never answers
pub struct HangingSource;

#[async_trait]
impl BalanceSource for HangingSource {
    async fn get_balance(&self, _pubkey: &[u8; 32]) -> Result<u64, NetworkError> {
        std::future::pending().await
    }
}

/// Panics mid-query
pub struct PanickingSource;

#[async_trait]
impl BalanceSource for PanickingSource {
    async fn get_balance(&self, _pubkey: &[u8; 32]) -> Result<u64, NetworkError> {
        panic!("endpoint exploded")
    }
}

pub fn endpoint(name: &str, source: Arc<dyn BalanceSource>) -> Endpoint {
    Endpoint::new(name, source)
}

pub fn endpoint_set(endpoints: Vec<Endpoint>) -> EndpointSet {
    EndpointSet::new(endpoints)
}
