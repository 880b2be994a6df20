//! Configuration management for the balance bot

use crate::error::NetworkError;
use crate::services::{Endpoint, EndpointSet, SolanaRpcClient};
use anyhow::Result;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// One named network the balance query fans out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
}

impl NetworkConfig {
    pub fn new(name: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rpc_url: rpc_url.into(),
        }
    }
}

/// Bot configuration loaded from environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Networks queried for every balance request, in report order
    pub networks: Vec<NetworkConfig>,

    /// Commitment level sent with `getBalance`
    pub commitment: String,

    /// HTTP timeout for a single RPC call
    pub rpc_timeout_seconds: u64,

    /// Optional deadline for a whole balance request
    pub balance_timeout_seconds: Option<u64>,

    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Bearer token for the HTTP API (server only)
    pub api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            networks: vec![
                NetworkConfig::new("mainnet", SolanaCluster::MAINNET_URL),
                NetworkConfig::new("devnet", SolanaCluster::DEVNET_URL),
            ],
            commitment: "confirmed".to_string(),
            rpc_timeout_seconds: 30,
            balance_timeout_seconds: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let mainnet_url = var("MAINNET_RPC_URL").unwrap_or_else(|| SolanaCluster::MAINNET_URL.to_string());
        let devnet_url = var("DEVNET_RPC_URL").unwrap_or_else(|| SolanaCluster::DEVNET_URL.to_string());

        let mut networks = vec![
            NetworkConfig::new("mainnet", mainnet_url),
            NetworkConfig::new("devnet", devnet_url),
        ];

        // Testnet is opt-in
        if let Some(testnet_url) = var("TESTNET_RPC_URL") {
            networks.push(NetworkConfig::new("testnet", testnet_url));
        }

        let commitment = var("RPC_COMMITMENT").unwrap_or(defaults.commitment);
        if !matches!(commitment.as_str(), "processed" | "confirmed" | "finalized") {
            anyhow::bail!(
                "RPC_COMMITMENT must be processed, confirmed or finalized (got {})",
                commitment
            );
        }

        let rpc_timeout_seconds = match var("RPC_TIMEOUT_SECONDS") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("RPC_TIMEOUT_SECONDS must be a whole number of seconds"))?,
            None => defaults.rpc_timeout_seconds,
        };

        let balance_timeout_seconds = match var("BALANCE_TIMEOUT_SECONDS") {
            Some(v) => Some(
                v.parse()
                    .map_err(|_| anyhow::anyhow!("BALANCE_TIMEOUT_SECONDS must be a whole number of seconds"))?,
            ),
            None => None,
        };

        let bind_addr = match var("BIND_ADDR") {
            Some(v) => v
                .parse()
                .map_err(|e| anyhow::anyhow!("BIND_ADDR is not a socket address: {}", e))?,
            None => defaults.bind_addr,
        };

        let api_token = var("API_TOKEN");

        Ok(Self {
            networks,
            commitment,
            rpc_timeout_seconds,
            balance_timeout_seconds,
            bind_addr,
            api_token,
        })
    }

    /// API token, required before the HTTP server may start
    pub fn require_api_token(&self) -> Result<&str> {
        match self.api_token.as_deref() {
            Some(token) => Ok(token),
            None => anyhow::bail!("API_TOKEN required to run the server"),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_seconds)
    }

    pub fn balance_timeout(&self) -> Option<Duration> {
        self.balance_timeout_seconds.map(Duration::from_secs)
    }

    /// Connect one RPC client per configured network.
    /// All clients share a single HTTP connection pool.
    pub fn endpoint_set(&self) -> Result<EndpointSet, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(self.rpc_timeout())
            .build()
            .map_err(|e| NetworkError::Http(format!("failed to create HTTP client: {}", e)))?;

        let endpoints = self
            .networks
            .iter()
            .map(|network| {
                let rpc = SolanaRpcClient::with_client(
                    client.clone(),
                    network.rpc_url.clone(),
                    self.commitment.clone(),
                );
                Endpoint::new(network.name.clone(), Arc::new(rpc))
            })
            .collect();

        Ok(EndpointSet::new(endpoints))
    }
}

/// Public Solana cluster RPC endpoints
pub struct SolanaCluster;

impl SolanaCluster {
    pub const MAINNET_URL: &'static str = "https://api.mainnet-beta.solana.com";
    pub const DEVNET_URL: &'static str = "https://api.devnet.solana.com";
    pub const TESTNET_URL: &'static str = "https://api.testnet.solana.com";
}
