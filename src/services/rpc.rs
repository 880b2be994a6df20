//! Network boundary: one balance query capability per endpoint
//!
//! [`SolanaRpcClient`] speaks Solana JSON-RPC `getBalance`. Anything else
//! that can answer "how many lamports does this key hold" can implement
//! [`BalanceSource`] and join an endpoint set.

use crate::error::NetworkError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Balance query for one network
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Lamports held by `pubkey`
    async fn get_balance(&self, pubkey: &[u8; 32]) -> Result<u64, NetworkError>;
}

/// JSON-RPC request
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'static str,
    params: (String, CommitmentConfig<'a>),
}

#[derive(Debug, Serialize)]
struct CommitmentConfig<'a> {
    commitment: &'a str,
}

/// JSON-RPC response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<BalanceResult>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct BalanceResult {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Long-lived connection to one Solana cluster
#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    client: Client,
    rpc_url: String,
    commitment: String,
}

impl SolanaRpcClient {
    pub fn new(
        rpc_url: impl Into<String>,
        commitment: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, rpc_url, commitment))
    }

    /// Reuse an existing HTTP client (shares its connection pool)
    pub fn with_client(
        client: Client,
        rpc_url: impl Into<String>,
        commitment: impl Into<String>,
    ) -> Self {
        Self {
            client,
            rpc_url: rpc_url.into(),
            commitment: commitment.into(),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn build_request(&self, pubkey: &[u8; 32]) -> JsonRpcRequest<'_> {
        JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "getBalance",
            params: (
                bs58::encode(pubkey).into_string(),
                CommitmentConfig {
                    commitment: &self.commitment,
                },
            ),
        }
    }

    /// Extract lamports from a `getBalance` response body
    fn decode_response(body: &str) -> Result<u64, NetworkError> {
        let response: JsonRpcResponse =
            serde_json::from_str(body).map_err(|e| NetworkError::Decode(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(NetworkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .map(|r| r.value)
            .ok_or_else(|| NetworkError::Decode("response has neither result nor error".to_string()))
    }
}

#[async_trait]
impl BalanceSource for SolanaRpcClient {
    async fn get_balance(&self, pubkey: &[u8; 32]) -> Result<u64, NetworkError> {
        let request = self.build_request(pubkey);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NetworkError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::from_reqwest(&e))?;

        let lamports = Self::decode_response(&body)?;
        debug!("[Rpc] {} getBalance -> {} lamports", self.rpc_url, lamports);
        Ok(lamports)
    }
}
