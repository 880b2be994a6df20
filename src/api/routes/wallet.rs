//! Wallet API endpoints

use crate::api::routes::{authorize, error, ApiError};
use crate::api::server::AppState;
use crate::error::{BalanceError, ErrorKind, ImportError};
use crate::services::{BalanceEntry, CancelSignal};
use crate::types::UserId;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Import wallet request
#[derive(Deserialize)]
pub struct ImportWalletRequest {
    /// Mnemonic phrase or base58 secret key
    pub secret: String,
}

// Never print the secret
impl std::fmt::Debug for ImportWalletRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportWalletRequest")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Import wallet response
#[derive(Debug, Serialize)]
pub struct ImportWalletResponse {
    pub address: String,
    pub replaced: bool,
}

/// One network's line in a balance response
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NetworkBalance {
    Ok {
        network: String,
        lamports: u64,
        sol: Decimal,
    },
    Err {
        network: String,
        error: String,
        kind: ErrorKind,
    },
}

impl From<&BalanceEntry> for NetworkBalance {
    fn from(entry: &BalanceEntry) -> Self {
        match &entry.outcome {
            Ok(lamports) => NetworkBalance::Ok {
                network: entry.network.clone(),
                lamports: lamports.0,
                sol: lamports.to_sol(),
            },
            Err(e) => NetworkBalance::Err {
                network: entry.network.clone(),
                error: e.user_message(),
                kind: e.kind(),
            },
        }
    }
}

/// Wallet balance response
#[derive(Debug, Serialize)]
pub struct WalletBalanceResponse {
    pub address: String,
    pub balances: Vec<NetworkBalance>,
    /// When every network had answered
    pub fetched_at: DateTime<Utc>,
}

fn user_id(headers: &HeaderMap) -> Result<UserId, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(UserId::from)
        .ok_or_else(|| {
            error(
                StatusCode::BAD_REQUEST,
                format!("{} header required", USER_ID_HEADER),
                None,
            )
        })
}

fn import_error(e: ImportError) -> ApiError {
    error(StatusCode::BAD_REQUEST, e.user_message(), Some(e.kind()))
}

fn balance_error(e: BalanceError) -> ApiError {
    match e {
        BalanceError::NoSessionFound => {
            error(StatusCode::NOT_FOUND, e.user_message(), Some(e.kind()))
        }
    }
}

/// Import a wallet from a mnemonic or secret key
pub async fn import_wallet(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    headers: HeaderMap,
    Json(req): Json<ImportWalletRequest>,
) -> Result<Json<ImportWalletResponse>, ApiError> {
    authorize(&state, auth)?;
    let user = user_id(&headers)?;

    let outcome = state
        .service
        .import(&user, &req.secret)
        .await
        .map_err(import_error)?;

    Ok(Json(ImportWalletResponse {
        address: outcome.address,
        replaced: outcome.replaced,
    }))
}

/// Get the imported wallet's balance on every configured network
pub async fn get_balance(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    headers: HeaderMap,
) -> Result<Json<WalletBalanceResponse>, ApiError> {
    authorize(&state, auth)?;
    let user = user_id(&headers)?;

    // Dropping this handler (client disconnect) aborts the queries
    let cancel = CancelSignal::new();
    let summary = state
        .service
        .balance(&user, &cancel)
        .await
        .map_err(balance_error)?;

    debug!(
        "[Api] Balance for {}: {}/{} networks answered",
        summary.address,
        summary.report.successes().count(),
        summary.report.len()
    );

    Ok(Json(WalletBalanceResponse {
        address: summary.address,
        balances: summary.report.entries().iter().map(NetworkBalance::from).collect(),
        fetched_at: summary.report.fetched_at(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_app;
    use crate::services::testing::{endpoint, endpoint_set, StaticSource};
    use crate::services::WalletService;
    use crate::Config;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";
    const PHRASE_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn app() -> Router {
        let service = WalletService::new(endpoint_set(vec![
            endpoint("mainnet", Arc::new(StaticSource::failing())),
            endpoint("devnet", Arc::new(StaticSource::ok(5_000_000_000))),
        ]));
        create_app(AppState::with_service(service, Config::default(), TOKEN))
    }

    fn import_request(user: &str, secret: &str) -> Request<Body> {
        Request::post("/api/wallet/import")
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .header(header::CONTENT_TYPE, "application/json")
            .header(USER_ID_HEADER, user)
            .body(Body::from(json!({ "secret": secret }).to_string()))
            .unwrap()
    }

    fn balance_request(user: &str) -> Request<Body> {
        Request::get("/api/wallet/balance")
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .header(USER_ID_HEADER, user)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_import_and_balance() {
        let app = app();

        let (status, body) = send(&app, import_request("42", PHRASE_12)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk");
        assert_eq!(body["replaced"], false);

        let (status, body) = send(&app, balance_request("42")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk");

        let balances = body["balances"].as_array().unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0]["network"], "mainnet");
        assert_eq!(balances[0]["kind"], "network_error");
        assert_eq!(balances[1]["network"], "devnet");
        assert_eq!(balances[1]["lamports"], 5_000_000_000_u64);
        assert_eq!(balances[1]["sol"], "5");

        let fetched_at = body["fetched_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(fetched_at).is_ok());
    }

    #[tokio::test]
    async fn test_import_errors_are_bad_request() {
        let app = app();

        let (status, body) = send(&app, import_request("42", "not a valid phrase at all here now yes")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_encoding");

        let (status, body) = send(&app, import_request("42", "   ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "empty_input");
    }

    #[tokio::test]
    async fn test_balance_without_import_is_not_found() {
        let (status, body) = send(&app(), balance_request("7")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "no_session_found");
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let app = app();
        send(&app, import_request("alice", PHRASE_12)).await;

        let (status, _) = send(&app, balance_request("bob")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_auth_required() {
        let app = app();

        let request = Request::get("/api/wallet/balance")
            .header(USER_ID_HEADER, "42")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::get("/api/metrics")
            .header(header::AUTHORIZATION, "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("kind").is_none());
    }

    #[tokio::test]
    async fn test_missing_user_id() {
        let request = Request::get("/api/wallet/balance")
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        send(&app, import_request("42", PHRASE_12)).await;
        let request = Request::get("/api/metrics")
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imports_succeeded"], 1);
    }
}
