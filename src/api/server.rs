//! Axum server setup and configuration

use crate::api::routes::{self, ApiError};
use crate::services::{MetricsSnapshot, WalletService};
use crate::Config;
use anyhow::Result;
use axum::{
    extract::State,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: WalletService,
    pub config: Arc<Config>,
    /// Bearer token every `/api` request must present
    pub api_token: Arc<str>,
}

impl AppState {
    /// Connect every configured network and build the wallet service.
    /// Fails when no API token is configured.
    pub fn new(config: Config) -> Result<Self> {
        let api_token: Arc<str> = Arc::from(config.require_api_token()?);
        let endpoints = config.endpoint_set()?;
        let service = WalletService::new(endpoints).with_balance_timeout(config.balance_timeout());

        Ok(Self {
            service,
            config: Arc::new(config),
            api_token,
        })
    }

    /// State around an existing service (tests, embedding)
    pub fn with_service(service: WalletService, config: Config, api_token: &str) -> Self {
        Self {
            service,
            config: Arc::new(config),
            api_token: Arc::from(api_token),
        }
    }
}

/// Create the Axum application with all routes
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(routes::wallet::USER_ID_HEADER),
        ]);

    // API routes
    let api_routes = Router::new()
        .route("/wallet/import", post(routes::wallet::import_wallet))
        .route("/wallet/balance", get(routes::wallet::get_balance))
        .route("/metrics", get(metrics));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Counter snapshot
async fn metrics(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<MetricsSnapshot>, ApiError> {
    routes::authorize(&state, auth)?;
    Ok(Json(state.service.metrics().snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_requires_token() {
        assert!(AppState::new(Config::default()).is_err());

        let config = Config {
            api_token: Some("token".to_string()),
            ..Config::default()
        };
        let state = AppState::new(config).unwrap();
        assert_eq!(&*state.api_token, "token");
        assert_eq!(state.service.endpoints().names(), ["mainnet", "devnet"]);
    }
}
