//! Solana Balance Bot Web Server
//!
//! Multi-user HTTP interface for wallet import and balance queries.

use anyhow::Result;
use sol_balance_bot::api::{create_app, AppState};
use sol_balance_bot::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging. Override with RUST_LOG, e.g. RUST_LOG=debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,sol_balance_bot=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.require_api_token()?;

    let networks: Vec<String> = config
        .networks
        .iter()
        .map(|n| format!("{} ({})", n.name, n.rpc_url))
        .collect();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       SOLANA BALANCE BOT - WEB SERVER                        ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    for network in &networks {
        println!("║  {:<60}║", network);
    }
    println!("║  Commitment: {:<48}║", config.commitment);
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    // Create application state
    info!("Initializing application state...");
    let addr = config.bind_addr;
    let state = AppState::new(config)?;
    let sessions = state.service.sessions().clone();

    // Create the Axum app
    let app = create_app(state);

    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    println!();
    println!("  API:    http://{}/api", addr);
    println!("  Health: http://{}/health", addr);
    println!();

    // Run the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sessions.clear().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
