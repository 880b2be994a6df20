//! Solana Balance Bot CLI
//!
//! Import a wallet from a seed phrase or private key and check its balance
//! on every configured network.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sol_balance_bot::services::{BalanceReport, CancelSignal};
use sol_balance_bot::wallet::decode_address;
use sol_balance_bot::{BalanceAggregator, Config, KeyDeriver, SecretParser, UserId, WalletService};
use std::future::Future;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sol-balance-bot")]
#[command(about = "Solana wallet import and multi-network balance checker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a seed phrase or base58 private key from stdin and print its address
    Derive,

    /// Show the balance of any address on every configured network
    Balance {
        /// Base58 wallet address
        address: String,
    },

    /// Interactive session: paste a secret to import, /balance to query
    Shell,
}

const HELP: &str = "Send your seed phrase (12 or 24 words) or base58 private key to import a wallet.\n\
Commands: /balance  show balances | /start  this help | /quit  exit";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Derive => derive_address().await?,
        Commands::Balance { address } => show_balance(&config, &address).await?,
        Commands::Shell => run_shell(&config).await?,
    }

    Ok(())
}

async fn derive_address() -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read secret from stdin")?;

    let secret = SecretParser::parse(&input)?;
    let keypair = KeyDeriver::derive(&secret)?;

    println!("{}", keypair.address());
    Ok(())
}

async fn show_balance(config: &Config, address: &str) -> Result<()> {
    let pubkey = decode_address(address)?;
    let endpoints = config.endpoint_set()?;

    let cancel = CancelSignal::new();
    let report = match config.balance_timeout() {
        Some(timeout) => {
            let fetch = BalanceAggregator::fetch_all_with_timeout(pubkey, &endpoints, &cancel, timeout);
            until_ctrl_c(fetch, &cancel).await
        }
        None => until_ctrl_c(BalanceAggregator::fetch_all(pubkey, &endpoints, &cancel), &cancel).await,
    };

    print_report(address.trim(), &report);
    Ok(())
}

async fn run_shell(config: &Config) -> Result<()> {
    let service = WalletService::new(config.endpoint_set()?)
        .with_balance_timeout(config.balance_timeout());
    let user = UserId::from("local");

    println!("\n{}", "=".repeat(70));
    println!("  SOLANA BALANCE BOT");
    println!("  Networks: {}", service.endpoints().names().join(", "));
    println!("{}\n", "=".repeat(70));
    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line else { break };
        let text = line.trim();

        match text {
            "" => continue,
            "/quit" | "/exit" => break,
            "/start" | "/help" => println!("{}\n", HELP),
            "/balance" => {
                let cancel = CancelSignal::new();
                match until_ctrl_c(service.balance(&user, &cancel), &cancel).await {
                    Ok(summary) => print_report(&summary.address, &summary.report),
                    Err(e) => println!("{}\n", e.user_message().as_str().yellow()),
                }
            }
            _ if text.starts_with('/') => println!("Unknown command. {}\n", HELP),
            _ => match service.import(&user, text).await {
                Ok(outcome) => {
                    println!("{} {}", "Wallet imported:".green(), outcome.address.as_str().bold());
                    println!("Use /balance to check your balance.\n");
                }
                Err(e) => {
                    debug!("Import failed: {}", e.kind());
                    println!("{}\n", e.user_message().as_str().red());
                }
            },
        }
    }

    service.sessions().clear().await;
    Ok(())
}

/// Drive `fut` to completion, firing `cancel` if Ctrl-C arrives first
async fn until_ctrl_c<F: Future>(fut: F, cancel: &CancelSignal) -> F::Output {
    tokio::pin!(fut);
    tokio::select! {
        output = &mut fut => return output,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "Cancelling pending queries...".yellow());
            cancel.cancel();
        }
    }
    fut.await
}

fn print_report(address: &str, report: &BalanceReport) {
    println!("\n{}", "-".repeat(70));
    println!("  Address: {}", address.bold());
    println!("{}", "-".repeat(70));

    for entry in report.entries() {
        match &entry.outcome {
            Ok(lamports) => println!(
                "  {:<10} {}",
                entry.network,
                format!("{} SOL", lamports.to_sol()).as_str().green()
            ),
            Err(e) => println!("  {:<10} {}", entry.network, e.user_message().as_str().red()),
        }
    }

    println!("{}\n", "-".repeat(70));
}
