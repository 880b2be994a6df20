//! Solana Balance Bot Library
//!
//! Turns a user-supplied secret into a Solana wallet and reports its balance
//! on several networks at once:
//!
//! 1. **Import**: a 12/24-word BIP-39 phrase is derived along
//!    `m/44'/501'/0'/0'` (SLIP-0010 Ed25519); a base58 64-byte secret key is
//!    used directly after its public half is verified.
//!
//! 2. **Balance**: one concurrent `getBalance` per configured network
//!    (mainnet and devnet by default). Each network's result or error is
//!    reported on its own; one failing network never hides the others.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;
pub mod wallet;

pub use config::{Config, NetworkConfig, SolanaCluster};
pub use error::{BalanceError, DeriveError, ErrorKind, FetchError, ImportError, NetworkError, ParseError};
pub use services::{BalanceAggregator, BalanceReport, CancelSignal, EndpointSet, WalletService};
pub use types::{Lamports, UserId, LAMPORTS_PER_SOL};
pub use wallet::{KeyDeriver, Keypair, Secret, SecretParser};
