//! Wallet import: secret parsing, key derivation and the keypair type
//!
//! Secrets are never stored; only the derived [`Keypair`] outlives an import.

mod deriver;
mod keypair;
mod secret;

pub use deriver::{KeyDeriver, SOLANA_COIN_TYPE, SOLANA_DERIVATION_PATH};
pub use keypair::{decode_address, Keypair, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
pub use secret::{MnemonicPhrase, Secret, SecretKeyBytes, SecretParser};
