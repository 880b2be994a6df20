//! Secret → keypair derivation
//!
//! Mnemonics go through the BIP-39 seed function and then SLIP-0010 Ed25519
//! derivation along Solana's `m/44'/501'/0'/0'`. SLIP-0010 only defines
//! hardened children for Ed25519, so every path segment must carry `'`.
//!
//! Raw secret keys use Solana's 64-byte layout (seed || public key) and the
//! embedded public key must match the one generated from the seed.

use crate::error::DeriveError;
use crate::wallet::keypair::{Keypair, SECRET_KEY_LENGTH};
use crate::wallet::secret::{MnemonicPhrase, Secret};
use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

type HmacSha512 = Hmac<Sha512>;

/// SLIP-44 registered coin type for Solana
pub const SOLANA_COIN_TYPE: u32 = 501;

/// Account 0, external chain 0
pub const SOLANA_DERIVATION_PATH: &str = "m/44'/501'/0'/0'";

/// `SOLANA_DERIVATION_PATH` as unhardened indices
const SOLANA_PATH_INDICES: [u32; 4] = [44, SOLANA_COIN_TYPE, 0, 0];

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// SLIP-0010 master key HMAC key
const ED25519_CURVE_SEED: &[u8] = b"ed25519 seed";

/// Turns validated secrets into keypairs. Pure CPU, no I/O, no randomness.
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derive the keypair for a parsed secret
    pub fn derive(secret: &Secret) -> Result<Keypair, DeriveError> {
        match secret {
            Secret::Mnemonic(phrase) => Self::from_mnemonic(phrase),
            Secret::PrivateKey(bytes) => Self::from_secret_key_bytes(bytes.as_bytes()),
        }
    }

    /// BIP-39 seed (empty passphrase) → SLIP-0010 → Ed25519 keypair
    pub fn from_mnemonic(phrase: &MnemonicPhrase) -> Result<Keypair, DeriveError> {
        let seed = phrase.to_seed("");
        let key = Self::derive_indices(seed.as_slice(), &SOLANA_PATH_INDICES)?;
        Ok(Keypair::from_signing_key(SigningKey::from_bytes(&key)))
    }

    /// Solana 64-byte secret key → keypair, verifying the embedded public key
    pub fn from_secret_key_bytes(bytes: &[u8]) -> Result<Keypair, DeriveError> {
        let layout: &[u8; SECRET_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            DeriveError::MalformedKey(format!(
                "secret key is {} bytes, expected {}",
                bytes.len(),
                SECRET_KEY_LENGTH
            ))
        })?;

        let signing = SigningKey::from_keypair_bytes(layout).map_err(|_| {
            DeriveError::MalformedKey(
                "embedded public key does not match the private seed".to_string(),
            )
        })?;

        Ok(Keypair::from_signing_key(signing))
    }

    /// SLIP-0010 Ed25519 derivation of a 32-byte seed along `path`
    pub fn derive_path_seed(seed: &[u8], path: &str) -> Result<Zeroizing<[u8; 32]>, DeriveError> {
        let indices = Self::parse_path(path)?;
        Self::derive_indices(seed, &indices)
    }

    fn derive_indices(seed: &[u8], indices: &[u32]) -> Result<Zeroizing<[u8; 32]>, DeriveError> {
        let (mut key, mut chain_code) = Self::hmac_split(ED25519_CURVE_SEED, &[seed])?;

        for &index in indices {
            // 0x00 || key || ser32(index + 2^31)
            let prefix = [0x00u8];
            let hardened = (index | HARDENED_OFFSET).to_be_bytes();
            let (child_key, child_chain) = Self::hmac_split(
                chain_code.as_slice(),
                &[&prefix[..], key.as_slice(), &hardened[..]],
            )?;
            key = child_key;
            chain_code = child_chain;
        }

        Ok(key)
    }

    /// I = HMAC-SHA512(key, data...); returns (I_L, I_R)
    fn hmac_split(
        hmac_key: &[u8],
        data: &[&[u8]],
    ) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>), DeriveError> {
        let mut mac = HmacSha512::new_from_slice(hmac_key)
            .map_err(|e| DeriveError::Derivation(format!("HMAC init failed: {}", e)))?;
        for chunk in data {
            mac.update(chunk);
        }

        let mut output = [0u8; 64];
        output.copy_from_slice(&mac.finalize().into_bytes());

        let mut left = Zeroizing::new([0u8; 32]);
        let mut right = Zeroizing::new([0u8; 32]);
        left.copy_from_slice(&output[..32]);
        right.copy_from_slice(&output[32..]);
        output.zeroize();

        Ok((left, right))
    }

    /// "m/44'/501'/0'/0'" → [44, 501, 0, 0]; every segment must be hardened
    fn parse_path(path: &str) -> Result<Vec<u32>, DeriveError> {
        let path = path.trim();
        let segments = path.strip_prefix("m/").ok_or_else(|| {
            DeriveError::Derivation(format!("path must start with 'm/': {}", path))
        })?;

        if segments.is_empty() {
            return Err(DeriveError::Derivation("empty derivation path".to_string()));
        }

        segments
            .split('/')
            .map(|segment| {
                let number = segment
                    .strip_suffix('\'')
                    .or_else(|| segment.strip_suffix('h'))
                    .ok_or_else(|| {
                        DeriveError::Derivation(format!(
                            "Ed25519 only supports hardened segments, got '{}'",
                            segment
                        ))
                    })?;

                let index: u32 = number.parse().map_err(|e| {
                    DeriveError::Derivation(format!("invalid index '{}': {}", number, e))
                })?;

                if index >= HARDENED_OFFSET {
                    return Err(DeriveError::Derivation(format!(
                        "index {} out of range",
                        index
                    )));
                }
                Ok(index)
            })
            .collect()
    }
}
