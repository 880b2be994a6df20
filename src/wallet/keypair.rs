//! Canonical Ed25519 keypair produced by the key deriver

use crate::error::ParseError;
use ed25519_dalek::SigningKey;
use std::fmt;
use zeroize::Zeroizing;

/// Byte length of an Ed25519 public key / Solana address
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Longest base58 encoding of a 32-byte public key
const MAX_ENCODED_ADDRESS_LENGTH: usize = 44;

/// Byte length of the Solana secret-key layout (seed || public key)
pub const SECRET_KEY_LENGTH: usize = 64;

/// Ed25519 keypair owned by a single session.
///
/// Only [`crate::wallet::KeyDeriver`] can build one, so every `Keypair` has
/// passed validation and its public half is always derived from the seed.
#[derive(Clone)]
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    pub(crate) fn from_signing_key(signing: SigningKey) -> Self {
        Self { signing }
    }

    /// Public key bytes
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing.verifying_key().to_bytes()
    }

    /// 32-byte Ed25519 seed
    ///
    /// # Warning
    /// Raw key material. Never log or display it.
    pub fn secret_seed(&self) -> &[u8; 32] {
        self.signing.as_bytes()
    }

    /// 64-byte secret key in Solana's layout, zeroized on drop
    pub fn to_secret_key_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LENGTH]> {
        Zeroizing::new(self.signing.to_keypair_bytes())
    }

    /// Base58 address (the encoded public key)
    pub fn address(&self) -> String {
        bs58::encode(self.public_key()).into_string()
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key() && self.secret_seed() == other.secret_seed()
    }
}

impl Eq for Keypair {}

// Never print the seed
impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Decode a base58 address into raw public key bytes
pub fn decode_address(address: &str) -> Result<[u8; PUBLIC_KEY_LENGTH], ParseError> {
    let address = address.trim();
    if address.len() > MAX_ENCODED_ADDRESS_LENGTH {
        return Err(ParseError::InvalidEncoding(format!(
            "address has {} characters, expected at most {}",
            address.len(),
            MAX_ENCODED_ADDRESS_LENGTH
        )));
    }

    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| ParseError::InvalidEncoding(e.to_string()))?;

    bytes.as_slice().try_into().map_err(|_| {
        ParseError::InvalidEncoding(format!(
            "address decodes to {} bytes, expected {}",
            bytes.len(),
            PUBLIC_KEY_LENGTH
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Keypair {
        let seed: [u8; 32] = core::array::from_fn(|i| (i + 1) as u8);
        Keypair::from_signing_key(SigningKey::from_bytes(&seed))
    }

    #[test]
    fn test_address_is_base58_public_key() {
        let keypair = sample();
        assert_eq!(keypair.address(), "9C6hybhQ6Aycep9jaUnP6uL9ZYvDjUp1aSkFWPUFJtpj");
        assert_eq!(decode_address(&keypair.address()).unwrap(), keypair.public_key());
    }

    #[test]
    fn test_secret_key_layout() {
        let keypair = sample();
        let bytes = keypair.to_secret_key_bytes();
        assert_eq!(&bytes[..32], keypair.secret_seed());
        assert_eq!(&bytes[32..], &keypair.public_key());
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let keypair = sample();
        let debug_output = format!("{:?}", keypair);
        assert!(debug_output.contains("REDACTED"));
        assert!(debug_output.contains(&keypair.address()));
        assert!(!debug_output.contains(&format!("{:?}", keypair.secret_seed())));
    }

    #[test]
    fn test_decode_address_rejects_wrong_length() {
        // 3 bytes
        let result = decode_address("2g6x");
        assert!(matches!(result, Err(ParseError::InvalidEncoding(_))));
        // '0' is outside the base58 alphabet
        let result = decode_address("0OIl");
        assert!(matches!(result, Err(ParseError::InvalidEncoding(_))));
        let result = decode_address(&"z".repeat(100_000));
        assert!(matches!(result, Err(ParseError::InvalidEncoding(ref msg)) if msg.contains("at most 44")));
    }
}
