//! Secret classification and validation
//!
//! Raw text from the user is either a BIP-39 mnemonic or a base58 encoded
//! 64-byte secret key. Word count is the only disambiguator: 12 or more
//! whitespace-separated words is a mnemonic candidate, anything shorter is a
//! private key candidate.

use crate::error::ParseError;
use crate::wallet::keypair::SECRET_KEY_LENGTH;

/// Longest base58 encoding of a 64-byte secret key
pub const MAX_ENCODED_SECRET_KEY_LENGTH: usize = 88;
use bip39::{Language, Mnemonic};
use std::fmt;
use zeroize::Zeroizing;

/// A validated secret, alive only for the duration of one import
#[derive(Clone, Debug)]
pub enum Secret {
    Mnemonic(MnemonicPhrase),
    PrivateKey(SecretKeyBytes),
}

/// Checksum-validated BIP-39 phrase (12 or 24 lower-case English words)
#[derive(Clone)]
pub struct MnemonicPhrase {
    mnemonic: Mnemonic,
    word_count: usize,
}

impl MnemonicPhrase {
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Normalized phrase
    ///
    /// # Warning
    /// This is the wallet secret. Never log it.
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.mnemonic.to_string())
    }

    /// PBKDF2-HMAC-SHA512 seed (2048 rounds, salt "mnemonic" + passphrase)
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.mnemonic.to_seed(passphrase))
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPhrase")
            .field("word_count", &self.word_count)
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

/// Decoded 64-byte secret key: seed (0..32) followed by public key (32..64)
#[derive(Clone)]
pub struct SecretKeyBytes(Zeroizing<[u8; SECRET_KEY_LENGTH]>);

impl SecretKeyBytes {
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.0
    }

    /// The public key embedded in bytes 32..64
    pub fn embedded_public_key(&self) -> [u8; 32] {
        let mut public = [0u8; 32];
        public.copy_from_slice(&self.0[32..]);
        public
    }
}

impl fmt::Debug for SecretKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKeyBytes")
            .field("public_key", &bs58::encode(self.embedded_public_key()).into_string())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Classifies and validates raw user input
pub struct SecretParser;

impl SecretParser {
    /// Word count at which input is treated as a mnemonic candidate
    pub const MNEMONIC_THRESHOLD: usize = 12;

    /// Parse raw user text into a [`Secret`]. Pure, no side effects.
    pub fn parse(text: &str) -> Result<Secret, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }
        if text.starts_with('/') {
            return Err(ParseError::Command);
        }

        if text.split_whitespace().count() >= Self::MNEMONIC_THRESHOLD {
            Self::parse_mnemonic(text).map(Secret::Mnemonic)
        } else {
            Self::parse_private_key(text).map(Secret::PrivateKey)
        }
    }

    /// Validate a mnemonic candidate: 12 or 24 words, English wordlist, checksum
    pub fn parse_mnemonic(text: &str) -> Result<MnemonicPhrase, ParseError> {
        let lowered = Zeroizing::new(text.to_lowercase());
        let normalized = Zeroizing::new(lowered.split_whitespace().collect::<Vec<_>>().join(" "));
        let word_count = normalized.split(' ').count();

        if !matches!(word_count, 12 | 24) {
            return Err(ParseError::InvalidMnemonic(format!(
                "expected 12 or 24 words, got {}",
                word_count
            )));
        }

        let mnemonic =
            Mnemonic::parse_in_normalized(Language::English, &normalized).map_err(|e| match e {
                bip39::Error::UnknownWord(index) => ParseError::InvalidMnemonic(format!(
                    "word #{} is not in the BIP-39 wordlist",
                    index + 1
                )),
                bip39::Error::InvalidChecksum => {
                    ParseError::InvalidMnemonic("checksum mismatch".to_string())
                }
                other => ParseError::InvalidMnemonic(other.to_string()),
            })?;

        Ok(MnemonicPhrase {
            mnemonic,
            word_count,
        })
    }

    /// Decode a base58 private key candidate into the 64-byte layout
    pub fn parse_private_key(text: &str) -> Result<SecretKeyBytes, ParseError> {
        // base58 decoding is quadratic in input length
        if text.len() > MAX_ENCODED_SECRET_KEY_LENGTH {
            return Err(ParseError::InvalidEncoding(format!(
                "{} characters, a base58 secret key has at most {}",
                text.len(),
                MAX_ENCODED_SECRET_KEY_LENGTH
            )));
        }

        let decoded = Zeroizing::new(
            bs58::decode(text)
                .into_vec()
                .map_err(|e| ParseError::InvalidEncoding(e.to_string()))?,
        );

        if decoded.len() != SECRET_KEY_LENGTH {
            return Err(ParseError::InvalidEncoding(format!(
                "decoded {} bytes, expected {}",
                decoded.len(),
                SECRET_KEY_LENGTH
            )));
        }

        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        bytes.copy_from_slice(&decoded);
        Ok(SecretKeyBytes(bytes))
    }
}
