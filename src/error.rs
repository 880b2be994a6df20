//! Error taxonomy for wallet import and balance queries
//!
//! Every failure the core can produce is one of the enums below. Each maps
//! to a distinct [`ErrorKind`] and a user-facing message so the transport
//! layer can render a specific reply instead of a generic one.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable, serializable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    CommandInput,
    InvalidMnemonic,
    InvalidEncoding,
    MalformedKey,
    NetworkError,
    Cancelled,
    NoSessionFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::CommandInput => "command_input",
            ErrorKind::InvalidMnemonic => "invalid_mnemonic",
            ErrorKind::InvalidEncoding => "invalid_encoding",
            ErrorKind::MalformedKey => "malformed_key",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::NoSessionFound => "no_session_found",
        };
        f.write_str(name)
    }
}

/// Raw user text could not be turned into a [`crate::wallet::Secret`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,

    #[error("input looks like a command")]
    Command,

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("invalid base58 private key: {0}")]
    InvalidEncoding(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Empty => ErrorKind::EmptyInput,
            ParseError::Command => ErrorKind::CommandInput,
            ParseError::InvalidMnemonic(_) => ErrorKind::InvalidMnemonic,
            ParseError::InvalidEncoding(_) => ErrorKind::InvalidEncoding,
        }
    }
}

/// A validated secret could not be turned into a keypair
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeriveError {
    #[error("malformed secret key: {0}")]
    MalformedKey(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),
}

impl DeriveError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedKey
    }
}

/// Any failure of a single import attempt. Never mutates session state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Derive(#[from] DeriveError),
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::Parse(e) => e.kind(),
            ImportError::Derive(e) => e.kind(),
        }
    }

    /// Human-readable message for the chat/HTTP reply
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::EmptyInput => {
                "Please send your seed phrase (12/24 words) or base58 private key.".to_string()
            }
            ErrorKind::CommandInput => "Commands cannot be imported as a wallet.".to_string(),
            ErrorKind::InvalidMnemonic => {
                "Invalid seed phrase. Please check the words and try again.".to_string()
            }
            ErrorKind::InvalidEncoding => {
                "Invalid private key. Expected a base58 encoded 64-byte secret key.".to_string()
            }
            ErrorKind::MalformedKey => {
                "Private key is malformed: expected 64 bytes whose second half is the public key of the first."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Failure talking to one network endpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("query task failed: {0}")]
    Task(String),
}

impl NetworkError {
    /// Classify a reqwest transport error
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Http("request timed out".to_string())
        } else if err.is_connect() {
            NetworkError::Http("connection failed".to_string())
        } else if let Some(status) = err.status() {
            NetworkError::Status(status.as_u16())
        } else if err.is_decode() {
            NetworkError::Decode(err.to_string())
        } else {
            NetworkError::Http(err.to_string())
        }
    }
}

/// Terminal failure of one endpoint inside a balance report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("query cancelled before completion")]
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::NetworkError,
            FetchError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(e) => format!("Error fetching balance: {}", e),
            FetchError::Cancelled => "Balance query timed out or was cancelled.".to_string(),
        }
    }
}

/// Request-level failure of a balance request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BalanceError {
    #[error("no wallet imported for this user")]
    NoSessionFound,
}

impl BalanceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::NoSessionFound
    }

    pub fn user_message(&self) -> String {
        "No wallet found! Please import a seed phrase or private key first.".to_string()
    }
}
