//! Shared value types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Decimal places between lamports and SOL
const SOL_DECIMALS: u32 = 9;

/// Opaque identifier of the user owning a session (chat id, API caller, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for UserId {
    fn from(chat_id: i64) -> Self {
        Self(chat_id.to_string())
    }
}

/// Balance in the smallest indivisible unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lamports(pub u64);

impl Lamports {
    /// Exact display value in SOL (lamports / 10^9)
    pub fn to_sol(self) -> Decimal {
        Decimal::from_i128_with_scale(self.0 as i128, SOL_DECIMALS).normalize()
    }
}

impl fmt::Display for Lamports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SOL", self.to_sol())
    }
}
