//! Transaction hash type, `0x`-prefixed hex.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte transaction hash as reported by the chain client.
///
/// Kept in string form because it is only ever passed through: into the
/// explorer status URL and back out to the caller. Normalized to lowercase so
/// hashes compare reliably across sources.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(String);

impl TxHash {
    /// Hex digits in an encoded hash (32 bytes).
    pub const HEX_LEN: usize = 64;

    /// Parse and normalize a transaction hash string.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let hex_part = raw
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidTxHash(format!("missing 0x prefix: {raw}")))?;
        if hex_part.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidTxHash(format!(
                "expected {} hex digits, got {}",
                Self::HEX_LEN,
                hex_part.len()
            )));
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidTxHash(format!("non-hex character in {raw}")));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TxHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
