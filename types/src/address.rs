//! Account and contract address type, `0x`-prefixed hex.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte chain address, always prefixed with `0x`.
///
/// Wallet providers report addresses in mixed-case checksum form while event
/// logs may carry them lowercased; the reconciler partitions by address
/// equality, so the raw string is normalized to lowercase on construction and
/// equality is byte equality afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all chain addresses.
    pub const PREFIX: &'static str = "0x";

    /// Hex digits in an encoded address (20 bytes).
    pub const HEX_LEN: usize = 40;

    /// Parse and normalize an address string.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let hex_part = raw
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypeError::InvalidAddress(format!("missing 0x prefix: {raw}")))?;
        if hex_part.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidAddress(format!(
                "expected {} hex digits, got {}",
                Self::HEX_LEN,
                hex_part.len()
            )));
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidAddress(format!(
                "non-hex character in {raw}"
            )));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Return the normalized (lowercase) address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
