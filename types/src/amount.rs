//! Token amount type.
//!
//! Amounts are fixed-point integers (u128) in the token's smallest unit to
//! avoid floating-point errors. The fee token uses 18 decimals, so one whole
//! token is 10^18 raw units; chain calls and event logs carry raw decimal
//! strings.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token amount in raw (smallest-unit) denomination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    /// Decimal places of the token.
    pub const DECIMALS: u32 = 18;

    /// Raw units per whole token (10^18).
    pub const RAW_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// A whole-token amount, scaled to raw units.
    pub fn from_whole(tokens: u64) -> Self {
        Self(tokens as u128 * Self::RAW_PER_TOKEN)
    }

    /// Parse a raw decimal string as returned by chain calls and event logs.
    pub fn from_raw_str(s: &str) -> Result<Self, TypeError> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| TypeError::InvalidAmount(s.to_string()))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

/// Renders in whole tokens with trailing zeros trimmed, e.g. `1`, `1.5`,
/// `0.000000000000000001`.
impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::RAW_PER_TOKEN;
        let frac = self.0 % Self::RAW_PER_TOKEN;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:018}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}
