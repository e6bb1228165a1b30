//! Block height type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A chain block height.
///
/// Maturity comparisons are done on heights, and the outgoing-transfer view
/// carries a signed distance to maturity, so the type exposes a signed
/// difference rather than letting callers subtract unsigned values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub const ZERO: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Signed distance from `other` to `self` (`self - other`).
    ///
    /// Negative once `other` has moved past `self`, e.g. a maturity height
    /// already reached by the chain head.
    pub fn offset_from(&self, other: BlockNumber) -> i64 {
        self.0 as i64 - other.0 as i64
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(height: u64) -> Self {
        Self(height)
    }
}
