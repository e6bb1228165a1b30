//! Will identifier type.
//!
//! The wills contract keys each transfer by a `bytes32` value. User-chosen
//! ids are short ASCII strings right-padded with NUL bytes on chain, so the
//! identifier crosses the boundary twice: decoded from hex when read out of
//! an event log, re-encoded when passed back into a contract call.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum encodable id length in bytes (the contract field is `bytes32`).
const MAX_ID_BYTES: usize = 32;

/// A user-chosen will identifier in its decoded ASCII form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WillId(String);

impl WillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Decode a `bytes32` hex value from an event log.
    ///
    /// Trailing NUL padding is stripped; the remaining bytes must be UTF-8.
    pub fn from_log_bytes(raw: &str) -> Result<Self, TypeError> {
        let hex_part = raw
            .strip_prefix("0x")
            .ok_or_else(|| TypeError::InvalidWillId(format!("missing 0x prefix: {raw}")))?;
        let bytes = hex::decode(hex_part)
            .map_err(|e| TypeError::InvalidWillId(format!("{raw}: {e}")))?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let id = String::from_utf8(bytes[..end].to_vec())
            .map_err(|_| TypeError::InvalidWillId(format!("non-UTF-8 id: {raw}")))?;
        Ok(Self(id))
    }

    /// Encode back to the `bytes32` hex form expected by contract calls.
    pub fn to_log_bytes(&self) -> Result<String, TypeError> {
        let bytes = self.0.as_bytes();
        if bytes.len() > MAX_ID_BYTES {
            return Err(TypeError::InvalidWillId(format!(
                "id longer than {MAX_ID_BYTES} bytes: {}",
                self.0
            )));
        }
        let mut encoded = hex::encode(bytes);
        encoded.push_str(&"00".repeat(MAX_ID_BYTES - bytes.len()));
        Ok(format!("0x{encoded}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_padded_log_bytes() {
        let raw = format!("0x{}{}", hex::encode("w1"), "00".repeat(30));
        let id = WillId::from_log_bytes(&raw).unwrap();
        assert_eq!(id.as_str(), "w1");
    }

    #[test]
    fn encode_decode_round_trip() {
        let id = WillId::new("family-house");
        let encoded = id.to_log_bytes().unwrap();
        assert_eq!(encoded.len(), 2 + 64);
        assert_eq!(WillId::from_log_bytes(&encoded).unwrap(), id);
    }

    #[test]
    fn rejects_oversize_ids() {
        let id = WillId::new("x".repeat(33));
        assert!(id.to_log_bytes().is_err());
    }

    #[test]
    fn rejects_undecodable_bytes() {
        assert!(WillId::from_log_bytes("4142").is_err());
        assert!(WillId::from_log_bytes("0xzz").is_err());
        assert!(WillId::from_log_bytes("0xff00").is_err());
    }
}
