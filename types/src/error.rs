//! Top-level error type for value parsing and validation.

use thiserror::Error;

/// Errors from constructing or decoding the fundamental types.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),

    #[error("invalid will id: {0}")]
    InvalidWillId(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}
