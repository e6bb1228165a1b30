//! Chain client failure modes.

use testament_types::TypeError;
use thiserror::Error;

/// Errors crossing the chain client boundary.
///
/// `NotReady` is the transient "provider not injected yet" case the bootstrap
/// loops retry on; everything else is either a permanent submission failure
/// or a malformed response and propagates to the caller.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain client not ready: {0}")]
    NotReady(String),

    #[error("rpc failure: {0}")]
    Rpc(String),

    #[error("signer rejected the transaction: {0}")]
    Rejected(String),

    #[error("gas estimation failed: {0}")]
    GasEstimation(String),

    #[error("malformed chain response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Type(#[from] TypeError),
}
