//! Tracker failure modes.

use testament_chain::ChainError;
use testament_types::Network;
use thiserror::Error;

/// Errors from the explorer status lookup.
#[derive(Debug, Error)]
pub enum StatusError {
    /// No endpoint is configured for the network. A configuration problem;
    /// polling would never resolve.
    #[error("no status endpoint configured for network {0}")]
    NoEndpoint(Network),

    #[error("status endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("status request failed: {0}")]
    RequestFailed(String),

    #[error("malformed status response: {0}")]
    InvalidResponse(String),
}

impl StatusError {
    /// Whether polling again can ever produce a different answer.
    pub fn is_transient(&self) -> bool {
        !matches!(self, StatusError::NoEndpoint(_))
    }
}

/// Errors from submitting or confirming a transaction.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Submission failures are permanent: estimation failed, the signer
    /// rejected, or the parameters were invalid. Never retried.
    #[error("submission failed: {0}")]
    Submission(#[from] ChainError),

    #[error("confirmation polling cancelled")]
    Cancelled,

    /// Only bounded policies produce this; the production policy polls until
    /// cancelled.
    #[error("no terminal status after {0} polls")]
    PollsExhausted(u32),

    #[error(transparent)]
    Status(StatusError),
}
