//! Session failure modes.

use testament_chain::ChainError;
use testament_contracts::ContractError;
use testament_tracker::TrackerError;
use testament_types::TypeError;
use thiserror::Error;

/// Errors from account refresh and authorization calls.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The wallet reported no accounts. Transient while the provider is
    /// still connecting; the bootstrap loop retries it.
    #[error("wallet has no accounts")]
    NoAccount,

    #[error("malformed `{method}` response")]
    MalformedValue { method: &'static str },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}
