//! Reconciliation failure modes.

use testament_chain::ChainError;
use testament_contracts::ContractError;
use testament_types::{TypeError, WillId};
use thiserror::Error;

/// Errors from decoding event logs or joining them against chain state.
///
/// Log decoding is strict: a malformed entry fails the whole pass rather
/// than silently dropping a transfer from the user's view. The next
/// scheduled pass re-runs from scratch.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("log entry for {event} is missing field `{field}`")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },

    #[error("log entry for {event} has a malformed `{field}` field")]
    InvalidField {
        event: &'static str,
        field: &'static str,
    },

    #[error("will record for `{id}` is malformed: {reason}")]
    MalformedRecord { id: WillId, reason: &'static str },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Contract(#[from] ContractError),
}
