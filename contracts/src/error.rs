//! Binding lookup errors.

use crate::registry::ContractName;
use testament_types::{Network, TypeError};
use thiserror::Error;

/// Errors from resolving a logical contract to an on-chain binding.
///
/// These are configuration errors: the caller asked for a contract that does
/// not exist on the given network. They are never retried.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("no {name} binding for network {network}")]
    MissingBinding { name: ContractName, network: Network },

    #[error(transparent)]
    Type(#[from] TypeError),
}
