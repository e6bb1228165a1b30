//! Contract bindings for the testament engine.
//!
//! Maps logical contract names to the ABI + address pair deployed on each
//! network, plus the per-network block floors below which event logs are
//! never scanned.

pub mod abi;
pub mod error;
pub mod registry;

pub use error::ContractError;
pub use registry::{bind, log_floor, ContractBinding, ContractName};
