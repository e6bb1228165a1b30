//! Fundamental types for the testament engine.
//!
//! This crate defines the core value types shared across every other crate in
//! the workspace: addresses, transaction hashes, token amounts, block
//! heights, network identifiers and will ids.

pub mod address;
pub mod amount;
pub mod block;
pub mod error;
pub mod hash;
pub mod network;
pub mod will;

pub use address::Address;
pub use amount::TokenAmount;
pub use block::BlockNumber;
pub use error::TypeError;
pub use hash::TxHash;
pub use network::Network;
pub use will::WillId;
