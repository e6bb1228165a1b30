//! Chain client boundary for the testament engine.
//!
//! Defines the object-safe async trait the rest of the workspace programs
//! against, plus the small request/response types that cross it. Concrete
//! implementations live with the embedding application; the test double
//! lives in `testament-nullables`.

pub mod client;
pub mod error;

pub use client::{BlockTag, CallParam, ChainClient, LogEntry, LogRange, SendOptions};
pub use error::ChainError;
