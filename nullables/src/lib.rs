//! Nullable infrastructure for deterministic testing.
//!
//! The engine's two external collaborators — the wallet provider's chain
//! client and the explorer status endpoint — are abstracted behind traits.
//! This crate provides scripted implementations that return deterministic
//! values, record what the engine asked of them, and never touch the
//! network.
//!
//! Usage: swap the real implementations for nullables in tests.

pub mod chain;
pub mod status;

pub use chain::{NullChainClient, SentCall};
pub use status::NullStatusLookup;
