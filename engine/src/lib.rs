//! Testament session engine — orchestrates the full session lifecycle.
//!
//! The engine is the top-level coordinator that:
//! - Resolves the active network and binds the deployed contracts
//! - Bootstraps account state, block height and the allowance gate
//! - Reconciles on-chain transfer history into a published session view
//! - Refreshes account state and history at fixed cadences
//! - Exposes the user operations (wills, trusts, fee approval)
//! - Tears every task down on stop
//!
//! Embedders build a [`TestamentEngine`] over a chain client, call
//! [`TestamentEngine::start`], and observe the session through the
//! [`EngineHandle`]'s watch channel.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod ops;
pub mod view;

pub use config::EngineConfig;
pub use engine::{EngineHandle, TestamentEngine};
pub use error::EngineError;
pub use logging::{init_logging, init_logging_from_config, LogFormat};
pub use metrics::EngineMetrics;
pub use ops::EngineOps;
pub use view::{BootstrapPhase, LoadingFlags, SessionView};
