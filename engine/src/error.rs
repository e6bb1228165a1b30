//! Engine failure modes.

use testament_chain::ChainError;
use testament_contracts::ContractError;
use testament_reconciler::ReconcileError;
use testament_session::SessionError;
use testament_tracker::{RetryError, TrackerError};
use testament_types::TypeError;
use thiserror::Error;

/// Errors surfaced by the orchestration layer and the user operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    /// An operation needs session state that bootstrap has not produced
    /// yet, e.g. submitting before an account is resolved.
    #[error("engine not ready: {0}")]
    NotReady(&'static str),

    #[error("session teardown cancelled the operation")]
    Cancelled,

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<RetryError<ChainError>> for EngineError {
    fn from(err: RetryError<ChainError>) -> Self {
        match err {
            RetryError::Cancelled => EngineError::Cancelled,
            RetryError::Exhausted { source, .. } => EngineError::Chain(source),
        }
    }
}

impl From<RetryError<SessionError>> for EngineError {
    fn from(err: RetryError<SessionError>) -> Self {
        match err {
            RetryError::Cancelled => EngineError::Cancelled,
            RetryError::Exhausted { source, .. } => EngineError::Session(source),
        }
    }
}

impl From<RetryError<ReconcileError>> for EngineError {
    fn from(err: RetryError<ReconcileError>) -> Self {
        match err {
            RetryError::Cancelled => EngineError::Cancelled,
            RetryError::Exhausted { source, .. } => EngineError::Reconcile(source),
        }
    }
}
