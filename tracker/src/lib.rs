//! Transaction lifecycle tracking for the testament engine.
//!
//! Covers the submission path (gas estimation, pricing, send) and the
//! confirmation path (explorer polling with fixed-delay retry), plus the
//! retry policy and cancellation primitives shared by every loop in the
//! workspace.

pub mod cancel;
pub mod error;
pub mod retry;
pub mod status;
pub mod tracker;

pub use cancel::{CancelSource, CancelToken};
pub use error::{StatusError, TrackerError};
pub use retry::{RetryError, RetryPolicy, DEFAULT_DELAY};
pub use status::{ExplorerStatusClient, StatusLookup, TxStatus};
pub use tracker::{ContractCall, TicketStatus, TransactionTicket, TransactionTracker};
