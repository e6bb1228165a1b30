//! Event-log reconciliation for the testament engine.
//!
//! Rebuilds the per-user outgoing and incoming transfer views by partitioning
//! the wills contract's creation log and joining each partition against live
//! contract state. Also scans the trust factory and per-instance trust logs.
//! Every pass is a stateless full rebuild; a failed pass surfaces its error
//! and the next tick starts over.

pub mod error;
pub mod event;
pub mod reconcile;
pub mod record;
pub mod trust;

pub use error::ReconcileError;
pub use event::{
    DepositEvent, TrustCreatedEvent, WillClaimedEvent, WillCreatedEvent, WithdrawalEvent,
};
pub use reconcile::{partition_events, ChainWillReader, LedgerReconciler, WillStateReader};
pub use record::{IncomingTransfer, OutgoingTransfer, ReconciledTransfers, WillRecord};
pub use trust::TrustLedger;
