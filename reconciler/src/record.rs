//! Per-user transfer views.
//!
//! Core fields come verbatim from a creation event; derived fields come from
//! joining the event against live contract state at read time, so two passes
//! over the same logs can disagree once the chain has moved.

use crate::event::WillCreatedEvent;
use serde::{Deserialize, Serialize};
use testament_types::{Address, BlockNumber, TokenAmount, TxHash, WillId};

/// Live state of one will, read off the contract at reconcile time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WillRecord {
    pub current_owner: Address,
    pub maturity_block: BlockNumber,
}

/// A transfer the active address created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingTransfer {
    pub id: WillId,
    pub recipient: Address,
    pub amount: TokenAmount,
    pub transaction_hash: TxHash,
    pub maturity_block: BlockNumber,
    /// Blocks left until maturity; negative once the chain head has passed
    /// the maturity block.
    pub maturity_offset: i64,
}

impl OutgoingTransfer {
    pub fn derive(
        event: &WillCreatedEvent,
        record: &WillRecord,
        current_block: BlockNumber,
    ) -> Self {
        Self {
            id: event.id.clone(),
            recipient: event.recipient.clone(),
            amount: event.amount,
            transaction_hash: event.transaction_hash.clone(),
            maturity_block: record.maturity_block,
            maturity_offset: record.maturity_block.offset_from(current_block),
        }
    }
}

/// A transfer naming the active address as recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingTransfer {
    pub id: WillId,
    pub creator: Address,
    pub amount: TokenAmount,
    pub transaction_hash: TxHash,
    pub maturity_block: BlockNumber,
    /// The maturity block has passed. Strict: a transfer maturing at the
    /// current head is not yet withdrawable.
    pub withdrawable: bool,
    /// Ownership heuristic: the contract reassigns ownership on claim, so a
    /// current owner other than the original creator reads as claimed. Any
    /// other reassignment the contract might ever perform would read the
    /// same way.
    pub claimed: bool,
}

impl IncomingTransfer {
    pub fn derive(
        event: &WillCreatedEvent,
        record: &WillRecord,
        current_block: BlockNumber,
    ) -> Self {
        Self {
            id: event.id.clone(),
            creator: event.creator.clone(),
            amount: event.amount,
            transaction_hash: event.transaction_hash.clone(),
            maturity_block: record.maturity_block,
            withdrawable: record.maturity_block < current_block,
            claimed: record.current_owner != event.creator,
        }
    }
}

/// Both views of one reconciliation pass, rebuilt wholesale every pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledTransfers {
    pub outgoing: Vec<OutgoingTransfer>,
    pub incoming: Vec<IncomingTransfer>,
}
