//! Transaction submission and confirmation tracking.
//!
//! Submission is a strict three-step sequence against the chain client:
//! estimate gas, fetch the current gas price, send. Any failure there is
//! permanent and propagates untouched. Confirmation is the opposite regime:
//! the explorer is polled at a fixed cadence and every ambiguous answer,
//! including transport errors, just means "ask again". On a public chain a
//! slow transaction is indistinguishable from a doomed one; only the
//! indexer's committed answer is terminal.

use crate::cancel::CancelToken;
use crate::error::{StatusError, TrackerError};
use crate::retry::RetryPolicy;
use crate::status::{StatusLookup, TxStatus};
use std::sync::Arc;
use testament_chain::{CallParam, ChainClient, SendOptions};
use testament_contracts::ContractBinding;
use testament_types::{Address, Network, TokenAmount, TxHash};

/// A state-changing contract call ready for submission.
#[derive(Clone, Debug)]
pub struct ContractCall {
    pub binding: ContractBinding,
    pub method: &'static str,
    pub params: Vec<CallParam>,
    pub from: Address,
    /// Native value for payable methods.
    pub value: Option<TokenAmount>,
    pub network: Network,
}

/// Lifecycle state of one submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketStatus {
    Pending,
    Confirmed,
    Failed,
}

/// One submitted transaction, from hash to terminal outcome.
///
/// A ticket transitions out of `Pending` exactly once and is never reused
/// for a different hash; re-awaiting a terminal ticket returns the recorded
/// outcome without touching the explorer.
#[derive(Clone, Debug)]
pub struct TransactionTicket {
    hash: TxHash,
    network: Network,
    status: TicketStatus,
}

impl TransactionTicket {
    fn pending(hash: TxHash, network: Network) -> Self {
        Self {
            hash,
            network,
            status: TicketStatus::Pending,
        }
    }

    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }
}

/// Submits state-changing calls and tracks them to confirmation.
pub struct TransactionTracker {
    chain: Arc<dyn ChainClient>,
    status: Arc<dyn StatusLookup>,
    policy: RetryPolicy,
}

impl TransactionTracker {
    pub fn new(chain: Arc<dyn ChainClient>, status: Arc<dyn StatusLookup>) -> Self {
        Self {
            chain,
            status,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the polling schedule. Tests bound it; production keeps the
    /// unbounded default.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Estimate gas, fetch the gas price and send the call.
    ///
    /// Returns a pending ticket for the resulting hash. Failures are
    /// permanent and are not retried here.
    pub async fn submit(&self, call: &ContractCall) -> Result<TransactionTicket, TrackerError> {
        let mut opts = SendOptions::from_account(call.from.clone());
        if let Some(value) = call.value {
            opts = opts.with_value(value);
        }

        let gas = self
            .chain
            .estimate_gas(&call.binding, call.method, &call.params, &opts)
            .await?;
        let gas_price = self.chain.gas_price().await?;
        let opts = opts.with_gas(gas).with_gas_price(gas_price);

        let hash = self
            .chain
            .send(&call.binding, call.method, &call.params, &opts)
            .await?;
        tracing::info!(
            contract = %call.binding.name,
            method = call.method,
            hash = %hash,
            gas,
            "transaction submitted"
        );
        Ok(TransactionTicket::pending(hash, call.network))
    }

    /// Poll the explorer until the ticket reaches a terminal status.
    ///
    /// Resolves `true` on the first "success" answer and `false` on the first
    /// "failure". Ambiguous answers and transient lookup errors schedule
    /// another poll after the policy delay; under the production policy this
    /// continues until cancellation.
    pub async fn await_confirmation(
        &self,
        ticket: &mut TransactionTicket,
        cancel: &CancelToken,
    ) -> Result<bool, TrackerError> {
        match ticket.status {
            TicketStatus::Confirmed => return Ok(true),
            TicketStatus::Failed => return Ok(false),
            TicketStatus::Pending => {}
        }

        let mut cancel = cancel.clone();
        let mut polls = 0u32;
        loop {
            if cancel.is_cancelled() {
                return Err(TrackerError::Cancelled);
            }

            let status = match self
                .status
                .transaction_status(&ticket.hash, ticket.network)
                .await
            {
                Ok(status) => status,
                Err(err @ StatusError::NoEndpoint(_)) => {
                    return Err(TrackerError::Status(err));
                }
                Err(err) => {
                    tracing::debug!(hash = %ticket.hash, error = %err, "status lookup failed, will poll again");
                    TxStatus::Unknown
                }
            };

            match status {
                TxStatus::Success => {
                    ticket.status = TicketStatus::Confirmed;
                    tracing::info!(hash = %ticket.hash, polls, "transaction confirmed");
                    return Ok(true);
                }
                TxStatus::Failure => {
                    ticket.status = TicketStatus::Failed;
                    tracing::warn!(hash = %ticket.hash, polls, "transaction failed on chain");
                    return Ok(false);
                }
                TxStatus::Unknown => {
                    polls += 1;
                    if self.policy.exhausted(polls) {
                        return Err(TrackerError::PollsExhausted(polls));
                    }
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(TrackerError::Cancelled),
                        _ = tokio::time::sleep(self.policy.delay()) => {}
                    }
                }
            }
        }
    }

    /// Submit and poll to the terminal outcome in one step. The common path
    /// for user-facing operations.
    pub async fn submit_and_confirm(
        &self,
        call: &ContractCall,
        cancel: &CancelToken,
    ) -> Result<bool, TrackerError> {
        let mut ticket = self.submit(call).await?;
        self.await_confirmation(&mut ticket, cancel).await
    }
}
