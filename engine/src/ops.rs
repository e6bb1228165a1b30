//! User-facing contract operations.
//!
//! Every operation reads the submitting account and the active network from
//! the latest published [`SessionView`], binds the target contract on that
//! network, and drives the transaction to a terminal status through the
//! tracker. The `bool` results mirror the on-chain receipt: `true` for a
//! successful transaction, `false` for a reverted one.

use crate::error::EngineError;
use crate::metrics::EngineMetrics;
use crate::view::SessionView;
use std::sync::Arc;
use testament_chain::{CallParam, ChainClient, ChainError};
use testament_contracts::{bind, ContractName};
use testament_session::UserSession;
use testament_tracker::{CancelToken, ContractCall, TransactionTracker};
use testament_types::{Address, Network, TokenAmount, WillId};
use tokio::sync::watch;

/// Operations available once a session holds an active account.
#[derive(Clone)]
pub struct EngineOps {
    chain: Arc<dyn ChainClient>,
    tracker: Arc<TransactionTracker>,
    session: Arc<UserSession>,
    metrics: Arc<EngineMetrics>,
    view: watch::Receiver<SessionView>,
}

impl EngineOps {
    pub(crate) fn new(
        chain: Arc<dyn ChainClient>,
        tracker: Arc<TransactionTracker>,
        session: Arc<UserSession>,
        metrics: Arc<EngineMetrics>,
        view: watch::Receiver<SessionView>,
    ) -> Self {
        Self {
            chain,
            tracker,
            session,
            metrics,
            view,
        }
    }

    /// Create a will transferring `amount` to `recipient`, maturing
    /// `period` blocks after each verification.
    pub async fn create_will(
        &self,
        recipient: &Address,
        amount: TokenAmount,
        period: u64,
        revokable: bool,
        cancel: &CancelToken,
    ) -> Result<bool, EngineError> {
        let (from, network) = self.active()?;
        let binding = bind(ContractName::Wills, network, None)?;
        let call = ContractCall {
            binding,
            method: "createWill",
            params: vec![
                CallParam::Address(recipient.clone()),
                CallParam::Uint(u128::from(period)),
                CallParam::Bool(revokable),
            ],
            from,
            value: Some(amount),
            network,
        };
        self.track(&call, cancel).await
    }

    /// Prove the creator is still active, pushing the will's maturity
    /// another period out.
    pub async fn verify_will(
        &self,
        id: &WillId,
        cancel: &CancelToken,
    ) -> Result<bool, EngineError> {
        self.wills_call("verifyWill", id, cancel).await
    }

    /// Claim a matured will as its recipient.
    pub async fn claim_will(&self, id: &WillId, cancel: &CancelToken) -> Result<bool, EngineError> {
        self.wills_call("claimWill", id, cancel).await
    }

    async fn wills_call(
        &self,
        method: &'static str,
        id: &WillId,
        cancel: &CancelToken,
    ) -> Result<bool, EngineError> {
        let (from, network) = self.active()?;
        let binding = bind(ContractName::Wills, network, None)?;
        let call = ContractCall {
            binding,
            method,
            params: vec![CallParam::Bytes(id.to_log_bytes()?)],
            from,
            value: None,
            network,
        };
        self.track(&call, cancel).await
    }

    /// Approve the fee burner for the required allowance.
    pub async fn request_approval(&self, cancel: &CancelToken) -> Result<bool, EngineError> {
        let (from, network) = self.active()?;
        let confirmed = self
            .session
            .request_authorization(&from, network, cancel)
            .await?;
        self.metrics.transactions_submitted.inc();
        self.count_outcome(confirmed);
        Ok(confirmed)
    }

    /// Deploy a trust holding `amount` for `beneficiary`, withdrawable
    /// after `deadline` blocks.
    pub async fn create_trust(
        &self,
        beneficiary: &Address,
        amount: TokenAmount,
        revokable: bool,
        deadline: u64,
        cancel: &CancelToken,
    ) -> Result<bool, EngineError> {
        let (from, network) = self.active()?;
        let binding = bind(ContractName::TrustFactory, network, None)?;
        let call = ContractCall {
            binding,
            method: "deployTrust",
            params: vec![
                CallParam::Address(beneficiary.clone()),
                CallParam::Bool(revokable),
                CallParam::Uint(u128::from(deadline)),
            ],
            from,
            value: Some(amount),
            network,
        };
        self.track(&call, cancel).await
    }

    /// Withdraw from a deployed trust instance.
    pub async fn withdraw_trust(
        &self,
        instance: &Address,
        cancel: &CancelToken,
    ) -> Result<bool, EngineError> {
        let (from, network) = self.active()?;
        let binding = bind(ContractName::Trust, network, Some(instance))?;
        let call = ContractCall {
            binding,
            method: "withdraw",
            params: vec![],
            from,
            value: None,
            network,
        };
        self.track(&call, cancel).await
    }

    /// Whether a trust instance has reached its expiration and can be
    /// withdrawn from.
    pub async fn trust_withdrawable(&self, instance: &Address) -> Result<bool, EngineError> {
        let (_, network) = self.active()?;
        let binding = bind(ContractName::Trust, network, Some(instance))?;
        let raw = self
            .chain
            .call(&binding, "blocksUntilExpiration", &[])
            .await?;
        let remaining = parse_uint(&raw, "blocksUntilExpiration")?;
        Ok(remaining == 0)
    }

    /// Submit, count the submission, and poll to the terminal outcome.
    async fn track(&self, call: &ContractCall, cancel: &CancelToken) -> Result<bool, EngineError> {
        let mut ticket = self.tracker.submit(call).await?;
        self.metrics.transactions_submitted.inc();
        let confirmed = self.tracker.await_confirmation(&mut ticket, cancel).await?;
        self.count_outcome(confirmed);
        Ok(confirmed)
    }

    fn count_outcome(&self, confirmed: bool) {
        if confirmed {
            self.metrics.transactions_confirmed.inc();
        } else {
            self.metrics.transactions_failed.inc();
        }
    }

    fn active(&self) -> Result<(Address, Network), EngineError> {
        let view = self.view.borrow();
        let account = view
            .account
            .as_ref()
            .ok_or(EngineError::NotReady("no active account"))?;
        Ok((account.address.clone(), view.network))
    }
}

fn parse_uint(raw: &serde_json::Value, method: &'static str) -> Result<u128, EngineError> {
    if let Some(s) = raw.as_str() {
        return s.parse::<u128>().map_err(|_| {
            EngineError::Chain(ChainError::InvalidResponse(format!("{method}: {s:?}")))
        });
    }
    if let Some(n) = raw.as_u64() {
        return Ok(u128::from(n));
    }
    Err(EngineError::Chain(ChainError::InvalidResponse(format!(
        "{method}: unexpected result shape"
    ))))
}
