//! Trust-contract log queries.
//!
//! Trusts are per-instance contracts deployed through a factory, so the
//! factory's creation log is scanned with the network-default binding while
//! withdrawal and deposit logs are scanned per instance with an address
//! override.

use crate::error::ReconcileError;
use crate::event::{DepositEvent, TrustCreatedEvent, WithdrawalEvent};
use std::sync::Arc;
use testament_chain::{ChainClient, LogRange};
use testament_contracts::{bind, log_floor, ContractName};
use testament_types::{Address, Network};

/// Queries the trust factory and individual trust instances.
pub struct TrustLedger {
    chain: Arc<dyn ChainClient>,
}

impl TrustLedger {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// All trusts deployed through the factory on this network.
    ///
    /// The factory went live later than the wills contract, so it has its
    /// own scan floor.
    pub async fn list_trust_events(
        &self,
        network: Network,
    ) -> Result<Vec<TrustCreatedEvent>, ReconcileError> {
        let binding = bind(ContractName::TrustFactory, network, None)?;
        let range = LogRange::from_floor(log_floor(ContractName::TrustFactory, network));
        let entries = self
            .chain
            .past_events(&binding, "LogNewTrust", range)
            .await?;
        entries.iter().map(TrustCreatedEvent::from_log).collect()
    }

    /// Withdrawals recorded by one trust instance.
    pub async fn list_withdrawals(
        &self,
        trust_address: &Address,
        network: Network,
    ) -> Result<Vec<WithdrawalEvent>, ReconcileError> {
        let binding = bind(ContractName::Trust, network, Some(trust_address))?;
        let range = LogRange::from_floor(log_floor(ContractName::Trust, network));
        let entries = self
            .chain
            .past_events(&binding, "LogWithdraw", range)
            .await?;
        entries.iter().map(WithdrawalEvent::from_log).collect()
    }

    /// Deposits recorded by one trust instance.
    pub async fn list_deposits(
        &self,
        trust_address: &Address,
        network: Network,
    ) -> Result<Vec<DepositEvent>, ReconcileError> {
        let binding = bind(ContractName::Trust, network, Some(trust_address))?;
        let range = LogRange::from_floor(log_floor(ContractName::Trust, network));
        let entries = self.chain.past_events(&binding, "LogDeposit", range).await?;
        entries.iter().map(DepositEvent::from_log).collect()
    }
}
