//! Account refresh and fee-token authorization.
//!
//! Spending operations burn a platform fee, which the user pre-authorizes by
//! approving a fixed allowance to the burner contract. The session resolves
//! the wallet account, reads balances and the current allowance, and submits
//! the approval; cadence and retry behavior belong to the driving loop.

use crate::account::Account;
use crate::error::SessionError;
use std::sync::Arc;
use testament_chain::{CallParam, ChainClient};
use testament_contracts::{bind, ContractName};
use testament_tracker::{CancelToken, ContractCall, TransactionTracker};
use testament_types::{Address, Network, TokenAmount};

/// Whole fee tokens the burner must be approved for before spending
/// operations are allowed.
pub const REQUIRED_ALLOWANCE_TOKENS: u64 = 250;

/// The required burner allowance in raw token units.
pub fn required_allowance() -> TokenAmount {
    TokenAmount::from_whole(REQUIRED_ALLOWANCE_TOKENS)
}

/// Reads and maintains the user-facing side of a wallet session.
pub struct UserSession {
    chain: Arc<dyn ChainClient>,
    tracker: Arc<TransactionTracker>,
}

impl UserSession {
    pub fn new(chain: Arc<dyn ChainClient>, tracker: Arc<TransactionTracker>) -> Self {
        Self { chain, tracker }
    }

    /// Resolve the primary wallet account and both of its balances.
    ///
    /// An empty account list is an error; the wallet may simply not be
    /// connected yet, so bootstrap treats it as retryable.
    pub async fn refresh_account(&self, network: Network) -> Result<Account, SessionError> {
        let accounts = self.chain.accounts().await?;
        let address = accounts.into_iter().next().ok_or(SessionError::NoAccount)?;
        let native_balance = self.chain.native_balance(&address).await?;

        let token = bind(ContractName::MyBitToken, network, None)?;
        let raw = self
            .chain
            .call(&token, "balanceOf", &[CallParam::Address(address.clone())])
            .await?;
        let token_balance = parse_amount(&raw, "balanceOf")?;

        tracing::debug!(
            address = %address,
            native = %native_balance,
            tokens = %token_balance,
            "account refreshed"
        );
        Ok(Account {
            address,
            native_balance,
            token_balance,
        })
    }

    /// Whether the burner's current allowance from `address` meets the
    /// required amount.
    pub async fn check_authorization(
        &self,
        address: &Address,
        network: Network,
    ) -> Result<bool, SessionError> {
        let token = bind(ContractName::MyBitToken, network, None)?;
        let burner = bind(ContractName::MyBitBurner, network, None)?;
        let raw = self
            .chain
            .call(
                &token,
                "allowance",
                &[
                    CallParam::Address(address.clone()),
                    CallParam::Address(burner.address.clone()),
                ],
            )
            .await?;
        let allowance = parse_amount(&raw, "allowance")?;
        Ok(allowance >= required_allowance())
    }

    /// Approve the burner for exactly the required allowance and wait for
    /// the approval to reach a terminal status.
    pub async fn request_authorization(
        &self,
        address: &Address,
        network: Network,
        cancel: &CancelToken,
    ) -> Result<bool, SessionError> {
        let token = bind(ContractName::MyBitToken, network, None)?;
        let burner = bind(ContractName::MyBitBurner, network, None)?;
        let call = ContractCall {
            binding: token,
            method: "approve",
            params: vec![
                CallParam::Address(burner.address.clone()),
                CallParam::Uint(required_allowance().raw()),
            ],
            from: address.clone(),
            value: None,
            network,
        };
        let confirmed = self.tracker.submit_and_confirm(&call, cancel).await?;
        tracing::info!(owner = %address, confirmed, "burner allowance approval settled");
        Ok(confirmed)
    }
}

/// Uint results decode as decimal strings; small fixtures may use plain
/// numbers.
fn parse_amount(raw: &serde_json::Value, method: &'static str) -> Result<TokenAmount, SessionError> {
    if let Some(s) = raw.as_str() {
        return Ok(TokenAmount::from_raw_str(s)?);
    }
    if let Some(n) = raw.as_u64() {
        return Ok(TokenAmount::from_raw(n as u128));
    }
    Err(SessionError::MalformedValue { method })
}
