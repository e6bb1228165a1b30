//! Decoded event-log entries.
//!
//! Chain clients hand back log entries with a dynamic `returnValues` object
//! keyed by the contract's parameter names (`_id`, `_creator`, ...). The
//! decoders here turn those into typed events, strictly: a missing or
//! malformed field fails the entry instead of dropping it.

use crate::error::ReconcileError;
use testament_chain::LogEntry;
use testament_types::{Address, TokenAmount, TxHash, WillId};

/// `LogWillCreated` — one will registered on the wills contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WillCreatedEvent {
    pub id: WillId,
    pub creator: Address,
    pub recipient: Address,
    pub amount: TokenAmount,
    pub transaction_hash: TxHash,
}

impl WillCreatedEvent {
    pub fn from_log(entry: &LogEntry) -> Result<Self, ReconcileError> {
        const EVENT: &str = "LogWillCreated";
        Ok(Self {
            id: WillId::from_log_bytes(str_field(entry, EVENT, "_id")?)?,
            creator: Address::parse(str_field(entry, EVENT, "_creator")?)?,
            recipient: Address::parse(str_field(entry, EVENT, "_recipient")?)?,
            amount: amount_field(entry, EVENT, "_amount")?,
            transaction_hash: entry.transaction_hash.clone(),
        })
    }
}

/// `LogWillClaimed` — a recipient took ownership of a matured will.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WillClaimedEvent {
    pub id: WillId,
    pub claimant: Address,
    pub amount: TokenAmount,
    pub transaction_hash: TxHash,
}

impl WillClaimedEvent {
    pub fn from_log(entry: &LogEntry) -> Result<Self, ReconcileError> {
        const EVENT: &str = "LogWillClaimed";
        Ok(Self {
            id: WillId::from_log_bytes(str_field(entry, EVENT, "_id")?)?,
            claimant: Address::parse(str_field(entry, EVENT, "_claimant")?)?,
            amount: amount_field(entry, EVENT, "_amount")?,
            transaction_hash: entry.transaction_hash.clone(),
        })
    }
}

/// `LogNewTrust` — one trust instance deployed through the factory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustCreatedEvent {
    pub trustor: Address,
    pub beneficiary: Address,
    pub amount: TokenAmount,
    pub contract_address: Address,
    pub transaction_hash: TxHash,
}

impl TrustCreatedEvent {
    pub fn from_log(entry: &LogEntry) -> Result<Self, ReconcileError> {
        const EVENT: &str = "LogNewTrust";
        Ok(Self {
            trustor: Address::parse(str_field(entry, EVENT, "_trustor")?)?,
            beneficiary: Address::parse(str_field(entry, EVENT, "_beneficiary")?)?,
            amount: amount_field(entry, EVENT, "_amount")?,
            contract_address: Address::parse(str_field(entry, EVENT, "_contractAddress")?)?,
            transaction_hash: entry.transaction_hash.clone(),
        })
    }
}

/// `LogWithdraw` on a trust instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalEvent {
    pub beneficiary: Address,
    pub amount: TokenAmount,
    pub transaction_hash: TxHash,
}

impl WithdrawalEvent {
    pub fn from_log(entry: &LogEntry) -> Result<Self, ReconcileError> {
        const EVENT: &str = "LogWithdraw";
        Ok(Self {
            beneficiary: Address::parse(str_field(entry, EVENT, "_beneficiary")?)?,
            amount: amount_field(entry, EVENT, "_amount")?,
            transaction_hash: entry.transaction_hash.clone(),
        })
    }
}

/// `LogDeposit` on a trust instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositEvent {
    pub trustor: Address,
    pub amount: TokenAmount,
    pub transaction_hash: TxHash,
}

impl DepositEvent {
    pub fn from_log(entry: &LogEntry) -> Result<Self, ReconcileError> {
        const EVENT: &str = "LogDeposit";
        Ok(Self {
            trustor: Address::parse(str_field(entry, EVENT, "_trustor")?)?,
            amount: amount_field(entry, EVENT, "_amount")?,
            transaction_hash: entry.transaction_hash.clone(),
        })
    }
}

fn str_field<'a>(
    entry: &'a LogEntry,
    event: &'static str,
    field: &'static str,
) -> Result<&'a str, ReconcileError> {
    let value = entry
        .return_values
        .get(field)
        .ok_or(ReconcileError::MissingField { event, field })?;
    value
        .as_str()
        .ok_or(ReconcileError::InvalidField { event, field })
}

/// Amount fields arrive as decimal strings (raw token amounts overflow a
/// JSON number), but small test fixtures may use plain numbers.
fn amount_field(
    entry: &LogEntry,
    event: &'static str,
    field: &'static str,
) -> Result<TokenAmount, ReconcileError> {
    let value = entry
        .return_values
        .get(field)
        .ok_or(ReconcileError::MissingField { event, field })?;
    if let Some(raw) = value.as_str() {
        return Ok(TokenAmount::from_raw_str(raw)?);
    }
    if let Some(raw) = value.as_u64() {
        return Ok(TokenAmount::from_raw(raw as u128));
    }
    Err(ReconcileError::InvalidField { event, field })
}
