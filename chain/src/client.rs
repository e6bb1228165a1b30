//! The chain client boundary.
//!
//! Everything the engine knows about the chain flows through [`ChainClient`].
//! The trait is object-safe so the engine can hold `Arc<dyn ChainClient>` and
//! tests can swap in a scripted double.

use crate::error::ChainError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use testament_contracts::ContractBinding;
use testament_types::{Address, BlockNumber, TokenAmount, TxHash};

/// A positional argument to a contract method.
///
/// Uints render as decimal strings in the JSON form; raw token amounts
/// overflow a JSON number.
#[derive(Clone, Debug, PartialEq)]
pub enum CallParam {
    Address(Address),
    Uint(u128),
    Bool(bool),
    /// `bytes32` and friends, 0x-prefixed hex.
    Bytes(String),
}

impl CallParam {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CallParam::Address(a) => serde_json::Value::String(a.as_str().to_string()),
            CallParam::Uint(n) => serde_json::Value::String(n.to_string()),
            CallParam::Bool(b) => serde_json::Value::Bool(*b),
            CallParam::Bytes(raw) => serde_json::Value::String(raw.clone()),
        }
    }
}

/// Options accompanying gas estimation and state-changing sends.
#[derive(Clone, Debug)]
pub struct SendOptions {
    pub from: Address,
    /// Native value attached to payable calls, in raw units.
    pub value: Option<TokenAmount>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
}

impl SendOptions {
    pub fn from_account(from: Address) -> Self {
        Self {
            from,
            value: None,
            gas: None,
            gas_price: None,
        }
    }

    pub fn with_value(mut self, value: TokenAmount) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }
}

/// Upper bound of an event query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTag {
    Number(BlockNumber),
    Latest,
}

/// Block range of an event query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogRange {
    pub from_block: BlockNumber,
    pub to_block: BlockTag,
}

impl LogRange {
    /// From a floor up to the chain head.
    pub fn from_floor(floor: BlockNumber) -> Self {
        Self {
            from_block: floor,
            to_block: BlockTag::Latest,
        }
    }
}

/// One decoded event-log entry, as chain clients return them.
///
/// `return_values` holds the event's named fields; the reconciler
/// deserializes it into per-event types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub transaction_hash: TxHash,
    pub return_values: serde_json::Value,
}

/// Read, estimate, send and query against a contract network.
///
/// Implementations wrap a wallet provider's RPC connection; the engine never
/// sees keys or signatures, only the resulting transaction hashes.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The network name the connected provider reports.
    async fn network_name(&self) -> Result<String, ChainError>;

    /// Wallet accounts, primary account first.
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    /// Native-coin balance of an address, in raw units.
    async fn native_balance(&self, address: &Address) -> Result<TokenAmount, ChainError>;

    /// Current chain head height.
    async fn block_number(&self) -> Result<BlockNumber, ChainError>;

    /// Current gas price in raw units.
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Execute a read-only method; the result is ABI-decoded JSON.
    async fn call(
        &self,
        binding: &ContractBinding,
        method: &str,
        params: &[CallParam],
    ) -> Result<serde_json::Value, ChainError>;

    /// Estimate gas for a state-changing call.
    async fn estimate_gas(
        &self,
        binding: &ContractBinding,
        method: &str,
        params: &[CallParam],
        opts: &SendOptions,
    ) -> Result<u64, ChainError>;

    /// Submit a signed state-changing call and return its transaction hash.
    async fn send(
        &self,
        binding: &ContractBinding,
        method: &str,
        params: &[CallParam],
        opts: &SendOptions,
    ) -> Result<TxHash, ChainError>;

    /// Historical events by name over a block range.
    async fn past_events(
        &self,
        binding: &ContractBinding,
        event: &str,
        range: LogRange,
    ) -> Result<Vec<LogEntry>, ChainError>;
}
