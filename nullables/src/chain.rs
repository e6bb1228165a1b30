//! Nullable chain client — scripted reads, recorded sends.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use testament_chain::{CallParam, ChainClient, ChainError, LogEntry, LogRange, SendOptions};
use testament_contracts::{ContractBinding, ContractName};
use testament_types::{Address, BlockNumber, TokenAmount, TxHash};

/// One recorded state-changing send.
#[derive(Clone, Debug)]
pub struct SentCall {
    pub contract: ContractName,
    pub contract_address: Address,
    pub method: String,
    pub params: Vec<CallParam>,
    pub opts: SendOptions,
}

/// A test chain client that answers from scripted state and records every
/// send instead of submitting it.
///
/// Reads are keyed by method or event name; sends produce deterministic
/// hashes. Flip `set_ready(false)` to make every call answer
/// [`ChainError::NotReady`], the "provider not injected yet" condition the
/// bootstrap loops retry on.
pub struct NullChainClient {
    ready: Mutex<bool>,
    network_name: Mutex<String>,
    accounts: Mutex<Vec<Address>>,
    native_balance: Mutex<TokenAmount>,
    block: Mutex<BlockNumber>,
    gas_price: Mutex<u128>,
    call_results: Mutex<HashMap<String, serde_json::Value>>,
    events: Mutex<HashMap<String, Vec<LogEntry>>>,
    send_failure: Mutex<Option<String>>,
    scripted_hashes: Mutex<VecDeque<TxHash>>,
    sent: Mutex<Vec<SentCall>>,
    send_count: Mutex<u64>,
}

impl NullChainClient {
    pub fn new() -> Self {
        Self {
            ready: Mutex::new(true),
            network_name: Mutex::new("test".to_string()),
            accounts: Mutex::new(Vec::new()),
            native_balance: Mutex::new(TokenAmount::ZERO),
            block: Mutex::new(BlockNumber::ZERO),
            gas_price: Mutex::new(1_000_000_000),
            call_results: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
            send_failure: Mutex::new(None),
            scripted_hashes: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            send_count: Mutex::new(0),
        }
    }

    /// When not ready, every method answers [`ChainError::NotReady`].
    pub fn set_ready(&self, ready: bool) {
        *self.ready.lock().unwrap() = ready;
    }

    pub fn set_network_name(&self, name: impl Into<String>) {
        *self.network_name.lock().unwrap() = name.into();
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn set_native_balance(&self, balance: TokenAmount) {
        *self.native_balance.lock().unwrap() = balance;
    }

    pub fn set_block_number(&self, block: BlockNumber) {
        *self.block.lock().unwrap() = block;
    }

    pub fn set_gas_price(&self, price: u128) {
        *self.gas_price.lock().unwrap() = price;
    }

    /// Script the result of a read-only method, keyed by method name.
    pub fn set_call_result(&self, method: impl Into<String>, result: serde_json::Value) {
        self.call_results.lock().unwrap().insert(method.into(), result);
    }

    /// Script the log entries an event query returns, keyed by event name.
    pub fn set_events(&self, event: impl Into<String>, entries: Vec<LogEntry>) {
        self.events.lock().unwrap().insert(event.into(), entries);
    }

    /// Make every send (and its gas estimation) fail as signer-rejected.
    pub fn reject_sends(&self, reason: impl Into<String>) {
        *self.send_failure.lock().unwrap() = Some(reason.into());
    }

    /// Queue an explicit hash for the next send; otherwise hashes are
    /// derived from a counter.
    pub fn enqueue_hash(&self, hash: TxHash) {
        self.scripted_hashes.lock().unwrap().push_back(hash);
    }

    /// All recorded sends, for assertions.
    pub fn sent(&self) -> Vec<SentCall> {
        self.sent.lock().unwrap().clone()
    }

    /// Clear recorded sends.
    pub fn reset(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn check_ready(&self) -> Result<(), ChainError> {
        if *self.ready.lock().unwrap() {
            Ok(())
        } else {
            Err(ChainError::NotReady("provider not injected".to_string()))
        }
    }

    fn next_hash(&self) -> TxHash {
        if let Some(hash) = self.scripted_hashes.lock().unwrap().pop_front() {
            return hash;
        }
        let mut count = self.send_count.lock().unwrap();
        *count += 1;
        TxHash::parse(&format!("0x{:064x}", *count)).unwrap()
    }
}

impl Default for NullChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for NullChainClient {
    async fn network_name(&self) -> Result<String, ChainError> {
        self.check_ready()?;
        Ok(self.network_name.lock().unwrap().clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        self.check_ready()?;
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn native_balance(&self, _address: &Address) -> Result<TokenAmount, ChainError> {
        self.check_ready()?;
        Ok(*self.native_balance.lock().unwrap())
    }

    async fn block_number(&self) -> Result<BlockNumber, ChainError> {
        self.check_ready()?;
        Ok(*self.block.lock().unwrap())
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.check_ready()?;
        Ok(*self.gas_price.lock().unwrap())
    }

    async fn call(
        &self,
        _binding: &ContractBinding,
        method: &str,
        _params: &[CallParam],
    ) -> Result<serde_json::Value, ChainError> {
        self.check_ready()?;
        self.call_results
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .ok_or_else(|| ChainError::Rpc(format!("no scripted result for {method}")))
    }

    async fn estimate_gas(
        &self,
        _binding: &ContractBinding,
        _method: &str,
        _params: &[CallParam],
        _opts: &SendOptions,
    ) -> Result<u64, ChainError> {
        self.check_ready()?;
        if let Some(reason) = self.send_failure.lock().unwrap().clone() {
            return Err(ChainError::GasEstimation(reason));
        }
        Ok(40_000)
    }

    async fn send(
        &self,
        binding: &ContractBinding,
        method: &str,
        params: &[CallParam],
        opts: &SendOptions,
    ) -> Result<TxHash, ChainError> {
        self.check_ready()?;
        if let Some(reason) = self.send_failure.lock().unwrap().clone() {
            return Err(ChainError::Rejected(reason));
        }
        self.sent.lock().unwrap().push(SentCall {
            contract: binding.name,
            contract_address: binding.address.clone(),
            method: method.to_string(),
            params: params.to_vec(),
            opts: opts.clone(),
        });
        Ok(self.next_hash())
    }

    async fn past_events(
        &self,
        _binding: &ContractBinding,
        event: &str,
        _range: LogRange,
    ) -> Result<Vec<LogEntry>, ChainError> {
        self.check_ready()?;
        Ok(self
            .events
            .lock()
            .unwrap()
            .get(event)
            .cloned()
            .unwrap_or_default())
    }
}
