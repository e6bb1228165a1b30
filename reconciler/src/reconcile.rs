//! Log-to-state reconciliation.
//!
//! Turns the append-only creation log into the two per-user transfer views.
//! Every pass is a full rebuild: scan the logs, partition by the active
//! address's role, join each partition against live will records, derive the
//! view fields. Nothing is persisted between passes, so a pass that fails
//! can simply be re-run on the next tick.

use crate::error::ReconcileError;
use crate::event::{WillClaimedEvent, WillCreatedEvent};
use crate::record::{IncomingTransfer, OutgoingTransfer, ReconciledTransfers, WillRecord};
use async_trait::async_trait;
use futures_util::future::try_join_all;
use std::sync::Arc;
use testament_chain::{CallParam, ChainClient, LogRange};
use testament_contracts::{bind, log_floor, ContractName};
use testament_types::{Address, BlockNumber, Network, WillId};

/// Read access to live will state.
///
/// The chain-backed implementation is [`ChainWillReader`]; tests inject
/// records directly.
#[async_trait]
pub trait WillStateReader: Send + Sync {
    async fn will_record(
        &self,
        id: &WillId,
        network: Network,
    ) -> Result<WillRecord, ReconcileError>;
}

/// A [`WillStateReader`] backed by `getWill` reads through the chain client.
pub struct ChainWillReader {
    chain: Arc<dyn ChainClient>,
}

impl ChainWillReader {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl WillStateReader for ChainWillReader {
    async fn will_record(
        &self,
        id: &WillId,
        network: Network,
    ) -> Result<WillRecord, ReconcileError> {
        let binding = bind(ContractName::Wills, network, None)?;
        let raw = self
            .chain
            .call(&binding, "getWill", &[CallParam::Bytes(id.to_log_bytes()?)])
            .await?;
        parse_will_record(id, &raw)
    }
}

/// `getWill` decodes to a positional array
/// `[owner, recipient, amount, revokable, maturityBlock]`; only the owner
/// and the maturity height feed the derived view fields.
fn parse_will_record(id: &WillId, raw: &serde_json::Value) -> Result<WillRecord, ReconcileError> {
    let malformed = |reason| ReconcileError::MalformedRecord {
        id: id.clone(),
        reason,
    };
    let fields = raw.as_array().ok_or_else(|| malformed("not an array"))?;
    let owner = fields
        .first()
        .and_then(|v| v.as_str())
        .ok_or_else(|| malformed("missing owner"))?;
    let maturity = fields.get(4).ok_or_else(|| malformed("missing maturity block"))?;
    let maturity = if let Some(raw) = maturity.as_str() {
        raw.parse::<u64>()
            .map_err(|_| malformed("maturity block not a block height"))?
    } else if let Some(raw) = maturity.as_u64() {
        raw
    } else {
        return Err(malformed("maturity block not a block height"));
    };
    Ok(WillRecord {
        current_owner: Address::parse(owner)?,
        maturity_block: BlockNumber::new(maturity),
    })
}

/// Partition creation events by the active address's role.
///
/// Creator wins: a self-transfer lands only in the outgoing view. Events
/// naming the active address in neither role are dropped.
pub fn partition_events(
    events: &[WillCreatedEvent],
    active: &Address,
) -> (Vec<WillCreatedEvent>, Vec<WillCreatedEvent>) {
    let mut outgoing = Vec::new();
    let mut incoming = Vec::new();
    for event in events {
        if event.creator == *active {
            outgoing.push(event.clone());
        } else if event.recipient == *active {
            incoming.push(event.clone());
        }
    }
    (outgoing, incoming)
}

/// Rebuilds the per-user transfer views from the creation log.
pub struct LedgerReconciler {
    chain: Arc<dyn ChainClient>,
    reader: Arc<dyn WillStateReader>,
}

impl LedgerReconciler {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        let reader = Arc::new(ChainWillReader::new(chain.clone()));
        Self { chain, reader }
    }

    pub fn with_reader(chain: Arc<dyn ChainClient>, reader: Arc<dyn WillStateReader>) -> Self {
        Self { chain, reader }
    }

    /// All will-created events from the network's scan floor to the head.
    ///
    /// A full scan on every call; event volume is assumed small and the
    /// floor skips the pre-deployment range. Decoding is strict, so one
    /// malformed entry fails the listing.
    pub async fn list_creation_events(
        &self,
        network: Network,
    ) -> Result<Vec<WillCreatedEvent>, ReconcileError> {
        let binding = bind(ContractName::Wills, network, None)?;
        let range = LogRange::from_floor(log_floor(ContractName::Wills, network));
        let entries = self
            .chain
            .past_events(&binding, "LogWillCreated", range)
            .await?;
        entries.iter().map(WillCreatedEvent::from_log).collect()
    }

    /// All will-claimed events from the network's scan floor to the head.
    pub async fn list_claim_events(
        &self,
        network: Network,
    ) -> Result<Vec<WillClaimedEvent>, ReconcileError> {
        let binding = bind(ContractName::Wills, network, None)?;
        let range = LogRange::from_floor(log_floor(ContractName::Wills, network));
        let entries = self
            .chain
            .past_events(&binding, "LogWillClaimed", range)
            .await?;
        entries.iter().map(WillClaimedEvent::from_log).collect()
    }

    /// Join creation events against live will state into both views.
    ///
    /// Record reads within a partition run as one batch of independent
    /// parallel reads; all must complete before that partition's view is
    /// produced, and a single failed read surfaces the error for the whole
    /// pass. An empty partition skips its batch entirely. Given identical
    /// inputs and record state, the result is identical.
    pub async fn reconcile(
        &self,
        events: &[WillCreatedEvent],
        active: &Address,
        current_block: BlockNumber,
        network: Network,
    ) -> Result<ReconciledTransfers, ReconcileError> {
        let (outgoing_events, incoming_events) = partition_events(events, active);

        let outgoing = self
            .derive_outgoing(&outgoing_events, current_block, network)
            .await?;
        let incoming = self
            .derive_incoming(&incoming_events, current_block, network)
            .await?;

        tracing::debug!(
            active = %active,
            outgoing = outgoing.len(),
            incoming = incoming.len(),
            current_block = %current_block,
            "reconciled transfer views"
        );
        Ok(ReconciledTransfers { outgoing, incoming })
    }

    async fn derive_outgoing(
        &self,
        events: &[WillCreatedEvent],
        current_block: BlockNumber,
        network: Network,
    ) -> Result<Vec<OutgoingTransfer>, ReconcileError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.read_records(events, network).await?;
        Ok(events
            .iter()
            .zip(&records)
            .map(|(event, record)| OutgoingTransfer::derive(event, record, current_block))
            .collect())
    }

    async fn derive_incoming(
        &self,
        events: &[WillCreatedEvent],
        current_block: BlockNumber,
        network: Network,
    ) -> Result<Vec<IncomingTransfer>, ReconcileError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.read_records(events, network).await?;
        Ok(events
            .iter()
            .zip(&records)
            .map(|(event, record)| IncomingTransfer::derive(event, record, current_block))
            .collect())
    }

    async fn read_records(
        &self,
        events: &[WillCreatedEvent],
        network: Network,
    ) -> Result<Vec<WillRecord>, ReconcileError> {
        try_join_all(
            events
                .iter()
                .map(|event| self.reader.will_record(&event.id, network)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use testament_chain::{ChainError, LogEntry, SendOptions};
    use testament_contracts::ContractBinding;
    use testament_types::{TokenAmount, TxHash};

    /// In-memory will state for testing.
    struct FixtureReader {
        records: HashMap<WillId, WillRecord>,
        failing: Option<WillId>,
        reads: AtomicU32,
    }

    impl FixtureReader {
        fn new(records: Vec<(WillId, WillRecord)>) -> Self {
            Self {
                records: records.into_iter().collect(),
                failing: None,
                reads: AtomicU32::new(0),
            }
        }

        fn failing_on(mut self, id: WillId) -> Self {
            self.failing = Some(id);
            self
        }
    }

    #[async_trait]
    impl WillStateReader for FixtureReader {
        async fn will_record(
            &self,
            id: &WillId,
            _network: Network,
        ) -> Result<WillRecord, ReconcileError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.failing.as_ref() == Some(id) {
                return Err(ReconcileError::MalformedRecord {
                    id: id.clone(),
                    reason: "scripted failure",
                });
            }
            self.records
                .get(id)
                .cloned()
                .ok_or_else(|| ReconcileError::MalformedRecord {
                    id: id.clone(),
                    reason: "no fixture",
                })
        }
    }

    /// Chain double scripting `past_events` and `call` responses.
    struct ScriptedChain {
        entries: Vec<LogEntry>,
        call_result: serde_json::Value,
        ranges: Mutex<Vec<LogRange>>,
        calls: Mutex<Vec<Vec<CallParam>>>,
    }

    impl ScriptedChain {
        fn empty() -> Self {
            Self {
                entries: Vec::new(),
                call_result: serde_json::Value::Null,
                ranges: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_entries(entries: Vec<LogEntry>) -> Self {
            Self {
                entries,
                ..Self::empty()
            }
        }

        fn with_call_result(call_result: serde_json::Value) -> Self {
            Self {
                call_result,
                ..Self::empty()
            }
        }
    }

    #[async_trait]
    impl ChainClient for ScriptedChain {
        async fn network_name(&self) -> Result<String, ChainError> {
            Err(ChainError::Rpc("not scripted".into()))
        }

        async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
            Err(ChainError::Rpc("not scripted".into()))
        }

        async fn native_balance(&self, _address: &Address) -> Result<TokenAmount, ChainError> {
            Err(ChainError::Rpc("not scripted".into()))
        }

        async fn block_number(&self) -> Result<BlockNumber, ChainError> {
            Err(ChainError::Rpc("not scripted".into()))
        }

        async fn gas_price(&self) -> Result<u128, ChainError> {
            Err(ChainError::Rpc("not scripted".into()))
        }

        async fn call(
            &self,
            _binding: &ContractBinding,
            _method: &str,
            params: &[CallParam],
        ) -> Result<serde_json::Value, ChainError> {
            self.calls.lock().unwrap().push(params.to_vec());
            Ok(self.call_result.clone())
        }

        async fn estimate_gas(
            &self,
            _binding: &ContractBinding,
            _method: &str,
            _params: &[CallParam],
            _opts: &SendOptions,
        ) -> Result<u64, ChainError> {
            Err(ChainError::Rpc("not scripted".into()))
        }

        async fn send(
            &self,
            _binding: &ContractBinding,
            _method: &str,
            _params: &[CallParam],
            _opts: &SendOptions,
        ) -> Result<TxHash, ChainError> {
            Err(ChainError::Rpc("not scripted".into()))
        }

        async fn past_events(
            &self,
            _binding: &ContractBinding,
            _event: &str,
            range: LogRange,
        ) -> Result<Vec<LogEntry>, ChainError> {
            self.ranges.lock().unwrap().push(range);
            Ok(self.entries.clone())
        }
    }

    fn address(suffix: &str) -> Address {
        Address::parse(&format!("0x{:0>40}", suffix)).unwrap()
    }

    fn tx_hash(byte: u8) -> TxHash {
        TxHash::parse(&format!("0x{}", hex::encode([byte; 32]))).unwrap()
    }

    fn creation_event(id: &str, creator: &Address, recipient: &Address) -> WillCreatedEvent {
        WillCreatedEvent {
            id: WillId::new(id),
            creator: creator.clone(),
            recipient: recipient.clone(),
            amount: TokenAmount::from_whole(1),
            transaction_hash: tx_hash(0x11),
        }
    }

    fn reconciler_with_reader(reader: FixtureReader) -> LedgerReconciler {
        LedgerReconciler::with_reader(Arc::new(ScriptedChain::empty()), Arc::new(reader))
    }

    #[tokio::test]
    async fn creator_view_yields_outgoing_with_maturity_offset() {
        let creator = address("aa");
        let recipient = address("bb");
        let events = vec![creation_event("w1", &creator, &recipient)];
        let reader = FixtureReader::new(vec![(
            WillId::new("w1"),
            WillRecord {
                current_owner: creator.clone(),
                maturity_block: BlockNumber::new(1000),
            },
        )]);
        let reconciler = reconciler_with_reader(reader);

        let transfers = reconciler
            .reconcile(&events, &creator, BlockNumber::new(950), Network::Test)
            .await
            .unwrap();

        assert!(transfers.incoming.is_empty());
        assert_eq!(transfers.outgoing.len(), 1);
        let outgoing = &transfers.outgoing[0];
        assert_eq!(outgoing.id, WillId::new("w1"));
        assert_eq!(outgoing.recipient, recipient);
        assert_eq!(outgoing.amount, TokenAmount::from_whole(1));
        assert_eq!(outgoing.maturity_offset, 50);
    }

    #[tokio::test]
    async fn recipient_view_yields_incoming_with_flags() {
        let creator = address("aa");
        let recipient = address("bb");
        let events = vec![creation_event("w1", &creator, &recipient)];
        let reader = FixtureReader::new(vec![(
            WillId::new("w1"),
            WillRecord {
                current_owner: creator.clone(),
                maturity_block: BlockNumber::new(1000),
            },
        )]);
        let reconciler = reconciler_with_reader(reader);

        let transfers = reconciler
            .reconcile(&events, &recipient, BlockNumber::new(950), Network::Test)
            .await
            .unwrap();

        assert!(transfers.outgoing.is_empty());
        assert_eq!(transfers.incoming.len(), 1);
        let incoming = &transfers.incoming[0];
        assert_eq!(incoming.creator, creator);
        assert!(!incoming.withdrawable);
        assert!(!incoming.claimed);
    }

    #[tokio::test]
    async fn self_transfer_lands_only_in_outgoing() {
        let one = address("aa");
        let events = vec![creation_event("self", &one, &one)];
        let reader = FixtureReader::new(vec![(
            WillId::new("self"),
            WillRecord {
                current_owner: one.clone(),
                maturity_block: BlockNumber::new(10),
            },
        )]);
        let reconciler = reconciler_with_reader(reader);

        let transfers = reconciler
            .reconcile(&events, &one, BlockNumber::new(5), Network::Test)
            .await
            .unwrap();

        assert_eq!(transfers.outgoing.len(), 1);
        assert!(transfers.incoming.is_empty());
    }

    #[tokio::test]
    async fn empty_partitions_issue_no_reads() {
        let reader = Arc::new(FixtureReader::new(vec![]));
        let reconciler =
            LedgerReconciler::with_reader(Arc::new(ScriptedChain::empty()), reader.clone());

        let transfers = reconciler
            .reconcile(&[], &address("aa"), BlockNumber::new(1), Network::Test)
            .await
            .unwrap();

        assert!(transfers.outgoing.is_empty());
        assert!(transfers.incoming.is_empty());
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unrelated_events_issue_no_reads() {
        let creator = address("aa");
        let recipient = address("bb");
        let bystander = address("cc");
        let events = vec![creation_event("w1", &creator, &recipient)];
        let reader = Arc::new(FixtureReader::new(vec![]));
        let reconciler =
            LedgerReconciler::with_reader(Arc::new(ScriptedChain::empty()), reader.clone());

        let transfers = reconciler
            .reconcile(&events, &bystander, BlockNumber::new(1), Network::Test)
            .await
            .unwrap();

        assert!(transfers.outgoing.is_empty());
        assert!(transfers.incoming.is_empty());
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn single_read_failure_aborts_the_pass() {
        let creator = address("aa");
        let recipient = address("bb");
        let events = vec![
            creation_event("w1", &creator, &recipient),
            creation_event("w2", &creator, &recipient),
        ];
        let reader = FixtureReader::new(vec![(
            WillId::new("w1"),
            WillRecord {
                current_owner: creator.clone(),
                maturity_block: BlockNumber::new(10),
            },
        )])
        .failing_on(WillId::new("w2"));
        let reconciler = reconciler_with_reader(reader);

        let result = reconciler
            .reconcile(&events, &creator, BlockNumber::new(5), Network::Test)
            .await;

        assert!(matches!(
            result,
            Err(ReconcileError::MalformedRecord { reason: "scripted failure", .. })
        ));
    }

    #[tokio::test]
    async fn reconcile_is_idempotent_for_fixed_inputs() {
        let creator = address("aa");
        let recipient = address("bb");
        let events = vec![
            creation_event("w1", &creator, &recipient),
            creation_event("w2", &recipient, &creator),
        ];
        let records = vec![
            (
                WillId::new("w1"),
                WillRecord {
                    current_owner: creator.clone(),
                    maturity_block: BlockNumber::new(1000),
                },
            ),
            (
                WillId::new("w2"),
                WillRecord {
                    current_owner: recipient.clone(),
                    maturity_block: BlockNumber::new(100),
                },
            ),
        ];
        let reconciler = reconciler_with_reader(FixtureReader::new(records));

        let first = reconciler
            .reconcile(&events, &creator, BlockNumber::new(950), Network::Test)
            .await
            .unwrap();
        let second = reconciler
            .reconcile(&events, &creator, BlockNumber::new(950), Network::Test)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.outgoing.len(), 1);
        assert_eq!(first.incoming.len(), 1);
    }

    #[tokio::test]
    async fn lists_creation_events_from_the_network_floor() {
        let entry = LogEntry {
            transaction_hash: tx_hash(0x21),
            return_values: serde_json::json!({
                "_id": format!("0x{}{}", hex::encode("w1"), "00".repeat(30)),
                "_creator": "0x00000000000000000000000000000000000000aa",
                "_recipient": "0x00000000000000000000000000000000000000bb",
                "_amount": "1000000000000000000",
            }),
        };
        let chain = Arc::new(ScriptedChain::with_entries(vec![entry]));
        let reconciler = LedgerReconciler::new(chain.clone());

        let events = reconciler.list_creation_events(Network::Test).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, WillId::new("w1"));
        let ranges = chain.ranges.lock().unwrap();
        assert_eq!(
            ranges[0].from_block,
            log_floor(ContractName::Wills, Network::Test)
        );
    }

    #[tokio::test]
    async fn malformed_log_entry_fails_the_listing() {
        let entry = LogEntry {
            transaction_hash: tx_hash(0x22),
            return_values: serde_json::json!({ "_creator": "0x00000000000000000000000000000000000000aa" }),
        };
        let chain = Arc::new(ScriptedChain::with_entries(vec![entry]));
        let reconciler = LedgerReconciler::new(chain);

        assert!(reconciler.list_creation_events(Network::Test).await.is_err());
    }

    #[tokio::test]
    async fn chain_reader_encodes_id_and_parses_positional_record() {
        let chain = Arc::new(ScriptedChain::with_call_result(serde_json::json!([
            "0x00000000000000000000000000000000000000aa",
            "0x00000000000000000000000000000000000000bb",
            "1000000000000000000",
            true,
            "1000",
        ])));
        let reader = ChainWillReader::new(chain.clone());

        let record = reader
            .will_record(&WillId::new("w1"), Network::Test)
            .await
            .unwrap();

        assert_eq!(record.current_owner, address("aa"));
        assert_eq!(record.maturity_block, BlockNumber::new(1000));
        let calls = chain.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            vec![CallParam::Bytes(WillId::new("w1").to_log_bytes().unwrap())]
        );
    }

    #[tokio::test]
    async fn chain_reader_rejects_short_record() {
        let chain = Arc::new(ScriptedChain::with_call_result(serde_json::json!([
            "0x00000000000000000000000000000000000000aa",
        ])));
        let reader = ChainWillReader::new(chain);

        let result = reader.will_record(&WillId::new("w1"), Network::Test).await;
        assert!(matches!(
            result,
            Err(ReconcileError::MalformedRecord { reason: "missing maturity block", .. })
        ));
    }
}
