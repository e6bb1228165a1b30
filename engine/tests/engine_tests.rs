//! Integration tests exercising the full session lifecycle:
//! bootstrap → ready view → periodic refresh → user operations → teardown.
//!
//! These tests wire together components that are normally only connected
//! inside `engine.rs`, running them over nulled infrastructure with the
//! tokio clock paused so every retry loop and refresh cadence is
//! deterministic.

use serde_json::json;
use std::time::Duration;
use testament_chain::LogEntry;
use testament_contracts::{bind, ContractName};
use testament_engine::{BootstrapPhase, EngineConfig, TestamentEngine};
use testament_nullables::NullChainClient;
use testament_tracker::TxStatus;
use testament_types::{Address, BlockNumber, Network, TokenAmount, TxHash, WillId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn addr(tail: &str) -> Address {
    Address::parse(&format!("0x{tail:0>40}")).unwrap()
}

fn active() -> Address {
    addr("aa")
}

fn friend() -> Address {
    addr("bb")
}

fn will_id(byte: &str) -> WillId {
    WillId::from_log_bytes(&format!("0x{}", byte.repeat(32))).unwrap()
}

fn created_event(id: &WillId, creator: &Address, recipient: &Address, amount: &str) -> LogEntry {
    LogEntry {
        transaction_hash: TxHash::parse(&format!("0x{}", "ab".repeat(32))).unwrap(),
        return_values: json!({
            "_id": id.to_log_bytes().unwrap(),
            "_creator": creator.to_string(),
            "_recipient": recipient.to_string(),
            "_amount": amount,
        }),
    }
}

/// Script a healthy test-network wallet: one account, balances, and an
/// allowance already at the required threshold.
fn script_ready_chain(chain: &NullChainClient) {
    chain.set_network_name("test");
    chain.set_accounts(vec![active()]);
    chain.set_native_balance(TokenAmount::from_whole(5));
    chain.set_block_number(BlockNumber::new(950));
    chain.set_call_result("balanceOf", json!("300000000000000000000"));
    chain.set_call_result("allowance", json!("250000000000000000000"));
}

// ---------------------------------------------------------------------------
// 1. Bootstrap
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn bootstrap_reaches_ready_with_reconciled_history() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    chain.set_events(
        "LogWillCreated",
        vec![created_event(
            &will_id("11"),
            &active(),
            &friend(),
            "2000000000000000000",
        )],
    );
    chain.set_call_result(
        "getWill",
        json!([
            active().to_string(),
            friend().to_string(),
            "2000000000000000000",
            true,
            "1000"
        ]),
    );
    let metrics = engine.metrics();

    let handle = engine.start();
    let view = handle.wait_ready().await.unwrap();

    assert_eq!(view.phase, BootstrapPhase::Ready);
    assert!(!view.loading.any());
    assert_eq!(view.network, Network::Test);
    let account = view.account.as_ref().unwrap();
    assert_eq!(account.address, active());
    assert_eq!(account.native_balance, TokenAmount::from_whole(5));
    assert_eq!(account.token_balance, TokenAmount::from_whole(300));
    assert_eq!(view.current_block, BlockNumber::new(950));
    assert!(view.authorized);

    // The single will was created by the active account, so it appears as
    // an outgoing transfer maturing 50 blocks from now.
    assert_eq!(view.transfers.outgoing.len(), 1);
    assert!(view.transfers.incoming.is_empty());
    let outgoing = &view.transfers.outgoing[0];
    assert_eq!(outgoing.recipient, friend());
    assert_eq!(outgoing.amount, TokenAmount::from_whole(2));
    assert_eq!(outgoing.maturity_block, BlockNumber::new(1000));
    assert_eq!(outgoing.maturity_offset, 50);

    assert_eq!(metrics.reconcile_passes.get(), 1);
    assert_eq!(metrics.current_block.get(), 950);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn provider_appearing_late_completes_bootstrap() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    chain.set_ready(false);

    let handle = engine.start();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.view().phase, BootstrapPhase::ResolvingNetwork);

    script_ready_chain(&chain);
    chain.set_ready(true);
    let view = handle.wait_ready().await.unwrap();
    assert_eq!(view.network, Network::Test);
    assert!(view.transfers.outgoing.is_empty());
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn unrecognized_network_falls_back_to_main_bindings() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    chain.set_network_name("somechain");

    let handle = engine.start();
    let view = handle.wait_ready().await.unwrap();
    assert_eq!(view.network, Network::Unknown);

    let confirmed = handle
        .ops()
        .create_will(
            &friend(),
            TokenAmount::from_whole(1),
            100,
            false,
            &handle.cancel_token(),
        )
        .await
        .unwrap();
    assert!(confirmed);

    let sent = chain.sent();
    let main_wills = bind(ContractName::Wills, Network::Main, None).unwrap();
    assert_eq!(sent[0].contract_address, main_wills.address);
    handle.stop().await;
}

// ---------------------------------------------------------------------------
// 2. Periodic refresh
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn account_refresher_updates_the_view() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    let handle = engine.start();
    handle.wait_ready().await.unwrap();

    // Balance and allowance change on chain after bootstrap.
    chain.set_call_result("balanceOf", json!("50000000000000000000"));
    chain.set_call_result("allowance", json!("0"));

    let mut rx = handle.subscribe();
    let refreshed = tokio::time::timeout(
        Duration::from_secs(30),
        rx.wait_for(|view| {
            view.account
                .as_ref()
                .is_some_and(|a| a.token_balance == TokenAmount::from_whole(50))
        }),
    )
    .await
    .expect("refresh within the cadence")
    .unwrap()
    .clone();

    assert!(!refreshed.authorized);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failed_account_refresh_keeps_the_previous_view() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    let metrics = engine.metrics();
    let handle = engine.start();
    let ready = handle.wait_ready().await.unwrap();

    // The wallet disconnects: refreshes fail, the view keeps the last state.
    chain.set_accounts(vec![]);
    tokio::time::sleep(Duration::from_secs(12)).await;

    let view = handle.view();
    assert_eq!(view.account, ready.account);
    assert!(view.authorized);
    assert!(metrics.account_refresh_failures.get() >= 1);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn history_refresher_picks_up_new_events() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    let handle = engine.start();
    let ready = handle.wait_ready().await.unwrap();
    assert!(ready.transfers.incoming.is_empty());

    // A will naming the active account as recipient lands on chain, and the
    // head moves past its maturity.
    chain.set_block_number(BlockNumber::new(1100));
    chain.set_events(
        "LogWillCreated",
        vec![created_event(
            &will_id("22"),
            &friend(),
            &active(),
            "1000000000000000000",
        )],
    );
    chain.set_call_result(
        "getWill",
        json!([
            friend().to_string(),
            active().to_string(),
            "1000000000000000000",
            false,
            "1000"
        ]),
    );

    let mut rx = handle.subscribe();
    let view = tokio::time::timeout(
        Duration::from_secs(30),
        rx.wait_for(|view| !view.transfers.incoming.is_empty()),
    )
    .await
    .expect("history refresh within the cadence")
    .unwrap()
    .clone();

    assert_eq!(view.current_block, BlockNumber::new(1100));
    let incoming = &view.transfers.incoming[0];
    assert_eq!(incoming.creator, friend());
    assert_eq!(incoming.maturity_block, BlockNumber::new(1000));
    assert!(incoming.withdrawable);
    assert!(!incoming.claimed);
    handle.stop().await;
}

// ---------------------------------------------------------------------------
// 3. User operations
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn approval_flow_authorizes_after_refresh() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    chain.set_call_result("allowance", json!("0"));

    let handle = engine.start();
    let ready = handle.wait_ready().await.unwrap();
    assert!(!ready.authorized);

    let confirmed = handle
        .ops()
        .request_approval(&handle.cancel_token())
        .await
        .unwrap();
    assert!(confirmed);
    let sent = chain.sent();
    assert_eq!(sent[0].contract, ContractName::MyBitToken);
    assert_eq!(sent[0].method, "approve");

    // The approved allowance shows up on the next account refresh.
    chain.set_call_result("allowance", json!("250000000000000000000"));
    let mut rx = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(30), rx.wait_for(|view| view.authorized))
        .await
        .expect("authorization refresh")
        .unwrap();
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn trust_operations_round_trip() {
    let (engine, chain, _status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    let handle = engine.start();
    handle.wait_ready().await.unwrap();
    let cancel = handle.cancel_token();

    let confirmed = handle
        .ops()
        .create_trust(&friend(), TokenAmount::from_whole(3), true, 20_000, &cancel)
        .await
        .unwrap();
    assert!(confirmed);

    let instance = addr("77");
    chain.set_call_result("blocksUntilExpiration", json!("0"));
    assert!(handle.ops().trust_withdrawable(&instance).await.unwrap());
    handle
        .ops()
        .withdraw_trust(&instance, &cancel)
        .await
        .unwrap();

    let sent = chain.sent();
    assert_eq!(sent[0].contract, ContractName::TrustFactory);
    assert_eq!(sent[0].method, "deployTrust");
    assert_eq!(sent[0].opts.value, Some(TokenAmount::from_whole(3)));
    assert_eq!(sent[1].contract_address, instance);
    assert_eq!(sent[1].method, "withdraw");
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn reverted_transactions_report_false() {
    let (engine, chain, status) = TestamentEngine::nulled(EngineConfig::default());
    script_ready_chain(&chain);
    let metrics = engine.metrics();
    let handle = engine.start();
    handle.wait_ready().await.unwrap();

    status.enqueue(Ok(TxStatus::Failure));
    let confirmed = handle
        .ops()
        .create_will(
            &friend(),
            TokenAmount::from_whole(1),
            100,
            false,
            &handle.cancel_token(),
        )
        .await
        .unwrap();

    assert!(!confirmed);
    assert_eq!(metrics.transactions_submitted.get(), 1);
    assert_eq!(metrics.transactions_failed.get(), 1);
    assert_eq!(metrics.transactions_confirmed.get(), 0);
    handle.stop().await;
}
