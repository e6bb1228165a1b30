//! Session orchestration.
//!
//! [`TestamentEngine::start`] spawns three background tasks against one
//! shared [`SessionView`] watch channel:
//!
//! - the bootstrap driver, which resolves the network, loads account state
//!   and block height concurrently, checks the allowance gate and performs
//!   the first reconciliation pass, advancing the view through its phases;
//! - the account refresher, which re-reads balances and the allowance at a
//!   fixed cadence once the session is ready;
//! - the history refresher, which re-runs the reconciliation pass at its
//!   own cadence.
//!
//! Refresh failures keep the previous view; bootstrap failures retry at the
//! configured delay until they succeed or teardown cancels them. The
//! returned [`EngineHandle`] owns the tasks and cancels all of them on
//! [`EngineHandle::stop`].

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::metrics::EngineMetrics;
use crate::ops::EngineOps;
use crate::view::{BootstrapPhase, SessionView};
use async_trait::async_trait;
use prometheus::IntCounter;
use std::sync::Arc;
use std::time::{Duration, Instant};
use testament_chain::ChainClient;
use testament_nullables::{NullChainClient, NullStatusLookup};
use testament_reconciler::{LedgerReconciler, ReconcileError, ReconciledTransfers};
use testament_session::UserSession;
use testament_tracker::{
    CancelSource, CancelToken, ExplorerStatusClient, RetryPolicy, StatusError, StatusLookup,
    TransactionTracker, TxStatus,
};
use testament_types::{Address, BlockNumber, Network, TxHash};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How long teardown waits for background tasks to finish.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Counts every status poll on its way to the underlying lookup.
struct MeteredStatus {
    inner: Arc<dyn StatusLookup>,
    polls: IntCounter,
}

#[async_trait]
impl StatusLookup for MeteredStatus {
    async fn transaction_status(
        &self,
        hash: &TxHash,
        network: Network,
    ) -> Result<TxStatus, StatusError> {
        self.polls.inc();
        self.inner.transaction_status(hash, network).await
    }
}

/// An assembled engine, ready to start a session.
pub struct TestamentEngine {
    chain: Arc<dyn ChainClient>,
    tracker: Arc<TransactionTracker>,
    session: Arc<UserSession>,
    reconciler: Arc<LedgerReconciler>,
    metrics: Arc<EngineMetrics>,
    config: EngineConfig,
}

impl TestamentEngine {
    /// Build an engine over a chain client, confirming transactions against
    /// the public explorer endpoints plus any configured overrides.
    pub fn new(chain: Arc<dyn ChainClient>, config: EngineConfig) -> Self {
        let mut status = ExplorerStatusClient::new();
        for (network, url) in &config.status_endpoints {
            status = status.with_endpoint(*network, url.clone());
        }
        Self::with_status(chain, Arc::new(status), config)
    }

    /// Build an engine with an injected status lookup.
    pub fn with_status(
        chain: Arc<dyn ChainClient>,
        status: Arc<dyn StatusLookup>,
        config: EngineConfig,
    ) -> Self {
        let metrics = Arc::new(EngineMetrics::new());
        let status = Arc::new(MeteredStatus {
            inner: status,
            polls: metrics.status_polls.clone(),
        });
        let tracker = Arc::new(
            TransactionTracker::new(chain.clone(), status).with_policy(config.retry_policy()),
        );
        let session = Arc::new(UserSession::new(chain.clone(), tracker.clone()));
        let reconciler = Arc::new(LedgerReconciler::new(chain.clone()));
        Self {
            chain,
            tracker,
            session,
            reconciler,
            metrics,
            config,
        }
    }

    /// Build an engine over nulled infrastructure, returning the nulls for
    /// scripting state and asserting on recorded sends.
    pub fn nulled(config: EngineConfig) -> (Self, Arc<NullChainClient>, Arc<NullStatusLookup>) {
        let chain = Arc::new(NullChainClient::new());
        let status = Arc::new(NullStatusLookup::confirming());
        let engine = Self::with_status(chain.clone(), status.clone(), config);
        (engine, chain, status)
    }

    pub fn metrics(&self) -> Arc<EngineMetrics> {
        self.metrics.clone()
    }

    /// Start the session tasks and hand ownership to the caller.
    pub fn start(self) -> EngineHandle {
        let (view_tx, view_rx) = watch::channel(SessionView::default());
        let core = Arc::new(EngineCore {
            chain: self.chain.clone(),
            session: self.session.clone(),
            reconciler: self.reconciler,
            metrics: self.metrics.clone(),
            policy: self.config.retry_policy(),
            account_refresh: self.config.account_refresh_interval(),
            history_refresh: self.config.history_refresh_interval(),
            view: view_tx,
        });
        let cancel = CancelSource::new();
        let mut handles = Vec::new();

        {
            let core = core.clone();
            let token = cancel.token();
            handles.push(tokio::spawn(async move {
                core.run_bootstrap(token).await;
            }));
        }
        {
            let core = core.clone();
            let token = cancel.token();
            handles.push(tokio::spawn(async move {
                core.run_account_refresher(token).await;
            }));
        }
        {
            let core = core.clone();
            let token = cancel.token();
            handles.push(tokio::spawn(async move {
                core.run_history_refresher(token).await;
            }));
        }

        let ops = EngineOps::new(
            self.chain,
            self.tracker,
            self.session,
            self.metrics.clone(),
            view_rx.clone(),
        );
        EngineHandle {
            view: view_rx,
            cancel,
            handles,
            ops,
            metrics: self.metrics,
        }
    }
}

/// A running session: the live view, the operations and teardown.
pub struct EngineHandle {
    view: watch::Receiver<SessionView>,
    cancel: CancelSource,
    handles: Vec<JoinHandle<()>>,
    ops: EngineOps,
    metrics: Arc<EngineMetrics>,
}

impl EngineHandle {
    /// The latest published view.
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// A receiver observing every published view.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    pub fn ops(&self) -> &EngineOps {
        &self.ops
    }

    /// A token that fires when this session is stopped.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.token()
    }

    pub fn metrics(&self) -> Arc<EngineMetrics> {
        self.metrics.clone()
    }

    /// Wait until bootstrap reaches [`BootstrapPhase::Ready`].
    pub async fn wait_ready(&self) -> Result<SessionView, EngineError> {
        let mut rx = self.view.clone();
        let view = rx
            .wait_for(|view| view.phase == BootstrapPhase::Ready)
            .await
            .map_err(|_| EngineError::Cancelled)?;
        Ok(view.clone())
    }

    /// Cancel every task and wait for them to finish.
    pub async fn stop(mut self) {
        tracing::info!("stopping session");
        self.cancel.cancel();

        let handles: Vec<JoinHandle<()>> = self.handles.drain(..).collect();
        let wait_all = async {
            for handle in handles {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, wait_all).await.is_err() {
            tracing::warn!("shutdown timeout elapsed; some tasks may still be running");
        }
        tracing::info!("session stopped");
    }
}

/// State shared by the background tasks.
struct EngineCore {
    chain: Arc<dyn ChainClient>,
    session: Arc<UserSession>,
    reconciler: Arc<LedgerReconciler>,
    metrics: Arc<EngineMetrics>,
    policy: RetryPolicy,
    account_refresh: Duration,
    history_refresh: Duration,
    view: watch::Sender<SessionView>,
}

impl EngineCore {
    async fn run_bootstrap(self: Arc<Self>, cancel: CancelToken) {
        match self.bootstrap(&cancel).await {
            Ok(()) => {}
            Err(EngineError::Cancelled) => tracing::debug!("bootstrap cancelled"),
            Err(err) => tracing::error!(error = %err, "session bootstrap failed"),
        }
    }

    /// Drive the view from `ResolvingNetwork` to `Ready`.
    ///
    /// Every step retries at the policy delay: a missing provider, an empty
    /// account list or an unreachable endpoint all just mean "not yet".
    async fn bootstrap(&self, cancel: &CancelToken) -> Result<(), EngineError> {
        let name = self
            .policy
            .run("network resolution", cancel, || self.chain.network_name())
            .await?;
        let network = Network::from_name(&name);
        if network == Network::Unknown {
            tracing::warn!(name, "unrecognized network, using main contract bindings");
        } else {
            tracing::info!(%network, "network resolved");
        }
        self.view.send_modify(|view| {
            view.network = network;
            view.loading.network = false;
            view.phase = BootstrapPhase::LoadingInitial;
        });

        let account_load = async {
            self.policy
                .run("account bootstrap", cancel, || {
                    self.session.refresh_account(network)
                })
                .await
                .map_err(EngineError::from)
        };
        let block_load = async {
            self.policy
                .run("block height", cancel, || self.chain.block_number())
                .await
                .map_err(EngineError::from)
        };
        let (account, current_block) = tokio::try_join!(account_load, block_load)?;

        let active = account.address.clone();
        self.metrics.account_refreshes.inc();
        self.metrics.current_block.set(current_block.as_u64() as i64);
        self.view.send_modify(|view| {
            view.account = Some(account);
            view.current_block = current_block;
            view.loading.user = false;
            view.phase = BootstrapPhase::Gating;
        });

        let authorized = self
            .policy
            .run("authorization check", cancel, || {
                self.session.check_authorization(&active, network)
            })
            .await?;
        self.metrics.authorized.set(i64::from(authorized));
        self.view.send_modify(|view| {
            view.authorized = authorized;
        });

        let transfers = self
            .policy
            .run("history bootstrap", cancel, || {
                self.reconcile_once(&active, current_block, network)
            })
            .await?;
        tracing::info!(
            %network,
            account = %active,
            authorized,
            outgoing = transfers.outgoing.len(),
            incoming = transfers.incoming.len(),
            "session ready"
        );
        self.view.send_modify(|view| {
            view.transfers = transfers;
            view.loading.transaction_history = false;
            view.phase = BootstrapPhase::Ready;
        });
        Ok(())
    }

    /// Block this task until bootstrap finishes or the session is stopped.
    /// Returns false when the task should exit.
    async fn wait_until_ready(&self, cancel: &mut CancelToken) -> bool {
        let mut rx = self.view.subscribe();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            ready = rx.wait_for(|view| view.phase == BootstrapPhase::Ready) => ready.is_ok(),
        }
    }

    async fn run_account_refresher(self: Arc<Self>, mut cancel: CancelToken) {
        if !self.wait_until_ready(&mut cancel).await {
            return;
        }
        let mut interval = tokio::time::interval(self.account_refresh);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; bootstrap already covered it.
        interval.tick().await;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = interval.tick() => {}
            }
            self.refresh_account_once().await;
        }
    }

    async fn run_history_refresher(self: Arc<Self>, mut cancel: CancelToken) {
        if !self.wait_until_ready(&mut cancel).await {
            return;
        }
        let mut interval = tokio::time::interval(self.history_refresh);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = interval.tick() => {}
            }
            self.refresh_history_once().await;
        }
    }

    /// One account + authorization refresh. Failures keep the previous view.
    async fn refresh_account_once(&self) {
        let network = self.view.borrow().network;
        match self.session.refresh_account(network).await {
            Ok(account) => {
                self.metrics.account_refreshes.inc();
                let authorized = match self
                    .session
                    .check_authorization(&account.address, network)
                    .await
                {
                    Ok(authorized) => {
                        self.metrics.authorized.set(i64::from(authorized));
                        Some(authorized)
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "authorization refresh failed, keeping previous");
                        None
                    }
                };
                self.view.send_modify(|view| {
                    view.account = Some(account);
                    if let Some(authorized) = authorized {
                        view.authorized = authorized;
                    }
                });
            }
            Err(err) => {
                self.metrics.account_refresh_failures.inc();
                tracing::debug!(error = %err, "account refresh failed, keeping previous view");
            }
        }
    }

    /// One block-height + reconciliation refresh. Failures keep the
    /// previous view.
    async fn refresh_history_once(&self) {
        let (active, network) = {
            let view = self.view.borrow();
            match view.account.as_ref() {
                Some(account) => (account.address.clone(), view.network),
                None => return,
            }
        };
        let current_block = match self.chain.block_number().await {
            Ok(block) => block,
            Err(err) => {
                tracing::debug!(error = %err, "block height refresh failed, keeping previous view");
                return;
            }
        };
        match self.reconcile_once(&active, current_block, network).await {
            Ok(transfers) => {
                self.metrics.current_block.set(current_block.as_u64() as i64);
                self.view.send_modify(|view| {
                    view.current_block = current_block;
                    view.transfers = transfers;
                });
            }
            Err(err) => {
                tracing::debug!(error = %err, "reconciliation pass failed, keeping previous view");
            }
        }
    }

    /// One full reconciliation pass: list creation events, join them
    /// against live will state, and record the pass in the metrics.
    async fn reconcile_once(
        &self,
        active: &Address,
        current_block: BlockNumber,
        network: Network,
    ) -> Result<ReconciledTransfers, ReconcileError> {
        let started = Instant::now();
        let result = async {
            let events = self.reconciler.list_creation_events(network).await?;
            self.reconciler
                .reconcile(&events, active, current_block, network)
                .await
        }
        .await;
        match &result {
            Ok(transfers) => {
                self.metrics.reconcile_passes.inc();
                self.metrics
                    .reconcile_duration_ms
                    .observe(started.elapsed().as_millis() as f64);
                self.metrics
                    .outgoing_transfers
                    .set(transfers.outgoing.len() as i64);
                self.metrics
                    .incoming_transfers
                    .set(transfers.incoming.len() as i64);
            }
            Err(_) => self.metrics.reconcile_failures.inc(),
        }
        result
    }
}
