//! Prometheus metrics for the engine.
//!
//! All metrics are registered against an owned [`Registry`] so that tests
//! can instantiate metrics without colliding with the global default
//! registry. Gather the registry via [`EngineMetrics::registry`] to export.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, IntCounter, IntGauge, Registry,
};

/// Counters, gauges and histograms tracking engine activity.
pub struct EngineMetrics {
    registry: Registry,

    /// Transactions handed to the chain endpoint.
    pub transactions_submitted: IntCounter,
    /// Transactions that reached a confirmed (successful) receipt.
    pub transactions_confirmed: IntCounter,
    /// Transactions that reached a failed receipt.
    pub transactions_failed: IntCounter,
    /// Explorer status polls issued while confirming transactions.
    pub status_polls: IntCounter,

    /// Completed ledger reconciliation passes.
    pub reconcile_passes: IntCounter,
    /// Reconciliation passes aborted by an error.
    pub reconcile_failures: IntCounter,
    /// Successful account state refreshes.
    pub account_refreshes: IntCounter,
    /// Account refreshes that failed and kept the previous view.
    pub account_refresh_failures: IntCounter,

    /// Latest block number observed on the active network.
    pub current_block: IntGauge,
    /// Outgoing transfers in the latest reconciled view.
    pub outgoing_transfers: IntGauge,
    /// Incoming transfers in the latest reconciled view.
    pub incoming_transfers: IntGauge,
    /// 1 when the active account holds a sufficient burner allowance.
    pub authorized: IntGauge,

    /// Wall-clock duration of a reconciliation pass in milliseconds.
    pub reconcile_duration_ms: Histogram,
}

impl EngineMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let transactions_submitted = register_int_counter_with_registry!(
            "testament_transactions_submitted_total",
            "Transactions handed to the chain endpoint",
            registry
        )
        .expect("metric registration");
        let transactions_confirmed = register_int_counter_with_registry!(
            "testament_transactions_confirmed_total",
            "Transactions confirmed successful on chain",
            registry
        )
        .expect("metric registration");
        let transactions_failed = register_int_counter_with_registry!(
            "testament_transactions_failed_total",
            "Transactions that reverted on chain",
            registry
        )
        .expect("metric registration");
        let status_polls = register_int_counter_with_registry!(
            "testament_status_polls_total",
            "Explorer status polls issued while confirming transactions",
            registry
        )
        .expect("metric registration");

        let reconcile_passes = register_int_counter_with_registry!(
            "testament_reconcile_passes_total",
            "Completed ledger reconciliation passes",
            registry
        )
        .expect("metric registration");
        let reconcile_failures = register_int_counter_with_registry!(
            "testament_reconcile_failures_total",
            "Reconciliation passes aborted by an error",
            registry
        )
        .expect("metric registration");
        let account_refreshes = register_int_counter_with_registry!(
            "testament_account_refreshes_total",
            "Successful account state refreshes",
            registry
        )
        .expect("metric registration");
        let account_refresh_failures = register_int_counter_with_registry!(
            "testament_account_refresh_failures_total",
            "Account refreshes that failed",
            registry
        )
        .expect("metric registration");

        let current_block = register_int_gauge_with_registry!(
            "testament_current_block",
            "Latest observed block number",
            registry
        )
        .expect("metric registration");
        let outgoing_transfers = register_int_gauge_with_registry!(
            "testament_outgoing_transfers",
            "Outgoing transfers in the reconciled view",
            registry
        )
        .expect("metric registration");
        let incoming_transfers = register_int_gauge_with_registry!(
            "testament_incoming_transfers",
            "Incoming transfers in the reconciled view",
            registry
        )
        .expect("metric registration");
        let authorized = register_int_gauge_with_registry!(
            "testament_authorized",
            "Whether the active account holds a sufficient allowance",
            registry
        )
        .expect("metric registration");

        let reconcile_duration_ms = register_histogram_with_registry!(
            "testament_reconcile_duration_ms",
            "Duration of a reconciliation pass in milliseconds",
            prometheus::exponential_buckets(1.0, 2.0, 14).expect("bucket layout"),
            registry
        )
        .expect("metric registration");

        Self {
            registry,
            transactions_submitted,
            transactions_confirmed,
            transactions_failed,
            status_polls,
            reconcile_passes,
            reconcile_failures,
            account_refreshes,
            account_refresh_failures,
            current_block,
            outgoing_transfers,
            incoming_transfers,
            authorized,
            reconcile_duration_ms,
        }
    }

    /// The registry holding every engine metric, for exporters.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}
