//! Published session state.
//!
//! The engine owns a single [`SessionView`] behind a `tokio::sync::watch`
//! channel. Background tasks replace whole sub-objects of the view on
//! every publish; consumers either read the latest value or await changes
//! through the receiver. The view is plain data, fully serialisable, so a
//! frontend can mirror it without further chain access.

use serde::{Deserialize, Serialize};
use testament_reconciler::ReconciledTransfers;
use testament_session::Account;
use testament_types::{BlockNumber, Network};

/// Per-concern loading indicators.
///
/// Every flag starts `true` and flips to `false` exactly once, when the
/// first load of that concern completes. Refreshes never flip a flag back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingFlags {
    pub network: bool,
    pub user: bool,
    pub transaction_history: bool,
}

impl Default for LoadingFlags {
    fn default() -> Self {
        Self {
            network: true,
            user: true,
            transaction_history: true,
        }
    }
}

impl LoadingFlags {
    /// True while any concern is still on its first load.
    pub fn any(&self) -> bool {
        self.network || self.user || self.transaction_history
    }
}

/// Bootstrap progression of a session.
///
/// Phases advance strictly forward; a session never re-enters an earlier
/// phase, even when a later refresh fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapPhase {
    /// Querying the endpoint for its network identity.
    #[default]
    ResolvingNetwork,
    /// Concurrent first load of account state and block height.
    LoadingInitial,
    /// Checking the burner allowance gate.
    Gating,
    /// Fully bootstrapped; refreshers keep the view current.
    Ready,
}

/// A complete snapshot of session state, published over a watch channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: BootstrapPhase,
    pub loading: LoadingFlags,
    pub network: Network,
    pub account: Option<Account>,
    pub current_block: BlockNumber,
    pub authorized: bool,
    pub transfers: ReconciledTransfers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_view_starts_loading_everything() {
        let view = SessionView::default();
        assert_eq!(view.phase, BootstrapPhase::ResolvingNetwork);
        assert!(view.loading.network);
        assert!(view.loading.user);
        assert!(view.loading.transaction_history);
        assert!(view.loading.any());
        assert_eq!(view.network, Network::Unknown);
        assert!(view.account.is_none());
        assert!(!view.authorized);
    }

    #[test]
    fn view_round_trips_through_json() {
        let mut view = SessionView::default();
        view.phase = BootstrapPhase::Ready;
        view.loading = LoadingFlags {
            network: false,
            user: false,
            transaction_history: false,
        };
        view.network = Network::Test;
        view.authorized = true;

        let encoded = serde_json::to_string(&view).unwrap();
        let decoded: SessionView = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, view);
        assert!(!decoded.loading.any());
    }

    #[test]
    fn phase_uses_snake_case_spelling() {
        let encoded = serde_json::to_string(&BootstrapPhase::ResolvingNetwork).unwrap();
        assert_eq!(encoded, "\"resolving_network\"");
    }
}
