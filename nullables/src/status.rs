//! Nullable status lookup — scripted explorer answers.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use testament_tracker::{StatusError, StatusLookup, TxStatus};
use testament_types::{Network, TxHash};

/// A test status lookup that answers from a queued script, then falls back
/// to a fixed status once the script is exhausted.
pub struct NullStatusLookup {
    script: Mutex<VecDeque<Result<TxStatus, StatusError>>>,
    fallback: TxStatus,
    polls: AtomicU32,
}

impl NullStatusLookup {
    fn with_fallback(fallback: TxStatus) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            polls: AtomicU32::new(0),
        }
    }

    /// Every unscripted poll confirms.
    pub fn confirming() -> Self {
        Self::with_fallback(TxStatus::Success)
    }

    /// Every unscripted poll reports on-chain failure.
    pub fn failing() -> Self {
        Self::with_fallback(TxStatus::Failure)
    }

    /// Every unscripted poll stays unresolved; pair with a bounded retry
    /// policy or a cancellation token.
    pub fn pending() -> Self {
        Self::with_fallback(TxStatus::Unknown)
    }

    /// Queue an answer for the next poll, ahead of the fallback.
    pub fn enqueue(&self, answer: Result<TxStatus, StatusError>) {
        self.script.lock().unwrap().push_back(answer);
    }

    /// Number of polls answered so far.
    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusLookup for NullStatusLookup {
    async fn transaction_status(
        &self,
        _hash: &TxHash,
        _network: Network,
    ) -> Result<TxStatus, StatusError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(answer) => answer,
            None => Ok(self.fallback),
        }
    }
}
