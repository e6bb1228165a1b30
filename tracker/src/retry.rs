//! Fixed-delay retry schedules.
//!
//! The engine's environment has no bounded SLA: a wallet provider appears
//! whenever the user unlocks it, a transaction indexes whenever the explorer
//! catches up. Production policies therefore retry forever; tests bound them
//! with `max_attempts` to keep otherwise-infinite loops finite.

use crate::cancel::CancelToken;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The standard delay between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// A fixed-delay retry schedule, optionally bounded.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    delay: Duration,
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever at a fixed delay.
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Give up after `max_attempts` failed attempts.
    pub fn bounded(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: Some(max_attempts),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Whether `attempts` failures exhaust this policy.
    pub fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }

    /// Run `op` until it succeeds, the policy is exhausted, or `cancel` fires.
    ///
    /// The delay between attempts races against cancellation, so teardown
    /// never waits out a pending sleep.
    pub async fn run<T, E, F, Fut>(
        &self,
        what: &'static str,
        cancel: &CancelToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut cancel = cancel.clone();
        let mut attempts = 0u32;
        loop {
            if cancel.is_cancelled() {
                return Err(RetryError::Cancelled);
            }
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempts += 1;
                    if self.exhausted(attempts) {
                        return Err(RetryError::Exhausted {
                            attempts,
                            source: err,
                        });
                    }
                    tracing::debug!(error = %err, attempts, "{what} failed, retrying");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                        _ = tokio::time::sleep(self.delay) => {}
                    }
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// The engine's standard schedule: one second between attempts, no limit.
    fn default() -> Self {
        Self::unbounded(DEFAULT_DELAY)
    }
}

/// Why a retried operation stopped without succeeding.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("operation cancelled")]
    Cancelled,

    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },
}
