//! Cooperative cancellation for retry loops and periodic tasks.
//!
//! Session teardown owns a [`CancelSource`]; every suspension point in the
//! engine holds a [`CancelToken`] and races its delay against `cancelled()`.
//! Unlike a task abort this leaves no half-written state behind: loops only
//! observe cancellation between operations.

use tokio::sync::watch;

/// The cancelling side. One per session.
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Hand out a token observing this source.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal cancellation to every outstanding token.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// The observing side, cheap to clone into every loop.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once the owning source cancels.
    ///
    /// A dropped source counts as cancellation; a loop whose session is gone
    /// has nothing left to do.
    pub async fn cancelled(&mut self) {
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }
}
