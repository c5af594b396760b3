use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

/// Releases waiters once a fixed number of completion signals have occurred.
///
/// The barrier is initialized with the batch size and signalled once per unit
/// that clears the final pipeline stage. The driver blocks on [`wait`] until
/// the count reaches zero; a pipeline that drops a unit leaves the barrier
/// hanging, surfacing the bug as a stuck run instead of masking it.
///
/// [`wait`]: CompletionBarrier::wait
#[derive(Debug, Clone)]
pub struct CompletionBarrier {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    remaining: AtomicUsize,
    done_tx: watch::Sender<bool>,
}

impl CompletionBarrier {
    /// Creates a barrier expecting `n` signals.
    ///
    /// With `n = 0` the barrier starts released and [`wait`] returns
    /// immediately.
    ///
    /// [`wait`]: CompletionBarrier::wait
    pub fn new(n: usize) -> Self {
        let (done_tx, _) = watch::channel(n == 0);

        Self {
            inner: Arc::new(Inner {
                remaining: AtomicUsize::new(n),
                done_tx,
            }),
        }
    }

    /// Records one completion. The call that brings the count to zero
    /// releases all current and future waiters.
    ///
    /// Signals beyond the expected count are ignored; the counter never wraps
    /// below zero.
    pub fn signal(&self) {
        let previous = self
            .inner
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |remaining| {
                remaining.checked_sub(1)
            });

        if previous == Ok(1) {
            self.inner.done_tx.send_replace(true);
        }
    }

    /// Waits until all expected signals have occurred.
    ///
    /// Returns immediately when the barrier has already been released.
    pub async fn wait(&self) {
        let mut done_rx = self.inner.done_tx.subscribe();

        // The sender lives inside `inner`, so the channel cannot close while
        // `self` is alive.
        let _ = done_rx.wait_for(|done| *done).await;
    }

    /// Number of signals still outstanding.
    pub fn remaining(&self) -> usize {
        self.inner.remaining.load(Ordering::Acquire)
    }
}
