use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::debug;

/// Unbounded hand-off channel between two pipeline stages.
///
/// Any number of upstream workers push completed units while any number of
/// downstream workers pop them; each unit is delivered to exactly one
/// consumer. Capacity is unbounded: a simulation batch is fully in memory
/// before launch, so the queue can never outgrow the batch itself.
#[derive(Debug)]
pub struct StageQueue<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<T>>>,
}

impl<T> Clone for StageQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T: Send> StageQueue<T> {
    /// Creates a new, empty stage queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Enqueues a unit. Never blocks.
    ///
    /// The queue owns a sender for its whole lifetime, so the channel only
    /// closes once every clone of the queue is gone; a unit pushed into a
    /// closed queue is dropped, which can only happen during teardown.
    pub fn push(&self, item: T) {
        if self.tx.send(item).is_err() {
            debug!("stage queue closed, dropping unit");
        }
    }

    /// Waits for the next unit. Each unit is delivered to exactly one caller.
    ///
    /// Cancel-safe: aborting the returned future never loses a queued unit,
    /// so callers may race it against a shutdown signal.
    pub async fn pop(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}

impl<T: Send> Default for StageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pushed_units_are_popped_in_order_by_a_single_consumer() {
        let queue = StageQueue::new();

        queue.push(1);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.pop().await, Some(1));
        assert_eq!(queue.pop().await, Some(2));
        assert_eq!(queue.pop().await, Some(3));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_consumers_each_receive_a_unit_exactly_once() {
        let queue = StageQueue::new();
        for value in 0..100u32 {
            queue.push(value);
        }

        // 4 consumers popping 25 units each drain the queue completely, no
        // matter how the units are distributed between them.
        let mut handles = Vec::new();
        for _ in 0..4 {
            let queue = queue.clone();
            handles.push(tokio::spawn(async move {
                let mut received = Vec::with_capacity(25);
                for _ in 0..25 {
                    if let Some(value) = queue.pop().await {
                        received.push(value);
                    }
                }
                received
            }));
        }

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }

        all.sort_unstable();
        assert_eq!(all, (0..100u32).collect::<Vec<_>>());
    }
}
