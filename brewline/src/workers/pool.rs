use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::concurrency::queue::StageQueue;
use crate::concurrency::shutdown::ShutdownRx;
use crate::error::{PipelineError, PipelineResult};
use crate::types::Customer;
use crate::workers::base::{Stage, StageStep};

/// Fixed-size pool of worker loops draining one stage queue.
///
/// Every worker runs the same loop: pop a customer from the input queue,
/// execute the stage step on it, repeat. Workers are symmetric apart from the
/// 1-based number handed to the step for reporting. The pool size is fixed at
/// construction.
#[derive(Debug)]
pub struct WorkerPool<S> {
    stage: Stage,
    size: usize,
    input: StageQueue<Customer>,
    step: Arc<S>,
    shutdown_rx: ShutdownRx,
    join_set: JoinSet<()>,
}

impl<S: StageStep> WorkerPool<S> {
    /// Creates a pool of `size` workers draining `input`.
    ///
    /// The pool subscribes to shutdown at construction, so a signal sent any
    /// time after `new` is observed by every worker.
    pub fn new(
        stage: Stage,
        size: usize,
        input: StageQueue<Customer>,
        step: S,
        shutdown_rx: ShutdownRx,
    ) -> Self {
        Self {
            stage,
            size,
            input,
            step: Arc::new(step),
            shutdown_rx,
            join_set: JoinSet::new(),
        }
    }

    /// Spawns the worker loops. Called once by the pipeline driver.
    pub fn start(&mut self) {
        for worker in 1..=self.size {
            let stage = self.stage;
            let input = self.input.clone();
            let step = Arc::clone(&self.step);
            let shutdown_rx = self.shutdown_rx.clone();

            self.join_set
                .spawn(worker_loop(stage, worker, input, step, shutdown_rx));
        }

        debug!(stage = %self.stage, size = self.size, "worker pool started");
    }

    /// Waits for all worker loops to exit after the shutdown signal was sent.
    ///
    /// Workers still running when `grace` elapses are forcibly terminated and
    /// the timeout is reported through [`PipelineError::PoolShutdownTimeout`];
    /// the caller decides whether that is a warning or a run failure.
    pub async fn stop(mut self, grace: Duration) -> PipelineResult<()> {
        let stage = self.stage;

        let join_set = &mut self.join_set;
        let drained = timeout(grace, async {
            while let Some(result) = join_set.join_next().await {
                if let Err(err) = result {
                    if err.is_cancelled() {
                        debug!(%stage, "worker task was cancelled");
                    } else {
                        warn!(%stage, error = %err, "worker task panicked");
                    }
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                %stage,
                grace_ms = grace.as_millis() as u64,
                "workers did not stop within the grace period, terminating them"
            );
            self.join_set.shutdown().await;

            return Err(PipelineError::PoolShutdownTimeout { stage });
        }

        debug!(%stage, "worker pool stopped");

        Ok(())
    }
}

/// The loop every pool worker runs until shutdown.
///
/// Both the blocking pop and the in-progress step are raced against the
/// shutdown signal, so neither an empty queue nor a slow service delay can
/// defer teardown. A customer in flight when shutdown arrives is dropped,
/// which is safe because shutdown is only requested once the barrier has
/// released or the whole run is being abandoned.
async fn worker_loop<S: StageStep>(
    stage: Stage,
    worker: usize,
    input: StageQueue<Customer>,
    step: Arc<S>,
    mut shutdown_rx: ShutdownRx,
) {
    loop {
        let customer = tokio::select! {
            biased;

            _ = shutdown_rx.changed() => {
                debug!(%stage, worker, "worker interrupted while waiting for work");
                break;
            }

            customer = input.pop() => {
                let Some(customer) = customer else {
                    break;
                };
                customer
            }
        };

        tokio::select! {
            biased;

            _ = shutdown_rx.changed() => {
                debug!(%stage, worker, "worker interrupted mid-service");
                break;
            }

            _ = step.process(worker, customer) => {}
        }
    }

    debug!(%stage, worker, "worker stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::concurrency::barrier::CompletionBarrier;
    use crate::concurrency::shutdown::create_shutdown_channel;
    use crate::types::{Customer, PaymentMethod};

    struct CountingStep {
        processed: Arc<AtomicUsize>,
        barrier: CompletionBarrier,
    }

    impl StageStep for CountingStep {
        async fn process(&self, _worker: usize, _customer: Customer) {
            self.processed.fetch_add(1, Ordering::SeqCst);
            self.barrier.signal();
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn pool_processes_every_queued_unit() {
        const UNITS: usize = 8;

        let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let queue = StageQueue::new();
        let barrier = CompletionBarrier::new(UNITS);
        let processed = Arc::new(AtomicUsize::new(0));

        let step = CountingStep {
            processed: Arc::clone(&processed),
            barrier: barrier.clone(),
        };
        let mut pool = WorkerPool::new(Stage::Payment, 3, queue.clone(), step, shutdown_rx);
        pool.start();

        for _ in 0..UNITS {
            queue.push(Customer::new(PaymentMethod::Cash));
        }

        barrier.wait().await;
        assert_eq!(processed.load(Ordering::SeqCst), UNITS);

        shutdown_tx.shutdown().unwrap();
        pool.stop(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn idle_pool_stops_within_the_grace_period() {
        let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
        let queue: StageQueue<Customer> = StageQueue::new();
        let step = CountingStep {
            processed: Arc::new(AtomicUsize::new(0)),
            barrier: CompletionBarrier::new(0),
        };

        let mut pool = WorkerPool::new(Stage::Dispense, 2, queue, step, shutdown_rx);
        pool.start();

        shutdown_tx.shutdown().unwrap();
        pool.stop(Duration::from_secs(1)).await.unwrap();
    }
}
