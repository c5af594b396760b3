use std::sync::Arc;
use std::time::Duration;

use brewline_config::shared::SimulationConfig;
use rand::Rng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::concurrency::barrier::CompletionBarrier;
use crate::concurrency::queue::StageQueue;
use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::EventSink;
use crate::metrics::events::Event;
use crate::shop::machine::CoffeeMachine;
use crate::shop::register::CashRegister;
use crate::types::{CoffeeKind, Customer};
use crate::workers::base::Stage;
use crate::workers::pool::WorkerPool;
use crate::workers::steps::{DispenseStep, PaymentStep};

pub type PipelineId = u64;

/// Lifecycle of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Idle,
    Running,
    Draining,
    Stopped,
}

/// Drives a batch of customers through the selection, payment and dispense
/// stages.
///
/// Selection fans out one task per customer, bounded by the configured
/// concurrency limit; payment and dispense are queue-fed worker pools. The
/// driver blocks until every customer has cleared the final stage, then stops
/// the pools and hands the recorded events to the caller.
///
/// An instance is not reusable after [`launch`].
///
/// [`launch`]: Pipeline::launch
#[derive(Debug)]
pub struct Pipeline {
    id: PipelineId,
    config: Arc<SimulationConfig>,
    sink: EventSink,
    state: PipelineState,
    shutdown_tx: ShutdownTx,
}

impl Pipeline {
    /// Creates an idle pipeline with the given configuration.
    pub fn new(id: PipelineId, config: SimulationConfig) -> Self {
        // Only the transmitter is kept; receivers are created on demand via
        // `subscribe`.
        let (shutdown_tx, _) = create_shutdown_channel();

        Self {
            id,
            config: Arc::new(config),
            sink: EventSink::new(),
            state: PipelineState::Idle,
            shutdown_tx,
        }
    }

    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// Returns a handle that cancels the run when `shutdown` is called on it.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Runs the full pipeline over `customers`, returning the recorded events
    /// once every customer has been served.
    ///
    /// Returns [`PipelineError::BarrierAbandoned`] when the run is cancelled
    /// through the shutdown handle before draining completes; no partial
    /// report is produced in that case.
    pub async fn launch(&mut self, customers: Vec<Customer>) -> PipelineResult<Vec<Event>> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::AlreadyLaunched);
        }
        self.state = PipelineState::Running;

        let total = customers.len();
        info!(pipeline_id = self.id, customers = total, "launching pipeline");

        let barrier = CompletionBarrier::new(total);
        let payment_queue = StageQueue::new();
        let dispense_queue = StageQueue::new();

        // Pools subscribe to shutdown before any work is dispatched, so none
        // of them can miss the signal.
        let register = CashRegister::new(&self.config.payment, self.sink.clone());
        let payment_step = PaymentStep::new(register, dispense_queue.clone());
        let mut payment_pool = WorkerPool::new(
            Stage::Payment,
            self.config.payment.workers as usize,
            payment_queue.clone(),
            payment_step,
            self.shutdown_tx.subscribe(),
        );

        let machines: Vec<CoffeeMachine> = (1..=self.config.dispense.workers as usize)
            .map(|number| CoffeeMachine::new(number, &self.config.dispense, self.sink.clone()))
            .collect();
        let dispense_step = DispenseStep::new(
            machines,
            &self.config.dispense,
            self.sink.clone(),
            barrier.clone(),
        );
        let mut dispense_pool = WorkerPool::new(
            Stage::Dispense,
            self.config.dispense.workers as usize,
            dispense_queue.clone(),
            dispense_step,
            self.shutdown_tx.subscribe(),
        );

        payment_pool.start();
        dispense_pool.start();

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut selection = self.spawn_selection(customers, payment_queue);

        // Selection completion only means every customer was handed off to
        // payment; the barrier below is what tracks full completion.
        let interrupted = tokio::select! {
            _ = shutdown_rx.changed() => true,
            _ = join_selection(&mut selection) => false,
        };
        if interrupted {
            return self.abandon(selection, payment_pool, dispense_pool).await;
        }

        self.state = PipelineState::Draining;
        debug!(pipeline_id = self.id, "all selections dispatched, draining");

        let abandoned = tokio::select! {
            _ = shutdown_rx.changed() => true,
            _ = barrier.wait() => false,
        };
        if abandoned {
            return self.abandon(selection, payment_pool, dispense_pool).await;
        }

        // Every customer has cleared the dispense stage; stop the pools and
        // hand the events to the caller.
        self.stop_pools(payment_pool, dispense_pool).await;
        self.state = PipelineState::Stopped;

        info!(pipeline_id = self.id, "pipeline drained");

        Ok(self.sink.drain())
    }

    /// Dispatches one selection task per customer, with fan-out bounded by
    /// the configured selection worker count.
    fn spawn_selection(
        &self,
        customers: Vec<Customer>,
        output: StageQueue<Customer>,
    ) -> JoinSet<()> {
        let permits = Arc::new(Semaphore::new(self.config.selection.workers as usize));
        let duration = Duration::from_millis(self.config.selection.duration_ms);

        let mut join_set = JoinSet::new();
        for mut customer in customers {
            let permits = Arc::clone(&permits);
            let output = output.clone();

            join_set.spawn(async move {
                // The semaphore is never closed, so acquisition only fails if
                // the task is aborted first.
                let Ok(_permit) = permits.acquire().await else {
                    return;
                };

                customer.mark_service_start();
                debug!(stage = %Stage::Selection, "selecting coffee...");
                tokio::time::sleep(duration).await;

                let brew = CoffeeKind::ALL[rand::thread_rng().gen_range(0..CoffeeKind::ALL.len())];
                customer.select(brew);

                output.push(customer);
            });
        }

        join_set
    }

    /// Force-stops the whole pipeline after an external cancellation.
    async fn abandon(
        &mut self,
        mut selection: JoinSet<()>,
        payment_pool: WorkerPool<PaymentStep>,
        dispense_pool: WorkerPool<DispenseStep>,
    ) -> PipelineResult<Vec<Event>> {
        warn!(pipeline_id = self.id, "run cancelled, force-stopping the pipeline");

        selection.shutdown().await;
        self.stop_pools(payment_pool, dispense_pool).await;
        self.state = PipelineState::Stopped;

        Err(PipelineError::BarrierAbandoned)
    }

    /// Signals shutdown and waits for both pools within the grace period.
    ///
    /// A pool that misses the grace period has already been forcibly
    /// terminated by the time `stop` returns, so the timeout is logged as an
    /// operational warning rather than escalated.
    async fn stop_pools(
        &self,
        payment_pool: WorkerPool<PaymentStep>,
        dispense_pool: WorkerPool<DispenseStep>,
    ) {
        if self.shutdown_tx.shutdown().is_err() {
            debug!(pipeline_id = self.id, "no workers were subscribed to shutdown");
        }

        let grace = Duration::from_millis(self.config.shutdown_grace_ms);
        if let Err(err) = payment_pool.stop(grace).await {
            warn!(pipeline_id = self.id, error = %err, "payment pool did not shut down cleanly");
        }
        if let Err(err) = dispense_pool.stop(grace).await {
            warn!(pipeline_id = self.id, error = %err, "dispense pool did not shut down cleanly");
        }
    }
}

/// Waits for every selection task to finish issuing its handoff.
async fn join_selection(join_set: &mut JoinSet<()>) {
    while let Some(result) = join_set.join_next().await {
        if let Err(err) = result {
            if !err.is_cancelled() {
                warn!(error = %err, "selection task panicked");
            }
        }
    }
}
