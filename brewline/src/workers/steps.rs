use std::time::Duration;

use brewline_config::shared::DispenseConfig;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::concurrency::barrier::CompletionBarrier;
use crate::concurrency::queue::StageQueue;
use crate::metrics::EventSink;
use crate::metrics::events::Event;
use crate::shop::machine::CoffeeMachine;
use crate::shop::register::CashRegister;
use crate::types::{Cup, Customer};
use crate::workers::base::StageStep;

/// Payment stage: collect the payment, then hand the customer to dispense.
#[derive(Debug)]
pub struct PaymentStep {
    register: CashRegister,
    output: StageQueue<Customer>,
}

impl PaymentStep {
    /// Creates the payment step servicing customers at `register` and handing
    /// them off through `output`.
    pub fn new(register: CashRegister, output: StageQueue<Customer>) -> Self {
        Self { register, output }
    }
}

impl StageStep for PaymentStep {
    async fn process(&self, _worker: usize, customer: Customer) {
        debug!("paying...");
        self.register.pay(customer.payment()).await;

        self.output.push(customer);
    }
}

/// Dispense stage: find a cup, pour at this worker's machine, take the cup
/// and leave. The terminal stage: it records the completion event and signals
/// the barrier instead of pushing to a queue.
#[derive(Debug)]
pub struct DispenseStep {
    machines: Vec<CoffeeMachine>,
    find_cup_delay: Duration,
    take_cup_delay: Duration,
    sink: EventSink,
    barrier: CompletionBarrier,
}

impl DispenseStep {
    /// Creates the dispense step.
    ///
    /// `machines` must hold one machine per dispense worker; worker `i` pours
    /// at `machines[i - 1]`.
    pub fn new(
        machines: Vec<CoffeeMachine>,
        config: &DispenseConfig,
        sink: EventSink,
        barrier: CompletionBarrier,
    ) -> Self {
        Self {
            machines,
            find_cup_delay: Duration::from_millis(config.find_cup_ms),
            take_cup_delay: Duration::from_millis(config.take_cup_ms),
            sink,
            barrier,
        }
    }
}

impl StageStep for DispenseStep {
    async fn process(&self, worker: usize, customer: Customer) {
        debug!(worker, "picking coffee...");

        // The customer looks for a cup first.
        sleep(self.find_cup_delay).await;

        let Some(brew) = customer.selection() else {
            // Selection is written before the first handoff; a customer
            // without one is a dropped unit and intentionally hangs the
            // barrier so the bug surfaces as a stuck run.
            warn!(worker, "customer reached dispense without a selection");
            return;
        };

        // Worker loops are numbered from one; each is paired with the machine
        // of the same number.
        let machine = &self.machines[worker - 1];
        let cup = machine.pour(Cup::empty(), brew).await;

        debug!(worker, "leaving...");
        sleep(self.take_cup_delay).await;
        drop(cup);

        if let Some(start) = customer.service_start() {
            self.sink.record(Event::CustomerServed {
                service_time: start.elapsed(),
            });
        }
        self.barrier.signal();
    }
}
