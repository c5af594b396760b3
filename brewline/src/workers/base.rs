use std::fmt;
use std::future::Future;

use crate::types::Customer;

/// The pipeline stages, used for logging and error reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Customers choose their coffee.
    Selection,
    /// Customers pay at the cash register.
    Payment,
    /// Customers pick up their coffee at a machine.
    Dispense,
}

impl Stage {
    /// Returns the stage name as it appears in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Selection => "selection",
            Stage::Payment => "payment",
            Stage::Dispense => "dispense",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stage's unit of work, executed by pool workers.
///
/// [`StageStep`] is the seam between the pool mechanics (queue draining,
/// shutdown handling) and the stage semantics (what servicing a customer
/// means). The step owns its downstream: on success it either pushes the
/// customer to the next stage's queue or, for the terminal stage, records the
/// completion and signals the barrier.
pub trait StageStep: Send + Sync + 'static {
    /// Services one customer.
    ///
    /// `worker` is the 1-based number of the worker loop executing the step;
    /// steps that care about worker identity (which machine pours) use it,
    /// others ignore it.
    fn process(&self, worker: usize, customer: Customer) -> impl Future<Output = ()> + Send;
}
