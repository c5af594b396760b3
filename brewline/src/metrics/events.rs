use std::time::Duration;

use crate::types::{CoffeeKind, PaymentMethod};

/// Outcome records emitted by stage workers while the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A payment completed at the register.
    CupSold {
        /// How the customer paid.
        payment: PaymentMethod,
    },
    /// A machine finished pouring a cup.
    CupDispensed {
        /// The brew that was poured.
        brew: CoffeeKind,
        /// Number of the machine that poured it.
        machine: usize,
    },
    /// A customer left the shop with their coffee.
    CustomerServed {
        /// Wall-clock time from selection entry to leaving the shop.
        service_time: Duration,
    },
}
