use std::time::Duration;

use brewline_config::shared::PaymentConfig;
use tokio::time::sleep;

use crate::metrics::EventSink;
use crate::metrics::events::Event;
use crate::types::PaymentMethod;

/// The cash register: one timed transaction per customer, then a
/// [`Event::CupSold`] record.
#[derive(Debug)]
pub struct CashRegister {
    sink: EventSink,
    cash_delay: Duration,
    credit_delay: Duration,
}

impl CashRegister {
    /// Creates a register with the configured per-method handling times.
    pub fn new(config: &PaymentConfig, sink: EventSink) -> Self {
        Self {
            sink,
            cash_delay: Duration::from_millis(config.cash_ms),
            credit_delay: Duration::from_millis(config.credit_ms),
        }
    }

    /// Processes a payment, suspending the worker for the method-specific
    /// handling time.
    pub async fn pay(&self, payment: PaymentMethod) {
        let delay = match payment {
            PaymentMethod::Cash => self.cash_delay,
            PaymentMethod::Credit => self.credit_delay,
        };
        sleep(delay).await;

        self.sink.record(Event::CupSold { payment });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn payment_records_a_cup_sold_event() {
        let config = PaymentConfig {
            workers: 1,
            cash_ms: 1,
            credit_ms: 1,
        };
        let sink = EventSink::new();
        let register = CashRegister::new(&config, sink.clone());

        register.pay(PaymentMethod::Credit).await;

        assert_eq!(
            sink.drain(),
            vec![Event::CupSold {
                payment: PaymentMethod::Credit
            }]
        );
    }
}
