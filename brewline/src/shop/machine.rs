use std::time::Duration;

use brewline_config::shared::DispenseConfig;
use tokio::time::sleep;

use crate::metrics::EventSink;
use crate::metrics::events::Event;
use crate::types::{CoffeeKind, Cup};

/// A numbered coffee machine.
///
/// The number identifies the machine in reports; it is assigned at
/// construction and never shared between machines.
#[derive(Debug)]
pub struct CoffeeMachine {
    number: usize,
    sink: EventSink,
    dock_delay: Duration,
    espresso_delay: Duration,
    latte_delay: Duration,
    macchiato_delay: Duration,
    cappuccino_delay: Duration,
}

impl CoffeeMachine {
    /// Creates machine `number` with the configured pour times.
    pub fn new(number: usize, config: &DispenseConfig, sink: EventSink) -> Self {
        Self {
            number,
            sink,
            dock_delay: Duration::from_millis(config.dock_cup_ms),
            espresso_delay: Duration::from_millis(config.espresso_ms),
            latte_delay: Duration::from_millis(config.latte_ms),
            macchiato_delay: Duration::from_millis(config.macchiato_ms),
            cappuccino_delay: Duration::from_millis(config.cappuccino_ms),
        }
    }

    /// This machine's number, as it appears in reports.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Docks the cup under the outlet, pours the requested brew and records
    /// a [`Event::CupDispensed`] once the cup is full.
    pub async fn pour(&self, mut cup: Cup, brew: CoffeeKind) -> Cup {
        // Put the cup under the outlet.
        sleep(self.dock_delay).await;
        // Wait until the cup is filled.
        sleep(self.pour_delay(brew)).await;

        cup.fill(brew);
        self.sink.record(Event::CupDispensed {
            brew,
            machine: self.number,
        });

        cup
    }

    fn pour_delay(&self, brew: CoffeeKind) -> Duration {
        match brew {
            CoffeeKind::Espresso => self.espresso_delay,
            CoffeeKind::Latte => self.latte_delay,
            CoffeeKind::Macchiato => self.macchiato_delay,
            CoffeeKind::Cappuccino => self.cappuccino_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> DispenseConfig {
        DispenseConfig {
            workers: 1,
            find_cup_ms: 1,
            dock_cup_ms: 1,
            take_cup_ms: 1,
            espresso_ms: 1,
            latte_ms: 1,
            macchiato_ms: 1,
            cappuccino_ms: 1,
        }
    }

    #[tokio::test]
    async fn pouring_fills_the_cup_and_records_the_machine_number() {
        let sink = EventSink::new();
        let machine = CoffeeMachine::new(3, &fast_config(), sink.clone());

        let cup = machine.pour(Cup::empty(), CoffeeKind::Macchiato).await;

        assert_eq!(cup.brew(), Some(CoffeeKind::Macchiato));
        assert_eq!(
            sink.drain(),
            vec![Event::CupDispensed {
                brew: CoffeeKind::Macchiato,
                machine: 3
            }]
        );
    }
}
