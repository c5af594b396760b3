//! Aggregates drained pipeline events into a human-readable markdown report.
//!
//! Rendering happens after the run, single-threaded, over the events the
//! driver drained from the sink. The three sections mirror the questions the
//! simulation answers: how many cups were sold and how they were paid for,
//! what each machine poured, and how long customers waited.

use std::time::Duration;

use crate::metrics::events::Event;
use crate::types::{CoffeeKind, PaymentMethod};

/// Renders the full report for a finished run.
///
/// `machines` is the number of coffee machines that took part, so machines
/// that poured nothing still show up with zero counts.
pub fn render(events: &[Event], machines: usize) -> String {
    let mut report = String::new();
    report.push_str(&cups_sold_section(events));
    report.push_str(&machine_section(events, machines));
    report.push_str(&service_time_section(events));
    report
}

fn cups_sold_section(events: &[Event]) -> String {
    let sold: Vec<PaymentMethod> = events
        .iter()
        .filter_map(|event| match event {
            Event::CupSold { payment } => Some(*payment),
            _ => None,
        })
        .collect();

    let mut section = String::from("# Cups Sold\n");
    section.push_str(&format!("Total: {}\n\n", sold.len()));
    for method in PaymentMethod::ALL {
        let count = sold.iter().filter(|payment| **payment == method).count();
        section.push_str(&format!("Cups sold for {method}: {count}\n\n"));
    }
    section
}

fn machine_section(events: &[Event], machines: usize) -> String {
    let mut section = String::from("# Coffee machine stats\n");

    for number in 1..=machines {
        let poured: Vec<CoffeeKind> = events
            .iter()
            .filter_map(|event| match event {
                Event::CupDispensed { brew, machine } if *machine == number => Some(*brew),
                _ => None,
            })
            .collect();

        section.push_str(&format!("## Coffee machine {number}\n\n"));
        section.push_str(&format!("Total cups dispensed: {}\n\n", poured.len()));
        for kind in CoffeeKind::ALL {
            let count = poured.iter().filter(|brew| **brew == kind).count();
            section.push_str(&format!("{kind} dispensed: {count}\n\n"));
        }
    }

    section
}

fn service_time_section(events: &[Event]) -> String {
    let service_times: Vec<Duration> = events
        .iter()
        .filter_map(|event| match event {
            Event::CustomerServed { service_time } => Some(*service_time),
            _ => None,
        })
        .collect();

    let mut section = String::from("# Service time\n");

    let Some(min) = service_times.iter().min() else {
        section.push_str("No customers were served.\n");
        return section;
    };
    // min exists, so max and the average are defined too.
    let max = service_times.iter().max().unwrap_or(min);
    let average_ms =
        service_times.iter().map(Duration::as_millis).sum::<u128>() / service_times.len() as u128;

    section.push_str(&format!(
        "Min service time: {} milliseconds\n\n",
        min.as_millis()
    ));
    section.push_str(&format!("Average service time: {average_ms} milliseconds\n\n"));
    section.push_str(&format!(
        "Max service time: {} milliseconds\n\n",
        max.as_millis()
    ));
    section
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cups_by_payment_method_and_machine() {
        let events = vec![
            Event::CupSold {
                payment: PaymentMethod::Cash,
            },
            Event::CupSold {
                payment: PaymentMethod::Cash,
            },
            Event::CupSold {
                payment: PaymentMethod::Credit,
            },
            Event::CupDispensed {
                brew: CoffeeKind::Latte,
                machine: 1,
            },
            Event::CupDispensed {
                brew: CoffeeKind::Espresso,
                machine: 2,
            },
            Event::CupDispensed {
                brew: CoffeeKind::Latte,
                machine: 2,
            },
            Event::CustomerServed {
                service_time: Duration::from_millis(100),
            },
            Event::CustomerServed {
                service_time: Duration::from_millis(300),
            },
        ];

        let report = render(&events, 2);

        assert!(report.contains("Total: 3"));
        assert!(report.contains("Cups sold for cash: 2"));
        assert!(report.contains("Cups sold for credit: 1"));
        assert!(report.contains("## Coffee machine 1"));
        assert!(report.contains("## Coffee machine 2"));
        assert!(report.contains("Min service time: 100 milliseconds"));
        assert!(report.contains("Average service time: 200 milliseconds"));
        assert!(report.contains("Max service time: 300 milliseconds"));
    }

    #[test]
    fn machine_counts_are_split_by_machine_number() {
        let events = vec![
            Event::CupDispensed {
                brew: CoffeeKind::Cappuccino,
                machine: 1,
            },
            Event::CupDispensed {
                brew: CoffeeKind::Cappuccino,
                machine: 1,
            },
        ];

        let report = render(&events, 2);
        let machine_two = report.split("## Coffee machine 2").nth(1).unwrap();

        assert!(machine_two.contains("Total cups dispensed: 0"));
    }

    #[test]
    fn empty_run_renders_without_panicking() {
        let report = render(&[], 2);

        assert!(report.contains("Total: 0"));
        assert!(report.contains("No customers were served."));
    }
}
