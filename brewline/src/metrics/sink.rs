use std::sync::{Arc, Mutex};

use crate::metrics::events::Event;

/// Append-only, concurrency-safe collector of outcome events.
///
/// Workers record events concurrently while the pipeline runs; the driver
/// drains the sink exactly once, after every pool has stopped, so the read
/// never races a write. Ordering between events from different workers is
/// unspecified, but each worker's own events keep their submission order.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventSink {
    /// Creates a new, empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event. Safe to call from any number of concurrent tasks.
    pub fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    /// Takes all recorded events, leaving the sink empty.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Whether the sink holds no events.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_writers_lose_no_events() {
        const WRITERS: u64 = 8;
        const EVENTS_PER_WRITER: u64 = 50;

        let sink = EventSink::new();

        let mut handles = Vec::new();
        for writer in 0..WRITERS {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                for sequence in 0..EVENTS_PER_WRITER {
                    // Encode (writer, sequence) in the duration so the drained
                    // result can be checked per writer.
                    sink.record(Event::CustomerServed {
                        service_time: Duration::from_micros(writer * 1000 + sequence),
                    });
                    tokio::task::yield_now().await;
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let events = sink.drain();
        assert_eq!(events.len(), (WRITERS * EVENTS_PER_WRITER) as usize);

        // Each writer's events must appear in submission order.
        for writer in 0..WRITERS {
            let sequences: Vec<u64> = events
                .iter()
                .filter_map(|event| match event {
                    Event::CustomerServed { service_time } => {
                        let encoded = service_time.as_micros() as u64;
                        (encoded / 1000 == writer).then_some(encoded % 1000)
                    }
                    _ => None,
                })
                .collect();

            assert_eq!(sequences, (0..EVENTS_PER_WRITER).collect::<Vec<_>>());
        }
    }

    #[test]
    fn drain_empties_the_sink() {
        let sink = EventSink::new();
        sink.record(Event::CustomerServed {
            service_time: Duration::from_millis(1),
        });

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.is_empty());
    }
}
