use std::time::{Duration, Instant};

use brewline::error::PipelineError;
use brewline::generator::CustomerGenerator;
use brewline::metrics::events::Event;
use brewline::pipeline::Pipeline;
use brewline_config::shared::{
    DispenseConfig, PaymentConfig, SelectionConfig, SimulationConfig,
};
use brewline_telemetry::tracing::init_test_tracing;

/// Builds a configuration where every simulated delay is `delay_ms`, so test
/// expectations stay easy to reason about.
fn uniform_config(
    selection_workers: u16,
    payment_workers: u16,
    dispense_workers: u16,
    delay_ms: u64,
) -> SimulationConfig {
    SimulationConfig {
        selection: SelectionConfig {
            workers: selection_workers,
            duration_ms: delay_ms,
        },
        payment: PaymentConfig {
            workers: payment_workers,
            cash_ms: delay_ms,
            credit_ms: delay_ms,
        },
        dispense: DispenseConfig {
            workers: dispense_workers,
            find_cup_ms: delay_ms,
            dock_cup_ms: delay_ms,
            take_cup_ms: delay_ms,
            espresso_ms: delay_ms,
            latte_ms: delay_ms,
            macchiato_ms: delay_ms,
            cappuccino_ms: delay_ms,
        },
        shutdown_grace_ms: 1000,
    }
}

fn count_served(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::CustomerServed { .. }))
        .count()
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_batch_returns_immediately_with_no_events() {
    init_test_tracing();

    let mut pipeline = Pipeline::new(1, uniform_config(2, 2, 2, 5));
    let started = Instant::now();

    let events = pipeline.launch(Vec::new()).await.unwrap();

    assert!(events.is_empty());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn every_customer_is_served_exactly_once() {
    init_test_tracing();

    let customers = CustomerGenerator::default().generate(100);
    let mut pipeline = Pipeline::new(2, uniform_config(10, 5, 2, 5));

    let events = pipeline.launch(customers).await.unwrap();

    assert_eq!(count_served(&events), 100);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::CupSold { .. }))
            .count(),
        100
    );
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::CupDispensed { .. }))
            .count(),
        100
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn service_time_covers_every_stage_delay() {
    init_test_tracing();

    const DELAY_MS: u64 = 10;

    let customers = CustomerGenerator::default().generate(10);
    let mut pipeline = Pipeline::new(3, uniform_config(10, 4, 2, DELAY_MS));

    let events = pipeline.launch(customers).await.unwrap();

    // The critical path per customer is selection + payment + find cup +
    // dock + pour + take: six delays of `DELAY_MS` each.
    let critical_path = Duration::from_millis(6 * DELAY_MS);
    for event in &events {
        if let Event::CustomerServed { service_time } = event {
            assert!(
                *service_time >= critical_path,
                "service time {service_time:?} is shorter than the critical path {critical_path:?}"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn dispensed_cups_carry_valid_machine_numbers() {
    init_test_tracing();

    let customers = CustomerGenerator::default().generate(20);
    let mut pipeline = Pipeline::new(4, uniform_config(5, 3, 2, 2));

    let events = pipeline.launch(customers).await.unwrap();

    for event in &events {
        if let Event::CupDispensed { machine, .. } = event {
            assert!(
                (1..=2).contains(machine),
                "machine number {machine} is outside the dispense pool"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_cannot_be_relaunched() {
    init_test_tracing();

    let mut pipeline = Pipeline::new(5, uniform_config(2, 2, 2, 1));

    pipeline.launch(Vec::new()).await.unwrap();
    let second = pipeline.launch(Vec::new()).await;

    assert_eq!(second, Err(PipelineError::AlreadyLaunched));
}

#[tokio::test(flavor = "multi_thread")]
async fn adding_payment_workers_does_not_reduce_throughput() {
    init_test_tracing();

    async fn run_with_payment_workers(workers: u16) -> Duration {
        let mut config = uniform_config(16, workers, 4, 1);
        // Make payment the bottleneck stage.
        config.payment.cash_ms = 20;
        config.payment.credit_ms = 20;

        let customers = CustomerGenerator::default().generate(16);
        let mut pipeline = Pipeline::new(6, config);

        let started = Instant::now();
        let events = pipeline.launch(customers).await.unwrap();
        assert_eq!(count_served(&events), 16);

        started.elapsed()
    }

    // 16 customers through a single payment worker serialize on its 20ms
    // transactions; four workers split that work.
    let serial = run_with_payment_workers(1).await;
    let parallel = run_with_payment_workers(4).await;

    assert!(
        parallel < serial,
        "four payment workers ({parallel:?}) should beat one ({serial:?})"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn cancellation_abandons_the_run_within_the_grace_period() {
    init_test_tracing();

    // Selection takes far longer than the test is willing to wait, so the
    // run can only end through cancellation.
    let mut config = uniform_config(4, 2, 2, 1);
    config.selection.duration_ms = 60_000;
    config.shutdown_grace_ms = 500;

    let customers = CustomerGenerator::default().generate(8);
    let mut pipeline = Pipeline::new(7, config);
    let shutdown_tx = pipeline.shutdown_tx();

    let run = tokio::spawn(async move { pipeline.launch(customers).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.shutdown().unwrap();

    let started = Instant::now();
    let result = run.await.unwrap();

    assert_eq!(result, Err(PipelineError::BarrierAbandoned));
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "force-stop must complete within the grace period"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn cancellation_mid_drain_abandons_the_run() {
    init_test_tracing();

    // Fast selection, slow dispense: the shutdown arrives while the run is
    // draining through the terminal stage.
    let mut config = uniform_config(8, 4, 1, 1);
    config.dispense.espresso_ms = 60_000;
    config.dispense.latte_ms = 60_000;
    config.dispense.macchiato_ms = 60_000;
    config.dispense.cappuccino_ms = 60_000;
    config.shutdown_grace_ms = 500;

    let customers = CustomerGenerator::default().generate(8);
    let mut pipeline = Pipeline::new(8, config);
    let shutdown_tx = pipeline.shutdown_tx();

    let run = tokio::spawn(async move { pipeline.launch(customers).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.shutdown().unwrap();

    let result = run.await.unwrap();
    assert_eq!(result, Err(PipelineError::BarrierAbandoned));
}
