use std::fs;
use std::path::PathBuf;

use brewline::generator::CustomerGenerator;
use brewline::metrics::report;
use brewline::pipeline::Pipeline;
use tracing::{error, info, warn};

use crate::config::load_simulator_config;

/// Runs one simulation from configuration to written report.
pub async fn start_simulator() -> anyhow::Result<()> {
    let config = load_simulator_config()?;

    let customers = CustomerGenerator::default().generate(config.customers as usize);
    let batch_size = customers.len();
    let machine_count = config.simulation.dispense.workers as usize;

    let mut pipeline = Pipeline::new(config.id, config.simulation);

    // Ctrl+C cancels the run instead of killing the process abruptly.
    let shutdown_tx = pipeline.shutdown_tx();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            return;
        }

        info!("ctrl-c received, shutting down the pipeline");
        if shutdown_tx.shutdown().is_err() {
            warn!("no pipeline workers were listening for shutdown");
        }
    });

    let events = pipeline.launch(customers).await?;

    let rendered = report::render(&events, machine_count);
    let report_path =
        PathBuf::from(&config.report_dir).join(format!("report-{batch_size}-customers.md"));

    fs::create_dir_all(&config.report_dir)?;
    fs::write(&report_path, rendered)?;
    info!(path = %report_path.display(), "report written");

    Ok(())
}
