//! Coffee-shop simulator binary.
//!
//! Loads configuration, generates a random batch of customers, runs the
//! pipeline and writes a markdown report of the run.

use brewline_telemetry::tracing::init_tracing;
use tracing::error;

mod config;
mod core;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("simulator");

    if let Err(err) = core::start_simulator().await {
        error!(error = %err, "simulator failed");
        return Err(err);
    }

    Ok(())
}
