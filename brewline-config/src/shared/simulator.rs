use serde::Deserialize;

use crate::shared::simulation::{SimulationConfig, ValidationError};

/// Top-level configuration for the simulator binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatorConfig {
    /// Identifier stamped on the run, used in log lines.
    pub id: u64,
    /// Number of random customers to generate for the run.
    pub customers: u32,
    /// Directory the markdown report is written into.
    pub report_dir: String,
    /// Simulation timing and parallelism settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl SimulatorConfig {
    /// Validates the simulator configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.simulation.validate()
    }
}
