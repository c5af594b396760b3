use anyhow::Context;
use brewline_config::load::load_config;
use brewline_config::shared::SimulatorConfig;

/// Loads and validates the simulator configuration from the `configuration/`
/// directory and `APP_`-prefixed environment variables.
pub fn load_simulator_config() -> anyhow::Result<SimulatorConfig> {
    let config: SimulatorConfig =
        load_config().context("failed to load the simulator configuration")?;
    config
        .validate()
        .context("the simulator configuration is invalid")?;

    Ok(config)
}
