use serde::Deserialize;
use thiserror::Error;

/// Errors returned when configuration values fail validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A worker count was configured as zero for the named stage.
    #[error("`{stage}.workers` must be greater than 0")]
    WorkersZero { stage: &'static str },

    /// The shutdown grace period was configured as zero.
    #[error("`shutdown_grace_ms` must be greater than 0")]
    ShutdownGraceZero,
}

/// Settings for the selection stage, where each customer picks a coffee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectionConfig {
    /// Maximum number of customers selecting a coffee at the same time.
    #[serde(default = "default_selection_workers")]
    pub workers: u16,
    /// Time, in milliseconds, a customer spends choosing a coffee.
    #[serde(default = "default_selection_duration_ms")]
    pub duration_ms: u64,
}

impl SelectionConfig {
    /// Default concurrency limit for the selection stage.
    pub const DEFAULT_WORKERS: u16 = 10;

    /// Default selection time in milliseconds.
    pub const DEFAULT_DURATION_MS: u64 = 500;
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            workers: default_selection_workers(),
            duration_ms: default_selection_duration_ms(),
        }
    }
}

fn default_selection_workers() -> u16 {
    SelectionConfig::DEFAULT_WORKERS
}

fn default_selection_duration_ms() -> u64 {
    SelectionConfig::DEFAULT_DURATION_MS
}

/// Settings for the payment stage, serviced by the cash register workers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaymentConfig {
    /// Number of cash register workers taking payments in parallel.
    #[serde(default = "default_payment_workers")]
    pub workers: u16,
    /// Time, in milliseconds, to process a cash payment.
    #[serde(default = "default_cash_ms")]
    pub cash_ms: u64,
    /// Time, in milliseconds, to process a credit card payment.
    #[serde(default = "default_credit_ms")]
    pub credit_ms: u64,
}

impl PaymentConfig {
    /// Default number of payment workers.
    pub const DEFAULT_WORKERS: u16 = 5;

    /// Default cash payment time in milliseconds.
    pub const DEFAULT_CASH_MS: u64 = 500;

    /// Default credit card payment time in milliseconds.
    pub const DEFAULT_CREDIT_MS: u64 = 250;
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            workers: default_payment_workers(),
            cash_ms: default_cash_ms(),
            credit_ms: default_credit_ms(),
        }
    }
}

fn default_payment_workers() -> u16 {
    PaymentConfig::DEFAULT_WORKERS
}

fn default_cash_ms() -> u64 {
    PaymentConfig::DEFAULT_CASH_MS
}

fn default_credit_ms() -> u64 {
    PaymentConfig::DEFAULT_CREDIT_MS
}

/// Settings for the dispense stage, serviced by the coffee machine workers.
///
/// The number of workers is also the number of coffee machines: each dispense
/// worker is permanently paired with one machine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DispenseConfig {
    /// Number of dispense workers (and coffee machines).
    #[serde(default = "default_dispense_workers")]
    pub workers: u16,
    /// Time, in milliseconds, for a customer to find a cup.
    #[serde(default = "default_find_cup_ms")]
    pub find_cup_ms: u64,
    /// Time, in milliseconds, to put the cup under the outlet.
    #[serde(default = "default_dock_cup_ms")]
    pub dock_cup_ms: u64,
    /// Time, in milliseconds, for the customer to take the cup and leave.
    #[serde(default = "default_take_cup_ms")]
    pub take_cup_ms: u64,
    /// Time, in milliseconds, to pour an espresso.
    #[serde(default = "default_espresso_ms")]
    pub espresso_ms: u64,
    /// Time, in milliseconds, to pour a latte.
    #[serde(default = "default_latte_ms")]
    pub latte_ms: u64,
    /// Time, in milliseconds, to pour a macchiato.
    #[serde(default = "default_macchiato_ms")]
    pub macchiato_ms: u64,
    /// Time, in milliseconds, to pour a cappuccino.
    #[serde(default = "default_cappuccino_ms")]
    pub cappuccino_ms: u64,
}

impl DispenseConfig {
    /// Default number of dispense workers.
    pub const DEFAULT_WORKERS: u16 = 2;

    /// Default cup lookup time in milliseconds.
    pub const DEFAULT_FIND_CUP_MS: u64 = 250;

    /// Default docking time in milliseconds.
    pub const DEFAULT_DOCK_CUP_MS: u64 = 250;

    /// Default take-and-leave time in milliseconds.
    pub const DEFAULT_TAKE_CUP_MS: u64 = 250;

    /// Default espresso pour time in milliseconds.
    pub const DEFAULT_ESPRESSO_MS: u64 = 250;

    /// Default latte pour time in milliseconds.
    pub const DEFAULT_LATTE_MS: u64 = 500;

    /// Default macchiato pour time in milliseconds.
    pub const DEFAULT_MACCHIATO_MS: u64 = 500;

    /// Default cappuccino pour time in milliseconds.
    pub const DEFAULT_CAPPUCCINO_MS: u64 = 750;
}

impl Default for DispenseConfig {
    fn default() -> Self {
        Self {
            workers: default_dispense_workers(),
            find_cup_ms: default_find_cup_ms(),
            dock_cup_ms: default_dock_cup_ms(),
            take_cup_ms: default_take_cup_ms(),
            espresso_ms: default_espresso_ms(),
            latte_ms: default_latte_ms(),
            macchiato_ms: default_macchiato_ms(),
            cappuccino_ms: default_cappuccino_ms(),
        }
    }
}

fn default_dispense_workers() -> u16 {
    DispenseConfig::DEFAULT_WORKERS
}

fn default_find_cup_ms() -> u64 {
    DispenseConfig::DEFAULT_FIND_CUP_MS
}

fn default_dock_cup_ms() -> u64 {
    DispenseConfig::DEFAULT_DOCK_CUP_MS
}

fn default_take_cup_ms() -> u64 {
    DispenseConfig::DEFAULT_TAKE_CUP_MS
}

fn default_espresso_ms() -> u64 {
    DispenseConfig::DEFAULT_ESPRESSO_MS
}

fn default_latte_ms() -> u64 {
    DispenseConfig::DEFAULT_LATTE_MS
}

fn default_macchiato_ms() -> u64 {
    DispenseConfig::DEFAULT_MACCHIATO_MS
}

fn default_cappuccino_ms() -> u64 {
    DispenseConfig::DEFAULT_CAPPUCCINO_MS
}

/// Configuration for one pipeline run.
///
/// Contains the per-stage worker counts and simulated service times, plus the
/// grace period granted to worker pools during shutdown.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Selection stage settings.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Payment stage settings.
    #[serde(default)]
    pub payment: PaymentConfig,
    /// Dispense stage settings.
    #[serde(default)]
    pub dispense: DispenseConfig,
    /// Time, in milliseconds, worker pools are given to stop before being
    /// forcibly terminated.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl SimulationConfig {
    /// Default shutdown grace period in milliseconds.
    pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 5000;

    /// Validates simulation configuration settings.
    ///
    /// Ensures every stage has at least one worker and the shutdown grace
    /// period is non-zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.selection.workers == 0 {
            return Err(ValidationError::WorkersZero { stage: "selection" });
        }

        if self.payment.workers == 0 {
            return Err(ValidationError::WorkersZero { stage: "payment" });
        }

        if self.dispense.workers == 0 {
            return Err(ValidationError::WorkersZero { stage: "dispense" });
        }

        if self.shutdown_grace_ms == 0 {
            return Err(ValidationError::ShutdownGraceZero);
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            selection: SelectionConfig::default(),
            payment: PaymentConfig::default(),
            dispense: DispenseConfig::default(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

fn default_shutdown_grace_ms() -> u64 {
    SimulationConfig::DEFAULT_SHUTDOWN_GRACE_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let config: SimulationConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.selection.workers, 10);
        assert_eq!(config.selection.duration_ms, 500);
        assert_eq!(config.payment.workers, 5);
        assert_eq!(config.payment.cash_ms, 500);
        assert_eq!(config.payment.credit_ms, 250);
        assert_eq!(config.dispense.workers, 2);
        assert_eq!(config.dispense.cappuccino_ms, 750);
        assert_eq!(config.shutdown_grace_ms, 5000);
    }

    #[test]
    fn zero_workers_fail_validation() {
        let mut config = SimulationConfig::default();
        config.payment.workers = 0;

        assert_eq!(
            config.validate(),
            Err(ValidationError::WorkersZero { stage: "payment" })
        );
    }

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"payment": {"workers": 8}}"#).unwrap();

        assert_eq!(config.payment.workers, 8);
        assert_eq!(config.payment.cash_ms, 500);
        assert_eq!(config.dispense.workers, 2);
    }
}
