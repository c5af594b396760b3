//! Shared configuration types for brewline simulations.

mod simulation;
mod simulator;

pub use simulation::{
    DispenseConfig, PaymentConfig, SelectionConfig, SimulationConfig, ValidationError,
};
pub use simulator::SimulatorConfig;
