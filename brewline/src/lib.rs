pub mod concurrency;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod pipeline;
pub mod shop;
pub mod types;
pub mod workers;
