//! Concurrency primitives coordinating the simulation pipeline.
//!
//! The pipeline uses three primitives to coordinate its worker pools:
//!
//! - The [`shutdown`] module implements a broadcast shutdown channel: one
//!   signal terminates every subscribed worker, checked at each suspension
//!   point so teardown is never deferred by a slow service delay.
//! - The [`queue`] module implements the hand-off channel between two stages.
//!   A unit pushed by an upstream worker is delivered to exactly one
//!   downstream worker.
//! - The [`barrier`] module implements the completion barrier the driver
//!   blocks on until every submitted unit has cleared the final stage.

pub mod barrier;
pub mod queue;
pub mod shutdown;
