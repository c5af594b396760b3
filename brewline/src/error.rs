//! Error types and result definitions for pipeline runs.

use thiserror::Error;

use crate::workers::base::Stage;

/// Convenient result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Run-level failures surfaced by the pipeline driver.
///
/// Interruptions that are expected during teardown (a worker's blocking pop
/// or service delay being cancelled) are logged inside the worker loops and
/// never reach this type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// `launch` was called on a pipeline that already ran.
    #[error("the pipeline has already been launched and cannot be reused")]
    AlreadyLaunched,

    /// The run was cancelled before every customer cleared the pipeline.
    #[error("the run was cancelled before all customers were served")]
    BarrierAbandoned,

    /// A worker pool did not quiesce within the shutdown grace period and its
    /// workers were forcibly terminated.
    #[error("{stage} workers did not stop within the shutdown grace period")]
    PoolShutdownTimeout { stage: Stage },
}
