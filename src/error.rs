//! Crate error type.
//!
//! Structural problems (invalid instances, bad configuration, corrupt caches)
//! surface as [`Error`]. Infeasibility and time-budget exhaustion are normal
//! outcomes and are reported through [`Status`](crate::Status) values instead.

use crate::model::{InstanceStatus, Interval, Job};

/// Errors raised by instance loading, derived-table computation and solvers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The instance violates a structural invariant.
    #[error("invalid instance: {status:?} (job: {job:?}, interval: {interval:?})")]
    InvalidInstance {
        status: InstanceStatus,
        job: Option<Job>,
        interval: Option<Interval>,
    },

    /// The power-state diagram arrays are inconsistent.
    #[error("invalid state diagram: {0}")]
    InvalidStateDiagram(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The instance shape is valid but not handled by this solver.
    #[error("unsupported instance: {0}")]
    UnsupportedInstance(String),

    /// Optimal switching costs must be computed before this operation.
    #[error("optimal switching costs have not been computed")]
    SwitchingCostsNotComputed,

    /// A job has no assigned start time.
    #[error("job {job} has no start time")]
    MissingStartTime { job: u32 },

    /// No valid state path exists between two interval boundaries.
    #[error("no transition between interval boundaries {from} and {to}")]
    TransitionNotFound { from: usize, to: usize },

    /// A job or interval index is out of range.
    #[error("index {index} out of range for {what} (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// No solver is registered under the given name.
    #[error("unknown solver: {0}")]
    UnknownSolver(String),

    /// A cached extended instance was derived from a different instance.
    #[error("cached tables belong to instance {found}, expected {expected}")]
    CacheMismatch { expected: String, found: String },

    /// A cached extended instance was written by an incompatible version.
    #[error("unsupported cache version {found} (expected {expected})")]
    CacheVersion { expected: u32, found: u32 },

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// JSON encoding or decoding failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
