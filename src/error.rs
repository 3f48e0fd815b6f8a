//! Error taxonomy for allocation runs.
//!
//! Every error is detected synchronously, either while validating the input
//! models or while aggregating metrics. Nothing is retried: the core performs
//! no I/O, so a failure always means the caller handed in bad data.

use thiserror::Error;

/// Errors raised by policies, the optimizer, and the metrics aggregator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// The run as a whole is malformed (no units, duplicate ids,
    /// zero quantum, incomplete assignment).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A job has a non-positive length or an out-of-range time field.
    #[error("invalid job {job_id}: {reason}")]
    InvalidJob { job_id: usize, reason: String },

    /// An execution unit has a non-positive speed or a bad ready time.
    #[error("invalid resource {unit_id}: {reason}")]
    InvalidResource { unit_id: usize, reason: String },

    /// Metrics were requested on a schedule with no completed jobs.
    #[error("metrics requested on an empty result set")]
    EmptyResultSet,
}

impl ScheduleError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub(crate) fn job(job_id: usize, reason: impl Into<String>) -> Self {
        Self::InvalidJob {
            job_id,
            reason: reason.into(),
        }
    }

    pub(crate) fn resource(unit_id: usize, reason: impl Into<String>) -> Self {
        Self::InvalidResource {
            unit_id,
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;
