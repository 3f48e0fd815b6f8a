//! Completion-time estimator.
//!
//! The single source of truth for how long a job takes on a unit. Every
//! greedy policy, the round-robin scheduler, the hill-climbing objective,
//! and the reference substrate route through these functions, so all of
//! them agree to the last bit on every duration.
//!
//! ```text
//! completion = ready_time + length / speed_mips
//! ```

use crate::error::{Result, ScheduleError};
use crate::models::{ExecutionUnit, Job};

/// Time to execute `work` instructions (MI) on `unit` (s).
///
/// # Errors
/// `InvalidResource` if the unit's speed is not positive.
pub fn execution_time(work: u64, unit: &ExecutionUnit) -> Result<f64> {
    if !(unit.speed_mips > 0.0) {
        return Err(ScheduleError::resource(
            unit.id,
            format!("speed must be positive, got {}", unit.speed_mips),
        ));
    }
    Ok(work as f64 / unit.speed_mips)
}

/// Completion time of `job` on `unit` when started at `unit_ready_time`.
///
/// Uses the job's full length; the job's `remaining` field is ignored.
///
/// # Errors
/// `InvalidResource` if the unit's speed is not positive.
pub fn estimate_completion(job: &Job, unit: &ExecutionUnit, unit_ready_time: f64) -> Result<f64> {
    Ok(unit_ready_time + execution_time(job.length, unit)?)
}
