//! Input validation for allocation runs.
//!
//! Checks structural integrity of jobs and execution units before any
//! policy touches them. Detects:
//! - Empty unit pools
//! - Duplicate IDs
//! - Non-positive or non-finite speeds and lengths
//! - Negative arrival times, non-positive deadlines
//!
//! Policies call [`validate_input`] before mutating anything, so a run
//! either commits every job or fails with no side effects.

use std::collections::HashSet;

use crate::error::{Result, ScheduleError};
use crate::models::{ExecutionUnit, Job};

/// Collects every problem in the input.
///
/// Returns an empty vector if the input is valid.
pub fn collect_violations(jobs: &[Job], units: &[ExecutionUnit]) -> Vec<ScheduleError> {
    let mut errors = Vec::new();

    if units.is_empty() {
        errors.push(ScheduleError::config("at least one execution unit is required"));
    }

    let mut unit_ids = HashSet::new();
    for unit in units {
        if !unit_ids.insert(unit.id) {
            errors.push(ScheduleError::config(format!(
                "duplicate unit ID: {}",
                unit.id
            )));
        }
        if !(unit.speed_mips.is_finite() && unit.speed_mips > 0.0) {
            errors.push(ScheduleError::resource(
                unit.id,
                format!("speed must be positive, got {}", unit.speed_mips),
            ));
        }
        if !(unit.ready_time.is_finite() && unit.ready_time >= 0.0) {
            errors.push(ScheduleError::resource(
                unit.id,
                format!("ready time must be non-negative, got {}", unit.ready_time),
            ));
        }
    }

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id) {
            errors.push(ScheduleError::config(format!("duplicate job ID: {}", job.id)));
        }
        if job.length == 0 {
            errors.push(ScheduleError::job(job.id, "length must be positive"));
        }
        if job.remaining > job.length {
            errors.push(ScheduleError::job(
                job.id,
                format!(
                    "remaining work {} exceeds length {}",
                    job.remaining, job.length
                ),
            ));
        }
        if !(job.arrival_time.is_finite() && job.arrival_time >= 0.0) {
            errors.push(ScheduleError::job(
                job.id,
                format!("arrival time must be non-negative, got {}", job.arrival_time),
            ));
        }
        if let Some(deadline) = job.deadline {
            if !(deadline.is_finite() && deadline > 0.0) {
                errors.push(ScheduleError::job(
                    job.id,
                    format!("deadline must be positive, got {deadline}"),
                ));
            }
        }
    }

    errors
}

/// Validates the input, returning the first problem found.
pub fn validate_input(jobs: &[Job], units: &[ExecutionUnit]) -> Result<()> {
    match collect_violations(jobs, units).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
