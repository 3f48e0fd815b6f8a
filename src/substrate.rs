//! Execution substrate: turns an assignment into realized start and finish
//! times.
//!
//! Policies decide what runs where. A substrate decides how time advances
//! while it runs. [`SpaceSharedSubstrate`] is the reference implementation:
//! each unit runs its jobs one at a time, in assignment order, at its own
//! speed.
//!
//! [`verify_schedule`] checks realized results against the estimator's
//! model without recomputing a schedule.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::estimate::execution_time;
use crate::models::{Assignment, ExecutionUnit, Job, ScheduleResult};

/// Executes an assignment and reports when each job actually ran.
pub trait ExecutionSubstrate {
    /// Runs every job in `assignment`, returning one result per entry in
    /// assignment order.
    fn execute(
        &mut self,
        assignment: &Assignment,
        jobs: &[Job],
        units: &[ExecutionUnit],
    ) -> Result<Vec<ScheduleResult>>;
}

/// One job at a time per unit, no preemption.
///
/// Each unit's clock starts at its `ready_time`; a job starts at
/// `max(unit clock, arrival)` and holds the unit for `length / speed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceSharedSubstrate;

impl SpaceSharedSubstrate {
    /// Creates the substrate.
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionSubstrate for SpaceSharedSubstrate {
    fn execute(
        &mut self,
        assignment: &Assignment,
        jobs: &[Job],
        units: &[ExecutionUnit],
    ) -> Result<Vec<ScheduleResult>> {
        let job_by_id: HashMap<usize, &Job> = jobs.iter().map(|j| (j.id, j)).collect();
        let unit_by_id: HashMap<usize, &ExecutionUnit> = units.iter().map(|u| (u.id, u)).collect();

        if let Some(job) = jobs.iter().find(|j| assignment.unit_of(j.id).is_none()) {
            return Err(ScheduleError::config(format!("job {} is not assigned", job.id)));
        }

        let mut clocks: HashMap<usize, f64> = HashMap::new();
        let mut seen = HashSet::with_capacity(assignment.len());
        let mut results = Vec::with_capacity(assignment.len());

        for (job_id, unit_id) in assignment.iter() {
            if !seen.insert(job_id) {
                return Err(ScheduleError::config(format!(
                    "job {job_id} is assigned more than once"
                )));
            }
            let job = job_by_id.get(&job_id).ok_or_else(|| {
                ScheduleError::config(format!("assignment references unknown job {job_id}"))
            })?;
            let unit = unit_by_id.get(&unit_id).ok_or_else(|| {
                ScheduleError::config(format!("job {job_id} assigned to unknown unit {unit_id}"))
            })?;

            let clock = clocks.entry(unit_id).or_insert(unit.ready_time);
            let start = clock.max(job.arrival_time);
            let finish = start + execution_time(job.length, unit)?;
            *clock = finish;

            debug!(job_id, unit_id, start, finish, "executed");
            results.push(ScheduleResult::new(job_id, unit_id, start, finish));
        }

        Ok(results)
    }
}

/// A disagreement between realized results and the job/unit model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum Discrepancy {
    /// A job has no result.
    #[error("job {job_id} has no result")]
    Missing { job_id: usize },

    /// A job has more than one result.
    #[error("job {job_id} appears more than once")]
    Duplicate { job_id: usize },

    /// A result names a job that was not submitted.
    #[error("result for unknown job {job_id}")]
    UnknownJob { job_id: usize },

    /// A result names a unit that does not exist.
    #[error("job {job_id} ran on unknown unit {unit_id}")]
    UnknownUnit { job_id: usize, unit_id: usize },

    /// Finish precedes start.
    #[error("job {job_id} finishes at {finish} before it starts at {start}")]
    NegativeSpan { job_id: usize, start: f64, finish: f64 },

    /// Start precedes arrival.
    #[error("job {job_id} starts at {start} before arriving at {arrival}")]
    EarlyStart {
        job_id: usize,
        start: f64,
        arrival: f64,
    },

    /// Elapsed time differs from `length / speed`.
    #[error("job {job_id} ran for {actual}s, expected {expected}s")]
    DurationMismatch {
        job_id: usize,
        expected: f64,
        actual: f64,
    },
}

/// Checks non-preemptive results against the jobs and units they claim to
/// describe.
///
/// Durations are compared with an absolute `tolerance` (s). Returns every
/// discrepancy found; an empty vector means the results are consistent.
pub fn verify_schedule(
    results: &[ScheduleResult],
    jobs: &[Job],
    units: &[ExecutionUnit],
    tolerance: f64,
) -> Vec<Discrepancy> {
    let job_by_id: HashMap<usize, &Job> = jobs.iter().map(|j| (j.id, j)).collect();
    let unit_by_id: HashMap<usize, &ExecutionUnit> = units.iter().map(|u| (u.id, u)).collect();

    let mut found = Vec::new();
    let mut seen = HashSet::new();

    for r in results {
        if !seen.insert(r.job_id) {
            found.push(Discrepancy::Duplicate { job_id: r.job_id });
        }
        if r.finish_time < r.start_time {
            found.push(Discrepancy::NegativeSpan {
                job_id: r.job_id,
                start: r.start_time,
                finish: r.finish_time,
            });
        }

        let Some(job) = job_by_id.get(&r.job_id) else {
            found.push(Discrepancy::UnknownJob { job_id: r.job_id });
            continue;
        };
        if r.start_time < job.arrival_time {
            found.push(Discrepancy::EarlyStart {
                job_id: r.job_id,
                start: r.start_time,
                arrival: job.arrival_time,
            });
        }

        let Some(unit) = unit_by_id.get(&r.unit_id) else {
            found.push(Discrepancy::UnknownUnit {
                job_id: r.job_id,
                unit_id: r.unit_id,
            });
            continue;
        };
        // A bad speed is reported by validation, not here.
        if let Ok(expected) = execution_time(job.length, unit) {
            let actual = r.span();
            if (actual - expected).abs() > tolerance {
                found.push(Discrepancy::DurationMismatch {
                    job_id: r.job_id,
                    expected,
                    actual,
                });
            }
        }
    }

    for job in jobs {
        if !seen.contains(&job.id) {
            found.push(Discrepancy::Missing { job_id: job.id });
        }
    }

    found
}
