//! Allocation policies and schedule metrics.
//!
//! # Policies
//!
//! | Policy | Kind | Selection |
//! |--------|------|-----------|
//! | FCFS | list, arrival-gated | earliest arrival |
//! | SJF | list, arrival-gated | shortest length |
//! | EDF | list, arrival-gated | earliest deadline |
//! | Min-Min | batch | globally smallest completion time |
//! | Min-Max | batch | largest per-job best completion time |
//! | Deadline Min-Min | batch | earliest deadline, then smallest completion |
//! | Round-Robin | preemptive | FIFO queue, quantum slices, least-loaded unit |
//!
//! Every policy validates its input before mutating anything, resets each
//! job's remaining work, and routes all durations through
//! [`crate::estimate`].
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4-5
//! - Braun et al. (2001), "A Comparison of Eleven Static Heuristics for
//!   Mapping a Class of Independent Tasks onto Heterogeneous Distributed
//!   Computing Systems" (Min-Min, Max-Min)

mod batch;
mod list;
mod metrics;
mod round_robin;

pub use batch::{BatchHeuristic, BatchScheduler};
pub use list::ListScheduler;
pub use metrics::{JobMetrics, ScheduleMetrics};
pub use round_robin::{QuantumAnalysis, QuantumOutcome, RoundRobinScheduler};

use crate::error::Result;
use crate::estimate::estimate_completion;
use crate::models::{ExecutionUnit, Job, Schedule};

/// A policy that places every job on a unit.
///
/// Implementations advance `units[..].ready_time` as they commit work and
/// leave every job with `remaining == 0`.
pub trait AllocationPolicy {
    /// Policy name (e.g., "FCFS", "MinMin").
    fn name(&self) -> &'static str;

    /// Allocates all jobs, returning one result per job.
    fn allocate(&self, jobs: &mut [Job], units: &mut [ExecutionUnit]) -> Result<Schedule>;
}

/// Picks the unit on which `job` completes earliest when it may not start
/// before `not_before`.
///
/// Ties go to the lowest unit ID. Returns `(unit index, start, finish)`.
pub(crate) fn earliest_completion(
    job: &Job,
    units: &[ExecutionUnit],
    not_before: f64,
) -> Result<Option<(usize, f64, f64)>> {
    let mut best: Option<(usize, f64, f64)> = None;
    for (idx, unit) in units.iter().enumerate() {
        let start = unit.ready_time.max(not_before);
        let finish = estimate_completion(job, unit, start)?;
        let better = match best {
            None => true,
            Some((b, _, best_finish)) => {
                finish < best_finish || (finish == best_finish && unit.id < units[b].id)
            }
        };
        if better {
            best = Some((idx, start, finish));
        }
    }
    Ok(best)
}

/// Index of the unit with the smallest ready time (lowest ID on ties).
pub(crate) fn least_loaded(units: &[ExecutionUnit]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, unit) in units.iter().enumerate() {
        let better = match best {
            None => true,
            Some(b) => {
                unit.ready_time < units[b].ready_time
                    || (unit.ready_time == units[b].ready_time && unit.id < units[b].id)
            }
        };
        if better {
            best = Some(idx);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_completion_prefers_fast_unit() {
        let units = vec![ExecutionUnit::new(0, 500.0), ExecutionUnit::new(1, 1000.0)];
        let job = Job::new(0, 1000);
        let (idx, start, finish) = earliest_completion(&job, &units, 0.0).unwrap().unwrap();
        assert_eq!(idx, 1);
        assert!((start - 0.0).abs() < 1e-10);
        assert!((finish - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_earliest_completion_respects_not_before() {
        let units = vec![ExecutionUnit::new(0, 1000.0).with_ready_time(1.0)];
        let job = Job::new(0, 1000);
        let (_, start, finish) = earliest_completion(&job, &units, 4.0).unwrap().unwrap();
        assert!((start - 4.0).abs() < 1e-10);
        assert!((finish - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_earliest_completion_tie_lowest_id() {
        // Listed out of id order; equal speeds.
        let units = vec![ExecutionUnit::new(3, 1000.0), ExecutionUnit::new(1, 1000.0)];
        let job = Job::new(0, 1000);
        let (idx, _, _) = earliest_completion(&job, &units, 0.0).unwrap().unwrap();
        assert_eq!(units[idx].id, 1);
    }

    #[test]
    fn test_earliest_completion_no_units() {
        assert!(earliest_completion(&Job::new(0, 1), &[], 0.0).unwrap().is_none());
    }

    #[test]
    fn test_least_loaded() {
        let units = vec![
            ExecutionUnit::new(0, 1000.0).with_ready_time(2.0),
            ExecutionUnit::new(1, 1000.0).with_ready_time(1.0),
            ExecutionUnit::new(2, 1000.0).with_ready_time(1.0),
        ];
        assert_eq!(least_loaded(&units), Some(1));
        assert_eq!(least_loaded(&[]), None);
    }
}
