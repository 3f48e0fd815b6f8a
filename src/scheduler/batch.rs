//! Batch-mode heuristics over the job × unit completion-time matrix.
//!
//! # Algorithm
//!
//! Each round, for every unscheduled job, find its best unit (minimum
//! completion time, lowest unit ID on ties). The heuristic then picks one
//! job from those per-job bests, commits it to its best unit, advances that
//! unit's ready time, and repeats until no job remains.
//!
//! | Heuristic | Pick |
//! |-----------|------|
//! | Min-Min | smallest best completion time |
//! | Min-Max | largest best completion time (long jobs are not starved) |
//! | Deadline Min-Min | earliest deadline, then smallest best completion time |
//!
//! All ties fall to the lowest job ID.
//!
//! A job never starts before it arrives: the estimator is evaluated at
//! `max(unit.ready_time, job.arrival_time)`.
//!
//! # Complexity
//! O(n²·m) where n=jobs, m=units.
//!
//! # Reference
//! Braun et al. (2001), "A Comparison of Eleven Static Heuristics for
//! Mapping a Class of Independent Tasks onto Heterogeneous Distributed
//! Computing Systems"

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{earliest_completion, AllocationPolicy};
use crate::error::{Result, ScheduleError};
use crate::models::{ExecutionUnit, Job, Schedule, ScheduleResult};
use crate::validation::validate_input;

/// Selection rule applied to the per-job best completion times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchHeuristic {
    /// Globally smallest completion time first.
    MinMin,
    /// Largest of the per-job minimum completion times first.
    MinMax,
    /// Earliest deadline first, smallest completion time among equals.
    DeadlineMinMin,
}

/// Best placement found for one job in the current round.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    job_idx: usize,
    unit_idx: usize,
    start: f64,
    finish: f64,
}

/// Batch-mode scheduler over all jobs × all units.
///
/// # Example
///
/// ```
/// use u_allocate::models::{ExecutionUnit, Job};
/// use u_allocate::scheduler::{AllocationPolicy, BatchScheduler};
///
/// let mut units = vec![ExecutionUnit::new(0, 500.0), ExecutionUnit::new(1, 1500.0)];
/// let mut jobs = vec![Job::new(0, 3000), Job::new(1, 1500)];
///
/// let schedule = BatchScheduler::min_min().allocate(&mut jobs, &mut units).unwrap();
/// // Job 1 on the fast unit finishes first (1.0s), so it is committed first.
/// assert_eq!(schedule.results[0].job_id, 1);
/// assert_eq!(schedule.results[0].unit_id, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    heuristic: BatchHeuristic,
}

impl BatchScheduler {
    /// Creates a scheduler for the given heuristic.
    pub fn new(heuristic: BatchHeuristic) -> Self {
        Self { heuristic }
    }

    /// Min-Min scheduler.
    pub fn min_min() -> Self {
        Self::new(BatchHeuristic::MinMin)
    }

    /// Min-Max scheduler.
    pub fn min_max() -> Self {
        Self::new(BatchHeuristic::MinMax)
    }

    /// Deadline-aware Min-Min scheduler.
    pub fn deadline_min_min() -> Self {
        Self::new(BatchHeuristic::DeadlineMinMin)
    }

    /// The configured heuristic.
    pub fn heuristic(&self) -> BatchHeuristic {
        self.heuristic
    }

    /// Whether `a` should be committed before `b`.
    ///
    /// Candidates arrive in ascending job-ID order, so returning `false` on
    /// a full tie keeps the lowest job ID.
    fn prefers(&self, a: &Candidate, b: &Candidate, jobs: &[Job]) -> bool {
        match self.heuristic {
            BatchHeuristic::MinMin => a.finish < b.finish,
            BatchHeuristic::MinMax => a.finish > b.finish,
            BatchHeuristic::DeadlineMinMin => {
                let da = jobs[a.job_idx].deadline.unwrap_or(f64::INFINITY);
                let db = jobs[b.job_idx].deadline.unwrap_or(f64::INFINITY);
                da < db || (da == db && a.finish < b.finish)
            }
        }
    }
}

impl AllocationPolicy for BatchScheduler {
    fn name(&self) -> &'static str {
        match self.heuristic {
            BatchHeuristic::MinMin => "MinMin",
            BatchHeuristic::MinMax => "MinMax",
            BatchHeuristic::DeadlineMinMin => "DeadlineMinMin",
        }
    }

    fn allocate(&self, jobs: &mut [Job], units: &mut [ExecutionUnit]) -> Result<Schedule> {
        validate_input(jobs, units)?;
        jobs.iter_mut().for_each(Job::reset);

        let mut schedule = Schedule::new();
        let mut pending: Vec<usize> = (0..jobs.len()).collect();
        pending.sort_by_key(|&i| jobs[i].id);

        while !pending.is_empty() {
            let mut chosen: Option<Candidate> = None;

            for &job_idx in &pending {
                let job = &jobs[job_idx];
                let (unit_idx, start, finish) = earliest_completion(job, units, job.arrival_time)?
                    .ok_or_else(|| ScheduleError::config("at least one execution unit is required"))?;
                let candidate = Candidate {
                    job_idx,
                    unit_idx,
                    start,
                    finish,
                };
                chosen = match chosen {
                    Some(current) if !self.prefers(&candidate, &current, jobs) => Some(current),
                    _ => Some(candidate),
                };
            }

            let Some(pick) = chosen else {
                break;
            };

            units[pick.unit_idx].advance_to(pick.finish);
            jobs[pick.job_idx].mark_completed();
            schedule.add_result(ScheduleResult::new(
                jobs[pick.job_idx].id,
                units[pick.unit_idx].id,
                pick.start,
                pick.finish,
            ));
            debug!(
                policy = self.name(),
                job_id = jobs[pick.job_idx].id,
                unit_id = units[pick.unit_idx].id,
                start = pick.start,
                finish = pick.finish,
                predicted_miss = jobs[pick.job_idx].is_late(pick.finish),
                "committed"
            );

            pending.retain(|&i| i != pick.job_idx);
        }

        info!(
            policy = self.name(),
            jobs = jobs.len(),
            units = units.len(),
            makespan = schedule.makespan(),
            "allocation complete"
        );
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_units() -> Vec<ExecutionUnit> {
        vec![
            ExecutionUnit::new(0, 500.0),
            ExecutionUnit::new(1, 1000.0),
            ExecutionUnit::new(2, 1500.0),
        ]
    }

    fn four_jobs() -> Vec<Job> {
        vec![
            Job::new(0, 2000),
            Job::new(1, 4000),
            Job::new(2, 8000),
            Job::new(3, 10_000),
        ]
    }

    #[test]
    fn test_min_min_first_pick() {
        let mut units = three_units();
        let mut jobs = four_jobs();
        let s = BatchScheduler::min_min().allocate(&mut jobs, &mut units).unwrap();

        // Smallest of the 12 raw completion times: job 0 on unit 2, 2000/1500.
        let first = &s.results[0];
        assert_eq!(first.job_id, 0);
        assert_eq!(first.unit_id, 2);
        assert!((first.start_time - 0.0).abs() < 1e-10);
        assert!((first.finish_time - 2000.0 / 1500.0).abs() < 1e-12);
        assert!(units[2].ready_time >= 2000.0 / 1500.0);
    }

    #[test]
    fn test_min_min_full_sequence() {
        let mut units = vec![
            ExecutionUnit::new(0, 500.0),
            ExecutionUnit::new(1, 1000.0),
            ExecutionUnit::new(2, 2000.0),
        ];
        let mut jobs = four_jobs();
        let s = BatchScheduler::min_min().allocate(&mut jobs, &mut units).unwrap();

        // (job, unit, finish) per round:
        // r1: job 0 on unit 2 → 1.0
        // r2: job 1 on unit 2 → 1 + 2 = 3.0
        // r3: job 2 on unit 2 → 3 + 4 = 7.0
        // r4: job 3 on unit 1 → 10.0 (unit 2 would be 7 + 5 = 12.0)
        let expected = [(0, 2, 1.0), (1, 2, 3.0), (2, 2, 7.0), (3, 1, 10.0)];
        for (r, &(job_id, unit_id, finish)) in s.results.iter().zip(expected.iter()) {
            assert_eq!((r.job_id, r.unit_id), (job_id, unit_id));
            assert!((r.finish_time - finish).abs() < 1e-10);
        }

        assert!((units[0].ready_time - 0.0).abs() < 1e-10);
        assert!((units[1].ready_time - 10.0).abs() < 1e-10);
        assert!((units[2].ready_time - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_min_max_picks_longest_first() {
        let mut units = three_units();
        let mut jobs = four_jobs();
        let s = BatchScheduler::min_max().allocate(&mut jobs, &mut units).unwrap();

        // Largest best completion: job 3 on unit 2 (6.667).
        let first = &s.results[0];
        assert_eq!((first.job_id, first.unit_id), (3, 2));
        assert!((first.finish_time - 10_000.0 / 1500.0).abs() < 1e-10);

        // Round 2 bests: job0 → u1 2.0, job1 → u1 4.0, job2 → u1 8.0. Max is job 2.
        let second = &s.results[1];
        assert_eq!((second.job_id, second.unit_id), (2, 1));
        assert!((second.finish_time - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_min_max_tie_lowest_job_id() {
        let mut units = vec![ExecutionUnit::new(0, 1000.0)];
        let mut jobs = vec![Job::new(4, 1000), Job::new(2, 1000)];
        let s = BatchScheduler::min_max().allocate(&mut jobs, &mut units).unwrap();
        assert_eq!(s.results[0].job_id, 2);
    }

    #[test]
    fn test_min_min_tie_lowest_job_then_unit() {
        let mut units = vec![ExecutionUnit::new(1, 1000.0), ExecutionUnit::new(0, 1000.0)];
        let mut jobs = vec![Job::new(1, 1000), Job::new(0, 1000)];
        let s = BatchScheduler::min_min().allocate(&mut jobs, &mut units).unwrap();
        assert_eq!((s.results[0].job_id, s.results[0].unit_id), (0, 0));
        assert_eq!((s.results[1].job_id, s.results[1].unit_id), (1, 1));
    }

    #[test]
    fn test_deadline_min_min() {
        let mut units = vec![ExecutionUnit::new(0, 1000.0), ExecutionUnit::new(1, 2000.0)];
        let mut jobs = vec![
            Job::new(0, 2000).with_deadline(10.0),
            Job::new(1, 8000).with_deadline(3.0),
            Job::new(2, 1000),
        ];
        let s = BatchScheduler::deadline_min_min()
            .allocate(&mut jobs, &mut units)
            .unwrap();

        let order: Vec<usize> = s.results.iter().map(|r| r.job_id).collect();
        assert_eq!(order, vec![1, 0, 2]);
        // Job 1 on the fast unit still misses its deadline (4.0 > 3.0).
        let j1 = s.result_for_job(1).unwrap();
        assert_eq!(j1.unit_id, 1);
        assert!((j1.finish_time - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_arrival_bounds_start() {
        let mut units = vec![ExecutionUnit::new(0, 1000.0)];
        let mut jobs = vec![Job::new(0, 1000).with_arrival(5.0)];
        let s = BatchScheduler::min_min().allocate(&mut jobs, &mut units).unwrap();
        let r = &s.results[0];
        assert!((r.start_time - 5.0).abs() < 1e-10);
        assert!((r.finish_time - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_every_job_once() {
        for scheduler in [
            BatchScheduler::min_min(),
            BatchScheduler::min_max(),
            BatchScheduler::deadline_min_min(),
        ] {
            let mut units = three_units();
            let mut jobs = four_jobs();
            let s = scheduler.allocate(&mut jobs, &mut units).unwrap();
            let mut ids: Vec<usize> = s.results.iter().map(|r| r.job_id).collect();
            ids.sort_unstable();
            assert_eq!(ids, vec![0, 1, 2, 3], "{}", scheduler.name());
            for r in &s.results {
                let len = four_jobs()[r.job_id].length as f64;
                let speed = units[r.unit_id].speed_mips;
                assert!((r.span() - len / speed).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_invalid_speed() {
        let mut units = vec![ExecutionUnit::new(0, -1.0)];
        let mut jobs = four_jobs();
        let err = BatchScheduler::min_min()
            .allocate(&mut jobs, &mut units)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidResource { unit_id: 0, .. }));
    }

    #[test]
    fn test_empty_jobs() {
        let mut units = three_units();
        let s = BatchScheduler::min_max().allocate(&mut [], &mut units).unwrap();
        assert_eq!(s.result_count(), 0);
    }
}
