//! Arrival-gated list scheduler (FCFS, SJF, EDF).
//!
//! # Algorithm
//!
//! 1. The clock starts at the earliest unit ready time.
//! 2. The ready set is every unscheduled job with `arrival <= clock`. If it
//!    is empty, the clock jumps to the next arrival.
//! 3. The dispatching rule picks one ready job (lowest ID on ties).
//! 4. The job goes to the unit where it completes earliest, starting no
//!    earlier than the clock. The unit's ready time advances to the finish.
//! 5. The clock advances to the earliest unit ready time (never backwards).
//!
//! With a single unit this is the textbook non-preemptive policy: the next
//! pick happens when the previous job finishes, among the jobs that have
//! arrived by then.
//!
//! # Complexity
//! O(n² + n·m) where n=jobs, m=units.

use tracing::{debug, info};

use super::{earliest_completion, AllocationPolicy};
use crate::dispatching::{rules, RuleEngine, SchedulingContext};
use crate::error::{Result, ScheduleError};
use crate::models::{ExecutionUnit, Job, Schedule, ScheduleResult};
use crate::validation::validate_input;

/// Non-preemptive, arrival-gated list scheduler.
///
/// # Example
///
/// ```
/// use u_allocate::models::{ExecutionUnit, Job};
/// use u_allocate::scheduler::{AllocationPolicy, ListScheduler};
///
/// let mut units = vec![ExecutionUnit::new(0, 1000.0)];
/// let mut jobs = vec![
///     Job::new(0, 100_000),
///     Job::new(1, 50_000).with_arrival(2.0),
///     Job::new(2, 20_000).with_arrival(1.0),
/// ];
///
/// let schedule = ListScheduler::sjf().allocate(&mut jobs, &mut units).unwrap();
/// let order: Vec<usize> = schedule.results.iter().map(|r| r.job_id).collect();
/// assert_eq!(order, vec![0, 2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct ListScheduler {
    name: &'static str,
    engine: RuleEngine,
}

impl ListScheduler {
    /// Creates a list scheduler driven by a custom rule engine.
    pub fn with_engine(name: &'static str, engine: RuleEngine) -> Self {
        Self { name, engine }
    }

    /// First-Come, First-Served: earliest arrival first.
    pub fn fcfs() -> Self {
        Self::with_engine(
            "FCFS",
            RuleEngine::new().with_rule(rules::Fifo),
        )
    }

    /// Shortest Job First: fewest instructions among arrived jobs.
    pub fn sjf() -> Self {
        Self::with_engine(
            "SJF",
            RuleEngine::new().with_rule(rules::Spt),
        )
    }

    /// Earliest Deadline First: earliest deadline among arrived jobs.
    ///
    /// Jobs without a deadline go after every job that has one.
    pub fn edf() -> Self {
        Self::with_engine(
            "EDF",
            RuleEngine::new().with_rule(rules::Edd),
        )
    }

    fn earliest_ready(units: &[ExecutionUnit]) -> f64 {
        units
            .iter()
            .map(|u| u.ready_time)
            .fold(f64::INFINITY, f64::min)
    }
}

impl AllocationPolicy for ListScheduler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allocate(&self, jobs: &mut [Job], units: &mut [ExecutionUnit]) -> Result<Schedule> {
        validate_input(jobs, units)?;
        jobs.iter_mut().for_each(Job::reset);

        let mut schedule = Schedule::new();
        let mut pending: Vec<usize> = (0..jobs.len()).collect();
        let mut clock = Self::earliest_ready(units);

        while !pending.is_empty() {
            let ready: Vec<usize> = pending
                .iter()
                .copied()
                .filter(|&i| jobs[i].arrival_time <= clock)
                .collect();

            if ready.is_empty() {
                let next_arrival = pending
                    .iter()
                    .map(|&i| jobs[i].arrival_time)
                    .fold(f64::INFINITY, f64::min);
                debug!(policy = self.name, from = clock, to = next_arrival, "clock jump");
                clock = clock.max(next_arrival);
                continue;
            }

            let candidates: Vec<&Job> = ready.iter().map(|&i| &jobs[i]).collect();
            let context = SchedulingContext::at_time(clock);
            let Some(pick) = self.engine.select_best(&candidates, &context) else {
                break;
            };
            let job_idx = ready[pick];

            let (unit_idx, start, finish) = earliest_completion(&jobs[job_idx], units, clock)?
                .ok_or_else(|| ScheduleError::config("at least one execution unit is required"))?;

            units[unit_idx].advance_to(finish);
            jobs[job_idx].mark_completed();
            schedule.add_result(ScheduleResult::new(
                jobs[job_idx].id,
                units[unit_idx].id,
                start,
                finish,
            ));
            debug!(
                policy = self.name,
                job_id = jobs[job_idx].id,
                unit_id = units[unit_idx].id,
                start,
                finish,
                "committed"
            );

            pending.retain(|&i| i != job_idx);
            clock = clock.max(Self::earliest_ready(units));
        }

        info!(
            policy = self.name,
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

    fn single_unit() -> Vec<ExecutionUnit> {
        vec![ExecutionUnit::new(0, 1000.0)]
    }

    /// The classic five-cloudlet exercise: {arrival, length}.
    fn five_jobs() -> Vec<Job> {
        vec![
            Job::new(0, 100_000).with_arrival(0.0),
            Job::new(1, 50_000).with_arrival(2.0),
            Job::new(2, 20_000).with_arrival(1.0),
            Job::new(3, 75_000).with_arrival(3.0),
            Job::new(4, 150_000).with_arrival(4.0),
        ]
    }

    fn order(schedule: &Schedule) -> Vec<usize> {
        schedule.results.iter().map(|r| r.job_id).collect()
    }

    #[test]
    fn test_fcfs_three_jobs() {
        let mut jobs = vec![
            Job::new(0, 100_000).with_arrival(0.0),
            Job::new(1, 50_000).with_arrival(2.0),
            Job::new(2, 20_000).with_arrival(1.0),
        ];
        let mut units = single_unit();
        let s = ListScheduler::fcfs().allocate(&mut jobs, &mut units).unwrap();

        assert_eq!(order(&s), vec![0, 2, 1]);
        let j0 = s.result_for_job(0).unwrap();
        let j2 = s.result_for_job(2).unwrap();
        let j1 = s.result_for_job(1).unwrap();
        assert!((j0.start_time - 0.0).abs() < 1e-10);
        assert!((j0.finish_time - 100.0).abs() < 1e-10);
        assert!((j2.start_time - 100.0).abs() < 1e-10);
        assert!((j2.finish_time - 120.0).abs() < 1e-10);
        assert!((j1.start_time - 120.0).abs() < 1e-10);
        assert!((j1.finish_time - 170.0).abs() < 1e-10);
        assert!((units[0].ready_time - 170.0).abs() < 1e-10);
    }

    #[test]
    fn test_fcfs_arrival_tie_lowest_id() {
        let mut jobs = vec![
            Job::new(1, 10).with_arrival(0.0),
            Job::new(0, 99).with_arrival(0.0),
        ];
        let s = ListScheduler::fcfs()
            .allocate(&mut jobs, &mut single_unit())
            .unwrap();
        assert_eq!(order(&s), vec![0, 1]);
    }

    #[test]
    fn test_sjf_five_jobs() {
        let mut jobs = five_jobs();
        let s = ListScheduler::sjf()
            .allocate(&mut jobs, &mut single_unit())
            .unwrap();

        // t=0 only job 0 has arrived; at t=100 all have, shortest first.
        assert_eq!(order(&s), vec![0, 2, 1, 3, 4]);
        let last = s.result_for_job(4).unwrap();
        assert!((last.start_time - 245.0).abs() < 1e-10);
        assert!((last.finish_time - 395.0).abs() < 1e-10);
    }

    #[test]
    fn test_sjf_length_tie_lowest_id() {
        let mut jobs = vec![Job::new(2, 500), Job::new(1, 500), Job::new(0, 900)];
        let s = ListScheduler::sjf()
            .allocate(&mut jobs, &mut single_unit())
            .unwrap();
        assert_eq!(order(&s), vec![1, 2, 0]);
    }

    #[test]
    fn test_sjf_idle_gap_jumps_clock() {
        let mut jobs = vec![
            Job::new(0, 1000).with_arrival(0.0),
            Job::new(1, 1000).with_arrival(10.0),
        ];
        let s = ListScheduler::sjf()
            .allocate(&mut jobs, &mut single_unit())
            .unwrap();
        let j1 = s.result_for_job(1).unwrap();
        assert!((j1.start_time - 10.0).abs() < 1e-10);
        assert!((j1.finish_time - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_edf_order() {
        let mut jobs = vec![
            Job::new(0, 10_000).with_arrival(0.0).with_deadline(50.0),
            Job::new(1, 10_000).with_arrival(0.0).with_deadline(20.0),
            Job::new(2, 10_000).with_arrival(0.0),
            Job::new(3, 10_000).with_arrival(0.0).with_deadline(30.0),
        ];
        let s = ListScheduler::edf()
            .allocate(&mut jobs, &mut single_unit())
            .unwrap();
        assert_eq!(order(&s), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_edf_respects_arrival() {
        // Job 1 has the tighter deadline but arrives after job 0 has started.
        let mut jobs = vec![
            Job::new(0, 5000).with_arrival(0.0).with_deadline(100.0),
            Job::new(1, 1000).with_arrival(1.0).with_deadline(3.0),
        ];
        let s = ListScheduler::edf()
            .allocate(&mut jobs, &mut single_unit())
            .unwrap();
        assert_eq!(order(&s), vec![0, 1]);
        assert!((s.result_for_job(1).unwrap().start_time - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_multi_unit_picks_earliest_completion() {
        let mut units = vec![ExecutionUnit::new(0, 500.0), ExecutionUnit::new(1, 1000.0)];
        let mut jobs = vec![Job::new(0, 1000), Job::new(1, 1000)];
        let s = ListScheduler::fcfs().allocate(&mut jobs, &mut units).unwrap();

        // Job 0 → fast unit (1.0s). Job 1: unit 0 finishes at 2.0, unit 1 at 2.0 → tie → unit 0.
        assert_eq!(s.result_for_job(0).unwrap().unit_id, 1);
        let j1 = s.result_for_job(1).unwrap();
        assert_eq!(j1.unit_id, 0);
        assert!((j1.finish_time - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_every_job_once_and_duration_matches_speed() {
        let mut units = vec![
            ExecutionUnit::new(0, 500.0),
            ExecutionUnit::new(1, 1000.0),
            ExecutionUnit::new(2, 1500.0),
        ];
        let mut jobs = five_jobs();
        let original = jobs.clone();
        let s = ListScheduler::sjf().allocate(&mut jobs, &mut units).unwrap();

        assert_eq!(s.result_count(), original.len());
        for job in &original {
            let r = s.result_for_job(job.id).unwrap();
            let speed = units.iter().find(|u| u.id == r.unit_id).unwrap().speed_mips;
            assert!((r.span() - job.length as f64 / speed).abs() < 1e-9);
            assert!(r.start_time >= job.arrival_time);
        }
        assert!(jobs.iter().all(Job::is_complete));
    }

    #[test]
    fn test_empty_jobs() {
        let s = ListScheduler::sjf()
            .allocate(&mut [], &mut single_unit())
            .unwrap();
        assert_eq!(s.result_count(), 0);
    }

    #[test]
    fn test_no_units() {
        let mut jobs = vec![Job::new(0, 100)];
        let err = ListScheduler::fcfs().allocate(&mut jobs, &mut []).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_invalid_job_leaves_units_untouched() {
        let mut units = single_unit();
        let mut jobs = vec![Job::new(0, 100), Job::new(1, 0)];
        let err = ListScheduler::fcfs().allocate(&mut jobs, &mut units).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidJob { job_id: 1, .. }));
        assert!((units[0].ready_time - 0.0).abs() < 1e-10);
        assert_eq!(jobs[0].remaining, 100);
    }

    #[test]
    fn test_unit_initial_ready_time() {
        let mut units = vec![ExecutionUnit::new(0, 1000.0).with_ready_time(5.0)];
        let mut jobs = vec![Job::new(0, 1000)];
        let s = ListScheduler::fcfs().allocate(&mut jobs, &mut units).unwrap();
        assert!((s.result_for_job(0).unwrap().start_time - 5.0).abs() < 1e-10);
    }
}
