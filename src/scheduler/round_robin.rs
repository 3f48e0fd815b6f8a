//! Preemptive Round-Robin scheduler.
//!
//! # Algorithm
//!
//! The ready queue is seeded with every job in input order. Each step
//! dequeues the head job, places one slice of at most `quantum` instructions
//! on the unit with the smallest ready time (lowest ID on ties) and either
//! re-enqueues the job at the tail or completes it.
//!
//! The quantum is measured in instructions, so a fast unit burns through it
//! in less wall-clock time than a slow one.
//!
//! A slice never starts before the job's arrival:
//! `start = max(unit.ready_time, job.arrival_time)`.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3.4

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

use super::{least_loaded, AllocationPolicy, ScheduleMetrics};
use crate::error::{Result, ScheduleError};
use crate::estimate::execution_time;
use crate::models::{ExecutionRecord, ExecutionUnit, Job, Schedule, ScheduleResult, SliceOutcome};
use crate::validation::validate_input;

/// Quantum-sliced, least-loaded-unit Round-Robin.
///
/// # Example
///
/// ```
/// use u_allocate::models::{ExecutionUnit, Job};
/// use u_allocate::scheduler::{AllocationPolicy, RoundRobinScheduler};
///
/// let mut units = vec![ExecutionUnit::new(0, 100.0)];
/// let mut jobs = vec![Job::new(0, 250), Job::new(1, 100)];
///
/// let schedule = RoundRobinScheduler::new(100)
///     .allocate(&mut jobs, &mut units)
///     .unwrap();
/// assert_eq!(schedule.records.len(), 4);
/// assert_eq!(schedule.context_switches, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobinScheduler {
    quantum: u64,
}

impl RoundRobinScheduler {
    /// Creates a scheduler granting `quantum` instructions per slice.
    pub fn new(quantum: u64) -> Self {
        Self { quantum }
    }

    /// Instructions granted per slice (MI).
    pub fn quantum(&self) -> u64 {
        self.quantum
    }
}

impl AllocationPolicy for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "RoundRobin"
    }

    fn allocate(&self, jobs: &mut [Job], units: &mut [ExecutionUnit]) -> Result<Schedule> {
        if self.quantum == 0 {
            return Err(ScheduleError::config("round-robin quantum must be positive"));
        }
        validate_input(jobs, units)?;
        jobs.iter_mut().for_each(Job::reset);

        let mut schedule = Schedule::new();
        let mut first_start: Vec<Option<f64>> = vec![None; jobs.len()];
        let mut queue: VecDeque<usize> = (0..jobs.len()).collect();

        while let Some(job_idx) = queue.pop_front() {
            let unit_idx = least_loaded(units)
                .ok_or_else(|| ScheduleError::config("at least one execution unit is required"))?;

            let work = self.quantum.min(jobs[job_idx].remaining);
            let start = units[unit_idx].ready_time.max(jobs[job_idx].arrival_time);
            let end = start + execution_time(work, &units[unit_idx])?;

            let job = &mut jobs[job_idx];
            job.remaining -= work;
            units[unit_idx].advance_to(end);
            let started = *first_start[job_idx].get_or_insert(start);

            let outcome = if job.remaining > 0 {
                SliceOutcome::Preempted
            } else {
                SliceOutcome::Completed
            };
            schedule.add_record(ExecutionRecord {
                step: schedule.records.len() + 1,
                job_id: job.id,
                unit_id: units[unit_idx].id,
                start_time: start,
                end_time: end,
                work_done: work,
                remaining_after: job.remaining,
                outcome,
            });
            debug!(
                policy = "RoundRobin",
                job_id = job.id,
                unit_id = units[unit_idx].id,
                start,
                end,
                work,
                remaining = job.remaining,
                "slice"
            );

            match outcome {
                SliceOutcome::Preempted => {
                    queue.push_back(job_idx);
                    schedule.context_switches += 1;
                }
                SliceOutcome::Completed => {
                    schedule.add_result(ScheduleResult::new(
                        job.id,
                        units[unit_idx].id,
                        started,
                        end,
                    ));
                }
            }
        }

        info!(
            policy = "RoundRobin",
            quantum = self.quantum,
            jobs = jobs.len(),
            units = units.len(),
            slices = schedule.records.len(),
            context_switches = schedule.context_switches,
            makespan = schedule.makespan(),
            "allocation complete"
        );
        Ok(schedule)
    }
}

/// Summary of one Round-Robin run at a given quantum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumOutcome {
    /// Quantum used (MI).
    pub quantum: u64,
    /// Preemptions performed.
    pub context_switches: usize,
    /// Latest finish time (s).
    pub makespan: f64,
    /// Mean waiting time (s).
    pub avg_waiting: f64,
    /// Mean turnaround time (s).
    pub avg_turnaround: f64,
}

/// Compares Round-Robin behaviour across quantum sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantumAnalysis;

impl QuantumAnalysis {
    /// Runs Round-Robin once per quantum on private copies of the inputs.
    ///
    /// # Errors
    /// Fails on the first quantum that fails (zero quantum, invalid input,
    /// or `EmptyResultSet` when `jobs` is empty).
    pub fn sweep(
        quanta: &[u64],
        jobs: &[Job],
        units: &[ExecutionUnit],
    ) -> Result<Vec<QuantumOutcome>> {
        quanta
            .iter()
            .map(|&quantum| {
                let mut jobs = jobs.to_vec();
                let mut units = units.to_vec();
                let schedule = RoundRobinScheduler::new(quantum).allocate(&mut jobs, &mut units)?;
                let metrics = ScheduleMetrics::calculate(&schedule, &jobs)?;
                Ok(QuantumOutcome {
                    quantum,
                    context_switches: schedule.context_switches,
                    makespan: metrics.makespan,
                    avg_waiting: metrics.avg_waiting,
                    avg_turnaround: metrics.avg_turnaround,
                })
            })
            .collect()
    }
}
