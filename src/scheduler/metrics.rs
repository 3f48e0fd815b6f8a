//! Schedule performance metrics.
//!
//! Computes per-job and aggregate indicators from a completed schedule and
//! the jobs' arrival times and deadlines.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Waiting | start - arrival |
//! | Turnaround | finish - arrival |
//! | Execution | time actually spent running (slice sum under preemption) |
//! | Makespan | max(finish) |
//! | Missed deadlines | count(finish > deadline), only when deadlines exist |
//! | Tardiness | sum of max(0, finish - deadline) |
//! | Utilization | unit busy time / makespan |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, ScheduleError};
use crate::models::{Job, Schedule, ScheduleResult};

/// Timing indicators for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetrics {
    /// Job ID.
    pub job_id: usize,
    /// Unit that completed the job.
    pub unit_id: usize,
    /// start - arrival (s).
    pub waiting: f64,
    /// finish - arrival (s).
    pub turnaround: f64,
    /// Time spent executing (s).
    pub execution: f64,
    /// Whether the job finished after its deadline.
    pub late: bool,
}

/// Aggregate schedule performance indicators.
///
/// All time values are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Number of completed jobs.
    pub completed: usize,
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean execution time.
    pub avg_execution: f64,
    /// Sum of execution times.
    pub total_execution: f64,
    /// Latest finish time.
    pub makespan: f64,
    /// Jobs finishing after their deadline. `None` when no job has one.
    pub missed_deadlines: Option<usize>,
    /// Missed / jobs with a deadline. `None` when no job has one.
    pub deadline_miss_rate: Option<f64>,
    /// Sum of tardiness across all jobs.
    pub total_tardiness: f64,
    /// Per-unit busy fraction over the makespan.
    pub utilization_by_unit: BTreeMap<usize, f64>,
    /// Mean of `utilization_by_unit`.
    pub avg_utilization: f64,
    /// Per-job breakdown, in schedule order.
    pub jobs: Vec<JobMetrics>,
}

impl ScheduleMetrics {
    /// Computes metrics from a schedule and its input jobs.
    ///
    /// # Errors
    /// - `EmptyResultSet` if the schedule has no results.
    /// - `InvalidConfiguration` if a result names a job not in `jobs`.
    pub fn calculate(schedule: &Schedule, jobs: &[Job]) -> Result<Self> {
        if schedule.results.is_empty() {
            return Err(ScheduleError::EmptyResultSet);
        }

        let by_id: HashMap<usize, &Job> = jobs.iter().map(|j| (j.id, j)).collect();

        let mut per_job = Vec::with_capacity(schedule.results.len());
        let mut total_waiting = 0.0;
        let mut total_turnaround = 0.0;
        let mut total_execution = 0.0;
        let mut total_tardiness = 0.0;
        let mut with_deadline = 0usize;
        let mut missed = 0usize;

        for result in &schedule.results {
            let job = by_id.get(&result.job_id).ok_or_else(|| {
                ScheduleError::config(format!("result for unknown job {}", result.job_id))
            })?;

            let waiting = result.start_time - job.arrival_time;
            let turnaround = result.finish_time - job.arrival_time;
            let execution = schedule
                .execution_time(result.job_id)
                .unwrap_or_else(|| result.span());
            let late = job.is_late(result.finish_time);

            if job.deadline.is_some() {
                with_deadline += 1;
                if late {
                    missed += 1;
                }
            }

            total_waiting += waiting;
            total_turnaround += turnaround;
            total_execution += execution;
            total_tardiness += job.tardiness(result.finish_time);

            per_job.push(JobMetrics {
                job_id: result.job_id,
                unit_id: result.unit_id,
                waiting,
                turnaround,
                execution,
                late,
            });
        }

        let completed = per_job.len();
        let n = completed as f64;

        let utilization_by_unit = schedule.all_utilizations();
        let avg_utilization = if utilization_by_unit.is_empty() {
            0.0
        } else {
            utilization_by_unit.values().sum::<f64>() / utilization_by_unit.len() as f64
        };

        let (missed_deadlines, deadline_miss_rate) = if with_deadline == 0 {
            (None, None)
        } else {
            (Some(missed), Some(missed as f64 / with_deadline as f64))
        };

        Ok(Self {
            completed,
            avg_waiting: total_waiting / n,
            avg_turnaround: total_turnaround / n,
            avg_execution: total_execution / n,
            total_execution,
            makespan: schedule.makespan(),
            missed_deadlines,
            deadline_miss_rate,
            total_tardiness,
            utilization_by_unit,
            avg_utilization,
            jobs: per_job,
        })
    }

    /// Computes metrics from bare results (e.g. realized by a substrate).
    pub fn from_results(results: &[ScheduleResult], jobs: &[Job]) -> Result<Self> {
        let schedule = Schedule {
            results: results.to_vec(),
            ..Schedule::default()
        };
        Self::calculate(&schedule, jobs)
    }

    /// Metrics for a single job.
    pub fn job(&self, job_id: usize) -> Option<&JobMetrics> {
        self.jobs.iter().find(|j| j.job_id == job_id)
    }
}
