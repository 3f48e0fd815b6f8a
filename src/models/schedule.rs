//! Schedule (solution) model.
//!
//! A schedule holds one result per job (the contract every policy and the
//! execution substrate agree on) and, for preemptive runs, the full
//! slice-by-slice execution trace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Assignment;

/// Where and when one job ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Job ID.
    pub job_id: usize,
    /// Unit that ran the job (the last slice's unit under preemption).
    pub unit_id: usize,
    /// First instant the job executed (s).
    pub start_time: f64,
    /// Instant the job's last instruction completed (s).
    pub finish_time: f64,
}

/// How a round-robin slice ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceOutcome {
    /// Quantum exhausted; the job went back to the tail of the queue.
    Preempted,
    /// The job's last instructions ran in this slice.
    Completed,
}

/// One quantum slice executed by the round-robin scheduler.
///
/// Records are append-only and never modified after they are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// 1-based position in the trace.
    pub step: usize,
    /// Job that ran.
    pub job_id: usize,
    /// Unit it ran on.
    pub unit_id: usize,
    /// Slice start (s).
    pub start_time: f64,
    /// Slice end (s).
    pub end_time: f64,
    /// Instructions executed in this slice (MI).
    pub work_done: u64,
    /// Instructions left after this slice (MI).
    pub remaining_after: u64,
    /// Whether the slice preempted or completed the job.
    pub outcome: SliceOutcome,
}

/// A complete schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// One result per job, in commit order.
    pub results: Vec<ScheduleResult>,
    /// Slice trace (empty for non-preemptive policies).
    pub records: Vec<ExecutionRecord>,
    /// Number of preemptions (re-enqueues) performed.
    pub context_switches: usize,
}

impl ScheduleResult {
    /// Creates a result.
    pub fn new(job_id: usize, unit_id: usize, start_time: f64, finish_time: f64) -> Self {
        Self {
            job_id,
            unit_id,
            start_time,
            finish_time,
        }
    }

    /// Elapsed time between start and finish (s).
    #[inline]
    pub fn span(&self) -> f64 {
        self.finish_time - self.start_time
    }
}

impl ExecutionRecord {
    /// Slice duration (s).
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job result.
    pub fn add_result(&mut self, result: ScheduleResult) {
        self.results.push(result);
    }

    /// Appends a slice record.
    pub fn add_record(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    /// Whether this schedule came from a preemptive run.
    pub fn is_preemptive(&self) -> bool {
        !self.records.is_empty()
    }

    /// Makespan: latest finish time across all results (s).
    pub fn makespan(&self) -> f64 {
        self.results
            .iter()
            .map(|r| r.finish_time)
            .fold(0.0, f64::max)
    }

    /// Finds the result for a job.
    pub fn result_for_job(&self, job_id: usize) -> Option<&ScheduleResult> {
        self.results.iter().find(|r| r.job_id == job_id)
    }

    /// Returns the slices executed for a job, in trace order.
    pub fn records_for_job(&self, job_id: usize) -> Vec<&ExecutionRecord> {
        self.records.iter().filter(|r| r.job_id == job_id).collect()
    }

    /// Time `job_id` actually spent executing (s).
    ///
    /// Sums slice durations when a trace exists, otherwise the result span.
    pub fn execution_time(&self, job_id: usize) -> Option<f64> {
        if self.is_preemptive() {
            let slices = self.records_for_job(job_id);
            if slices.is_empty() {
                return None;
            }
            return Some(slices.iter().map(|r| r.duration()).sum());
        }
        self.result_for_job(job_id).map(ScheduleResult::span)
    }

    /// Busy time per unit (s).
    pub fn busy_time_by_unit(&self) -> BTreeMap<usize, f64> {
        let mut busy: BTreeMap<usize, f64> = BTreeMap::new();
        if self.is_preemptive() {
            for r in &self.records {
                *busy.entry(r.unit_id).or_insert(0.0) += r.duration();
            }
        } else {
            for r in &self.results {
                *busy.entry(r.unit_id).or_insert(0.0) += r.span();
            }
        }
        busy
    }

    /// Computes unit utilization: busy_time / horizon.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn unit_utilization(&self, unit_id: usize, horizon: f64) -> Option<f64> {
        if horizon <= 0.0 {
            return None;
        }
        let busy = self
            .busy_time_by_unit()
            .get(&unit_id)
            .copied()
            .unwrap_or(0.0);
        Some(busy / horizon)
    }

    /// Computes utilization for all units that did work.
    ///
    /// Uses makespan as the horizon.
    pub fn all_utilizations(&self) -> BTreeMap<usize, f64> {
        let horizon = self.makespan();
        if horizon <= 0.0 {
            return BTreeMap::new();
        }
        self.busy_time_by_unit()
            .into_iter()
            .map(|(id, busy)| (id, busy / horizon))
            .collect()
    }

    /// The job → unit binding implied by the results, in commit order.
    pub fn assignment(&self) -> Assignment {
        Assignment::from_pairs(self.results.iter().map(|r| (r.job_id, r.unit_id)))
    }

    /// Number of job results.
    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}
