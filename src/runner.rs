//! Policy selection and single-run driver.
//!
//! [`Policy`] names every allocation strategy the crate provides. [`run`]
//! executes one on private copies of the caller's jobs and units and
//! bundles the schedule with its metrics.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::{ExecutionUnit, Job, Schedule};
use crate::optimize::{HillClimbingPolicy, InitialAssignment};
use crate::scheduler::{
    AllocationPolicy, BatchScheduler, ListScheduler, RoundRobinScheduler, ScheduleMetrics,
};

/// An allocation strategy and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    /// First-Come, First-Served.
    Fcfs,
    /// Shortest Job First.
    Sjf,
    /// Earliest Deadline First.
    Edf,
    /// Min-Min batch heuristic.
    MinMin,
    /// Min-Max batch heuristic.
    MinMax,
    /// Deadline-first Min-Min.
    DeadlineMinMin,
    /// Preemptive Round-Robin with a quantum in MI.
    RoundRobin { quantum: u64 },
    /// Hill-climbing local search.
    HillClimbing { initial: InitialAssignment },
}

impl Policy {
    /// Display name, matching the allocator's [`AllocationPolicy::name`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Edf => "EDF",
            Self::MinMin => "MinMin",
            Self::MinMax => "MinMax",
            Self::DeadlineMinMin => "DeadlineMinMin",
            Self::RoundRobin { .. } => "RoundRobin",
            Self::HillClimbing { .. } => "HillClimbing",
        }
    }

    /// Builds the allocator for this policy.
    pub fn allocator(&self) -> Box<dyn AllocationPolicy> {
        match self {
            Self::Fcfs => Box::new(ListScheduler::fcfs()),
            Self::Sjf => Box::new(ListScheduler::sjf()),
            Self::Edf => Box::new(ListScheduler::edf()),
            Self::MinMin => Box::new(BatchScheduler::min_min()),
            Self::MinMax => Box::new(BatchScheduler::min_max()),
            Self::DeadlineMinMin => Box::new(BatchScheduler::deadline_min_min()),
            Self::RoundRobin { quantum } => Box::new(RoundRobinScheduler::new(*quantum)),
            Self::HillClimbing { initial } => Box::new(HillClimbingPolicy::new(initial.clone())),
        }
    }
}

/// Outcome of one policy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Policy that produced the schedule.
    pub policy: Policy,
    /// Results (and, for Round-Robin, the slice trace).
    pub schedule: Schedule,
    /// Metrics, or `None` when there were no jobs.
    pub metrics: Option<ScheduleMetrics>,
    /// Units after the run, carrying their final ready times.
    pub units: Vec<ExecutionUnit>,
}

/// Runs `policy` on copies of `jobs` and `units`.
///
/// The caller's inputs are never modified.
pub fn run(policy: &Policy, jobs: &[Job], units: &[ExecutionUnit]) -> Result<RunReport> {
    let mut jobs = jobs.to_vec();
    let mut units = units.to_vec();

    let schedule = policy.allocator().allocate(&mut jobs, &mut units)?;
    let metrics = if schedule.results.is_empty() {
        None
    } else {
        Some(ScheduleMetrics::calculate(&schedule, &jobs)?)
    };

    if let Some(m) = &metrics {
        info!(
            policy = policy.name(),
            makespan = m.makespan,
            avg_waiting = m.avg_waiting,
            avg_turnaround = m.avg_turnaround,
            missed_deadlines = ?m.missed_deadlines,
            "run complete"
        );
    }

    Ok(RunReport {
        policy: policy.clone(),
        schedule,
        metrics,
        units,
    })
}

/// Runs each policy independently on the same inputs.
pub fn compare(policies: &[Policy], jobs: &[Job], units: &[ExecutionUnit]) -> Result<Vec<RunReport>> {
    policies.iter().map(|p| run(p, jobs, units)).collect()
}
