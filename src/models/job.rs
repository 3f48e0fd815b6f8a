//! Job model.
//!
//! A job is an atomic amount of work measured in millions of instructions.
//! Non-preemptive policies run a job in one piece; the round-robin scheduler
//! slices it and tracks the instructions still outstanding in `remaining`.

use serde::{Deserialize, Serialize};

/// A job to be allocated.
///
/// # Work Representation
/// `length` and `remaining` are integer instruction counts (MI), so
/// remaining-work bookkeeping under preemption is exact. Times are
/// in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier (0..m-1 by convention).
    pub id: usize,
    /// Human-readable name.
    pub name: String,
    /// Total instructions required (MI). Must be positive.
    pub length: u64,
    /// Earliest time the job may start (s).
    pub arrival_time: f64,
    /// Latest acceptable finish time (s). `None` = no deadline.
    pub deadline: Option<f64>,
    /// Instructions still to execute (MI).
    pub remaining: u64,
}

impl Job {
    /// Creates a job that arrives at t=0 with no deadline.
    pub fn new(id: usize, length: u64) -> Self {
        Self {
            id,
            name: String::new(),
            length,
            arrival_time: 0.0,
            deadline: None,
            remaining: length,
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the arrival time (s).
    pub fn with_arrival(mut self, arrival_time: f64) -> Self {
        self.arrival_time = arrival_time;
        self
    }

    /// Sets the deadline (s).
    pub fn with_deadline(mut self, deadline: f64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether all work is done.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Marks the job as run to completion in one piece.
    pub fn mark_completed(&mut self) {
        self.remaining = 0;
    }

    /// Restores the full remaining work.
    pub fn reset(&mut self) {
        self.remaining = self.length;
    }

    /// Whether finishing at `finish_time` misses the deadline.
    ///
    /// Always `false` for jobs without a deadline.
    pub fn is_late(&self, finish_time: f64) -> bool {
        self.deadline.is_some_and(|d| finish_time > d)
    }

    /// Amount by which `finish_time` overshoots the deadline (0 if on time).
    pub fn tardiness(&self, finish_time: f64) -> f64 {
        match self.deadline {
            Some(d) if finish_time > d => finish_time - d,
            _ => 0.0,
        }
    }
}
