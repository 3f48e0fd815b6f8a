//! Dispatching rules and rule engine for list scheduling.
//!
//! The single-queue policies (FCFS, SJF, EDF) differ only in which ready job
//! they pick next. Each pick is a dispatching rule; the rule engine chains a
//! primary rule with secondary rules and a final lowest-id tie-break so
//! every selection is deterministic.
//!
//! # Usage
//!
//! ```
//! use u_allocate::dispatching::{RuleEngine, SchedulingContext};
//! use u_allocate::dispatching::rules;
//! use u_allocate::models::Job;
//!
//! let engine = RuleEngine::new().with_rule(rules::Edd).with_rule(rules::Spt);
//!
//! let jobs = [Job::new(0, 500).with_deadline(9.0), Job::new(1, 100).with_deadline(9.0)];
//! let candidates: Vec<&Job> = jobs.iter().collect();
//! let best = engine.select_best(&candidates, &SchedulingContext::at_time(0.0));
//! assert_eq!(best, Some(1));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment" (EDF)

mod context;
mod engine;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::RuleEngine;

use crate::models::Job;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates job priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules return smaller values for
/// jobs that should run first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a job given the current scheduling context.
    fn evaluate(&self, job: &Job, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
