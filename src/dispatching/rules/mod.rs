//! Built-in dispatching rules.
//!
//! - **FIFO**: arrival order (first-come, first-served)
//! - **SPT**: shortest job first
//! - **EDD**: earliest deadline first
//!
//! # Score Convention
//! All rules return lower scores for higher priority jobs.

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Job;

/// First In First Out.
///
/// Prioritizes jobs by arrival time.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.arrival_time
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

/// Shortest Processing Time.
///
/// Prioritizes jobs with fewer instructions. Minimizes mean flow time on a
/// single unit.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.length as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Earliest Due Date.
///
/// Prioritizes jobs with earlier deadlines. Jobs without deadlines are
/// assigned lowest priority.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.deadline.unwrap_or(f64::INFINITY)
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SchedulingContext {
        SchedulingContext::at_time(0.0)
    }

    #[test]
    fn test_fifo_scores_arrival() {
        let job = Job::new(0, 100).with_arrival(3.5);
        assert!((Fifo.evaluate(&job, &ctx()) - 3.5).abs() < 1e-10);
    }

    #[test]
    fn test_spt_scores_length() {
        let job = Job::new(0, 20_000);
        assert!((Spt.evaluate(&job, &ctx()) - 20_000.0).abs() < 1e-10);
    }

    #[test]
    fn test_edd_scores_deadline() {
        let job = Job::new(0, 100).with_deadline(12.0);
        assert!((Edd.evaluate(&job, &ctx()) - 12.0).abs() < 1e-10);
        assert_eq!(Edd.evaluate(&Job::new(1, 100), &ctx()), f64::INFINITY);
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(Fifo.name(), "FIFO");
        assert_eq!(Spt.description(), "Shortest Processing Time");
        assert_eq!(Edd.description(), "Earliest Due Date");
    }
}
