//! Rule engine for multi-level dispatching.
//!
//! Applies rules in sequence: a later rule is only consulted when all
//! earlier rules score two jobs identically. Jobs that tie on every rule
//! are ordered by ID.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchingRule, SchedulingContext};
use crate::models::Job;

/// A composable rule engine for job prioritization.
///
/// # Example
/// ```
/// use u_allocate::dispatching::RuleEngine;
/// use u_allocate::dispatching::rules;
///
/// let sjf = RuleEngine::new().with_rule(rules::Spt);
/// assert_eq!(sjf.primary_name(), Some("SPT"));
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule after the existing ones.
    ///
    /// The first rule added is the primary rule; each later one only
    /// separates jobs the earlier rules could not.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Name of the primary rule.
    pub fn primary_name(&self) -> Option<&'static str> {
        self.rules.first().map(|r| r.name())
    }

    /// Returns the index of the highest-priority candidate.
    pub fn select_best(&self, jobs: &[&Job], context: &SchedulingContext) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, job) in jobs.iter().enumerate() {
            match best {
                None => best = Some(i),
                Some(b) => {
                    if self.compare(job, jobs[b], context) == Ordering::Less {
                        best = Some(i);
                    }
                }
            }
        }
        best
    }

    fn compare(&self, a: &Job, b: &Job, context: &SchedulingContext) -> Ordering {
        for rule in &self.rules {
            let ord = rule
                .evaluate(a, context)
                .total_cmp(&rule.evaluate(b, context));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.id.cmp(&b.id)
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
