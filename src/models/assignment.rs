//! Assignment model.
//!
//! An assignment binds each job to a unit. Entry order is execution
//! order: on any one unit, jobs run in the order their entries appear.

use serde::{Deserialize, Serialize};

/// Ordered job → unit mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    entries: Vec<(usize, usize)>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from `(job_id, unit_id)` pairs in order.
    ///
    /// A repeated job id rebinds the earlier entry in place.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut assignment = Self::new();
        for (job_id, unit_id) in pairs {
            assignment.assign(job_id, unit_id);
        }
        assignment
    }

    /// Binds `job_id` to `unit_id`.
    ///
    /// New jobs are appended; an already-bound job keeps its position
    /// and only changes unit.
    pub fn assign(&mut self, job_id: usize, unit_id: usize) {
        match self.entries.iter_mut().find(|(j, _)| *j == job_id) {
            Some(entry) => entry.1 = unit_id,
            None => self.entries.push((job_id, unit_id)),
        }
    }

    /// Unit bound to `job_id`.
    pub fn unit_of(&self, job_id: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|(j, _)| *j == job_id)
            .map(|&(_, u)| u)
    }

    /// Iterates `(job_id, unit_id)` pairs in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of bound jobs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no job is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
