//! Starting assignments for local search.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::error::Result;
use crate::estimate::execution_time;
use crate::models::{Assignment, ExecutionUnit, Job};

/// Binds each job to a uniformly random unit, in input order.
///
/// Returns an empty assignment when `units` is empty.
pub fn random_assignment<R: Rng>(jobs: &[Job], units: &[ExecutionUnit], rng: &mut R) -> Assignment {
    if units.is_empty() {
        return Assignment::new();
    }
    Assignment::from_pairs(
        jobs.iter()
            .filter_map(|job| units.choose(rng).map(|unit| (job.id, unit.id))),
    )
}

/// Binds each job, in input order, to the unit with the least accumulated
/// execution time (lowest ID on ties).
///
/// # Errors
/// `InvalidResource` if a unit's speed is not positive.
pub fn least_loaded_assignment(jobs: &[Job], units: &[ExecutionUnit]) -> Result<Assignment> {
    let mut load = vec![0.0_f64; units.len()];
    let mut assignment = Assignment::new();

    for job in jobs {
        let mut best: Option<usize> = None;
        for (idx, unit) in units.iter().enumerate() {
            let better = match best {
                None => true,
                Some(b) => load[idx] < load[b] || (load[idx] == load[b] && unit.id < units[b].id),
            };
            if better {
                best = Some(idx);
            }
        }
        if let Some(idx) = best {
            load[idx] += execution_time(job.length, &units[idx])?;
            assignment.assign(job.id, units[idx].id);
        }
    }

    Ok(assignment)
}
