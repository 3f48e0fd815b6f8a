//! Steepest-descent hill climbing over job → unit assignments.
//!
//! # Neighbourhood
//!
//! A neighbour moves exactly one job to a different unit. Each round
//! evaluates every (job, unit ≠ current) pair, jobs in ascending ID order
//! and units in ascending ID order, and applies the first pair with the
//! lowest makespan if it is strictly below the current one.
//!
//! # Objective
//!
//! ```text
//! makespan = max over units of Σ length / speed_mips
//! ```
//!
//! Unit ready times and job arrivals are not part of the objective.
//!
//! # Complexity
//!
//! Loads are kept per unit across a round, so scoring a neighbour adjusts
//! two loads and compares them with the heaviest unit the move leaves
//! alone: O(jobs × units) per round. An accepted move re-sums the loads in
//! job order, so every recorded makespan equals [`makespan`] exactly.
//!
//! # Termination
//!
//! Every accepted move strictly lowers a value computed the same way for
//! every assignment, and there are finitely many assignments, so the search
//! always stops. The result is a 1-move local optimum, not a global one.
//!
//! # Reference
//! Russell & Norvig (2021), "Artificial Intelligence: A Modern Approach",
//! Ch. 4.1.1

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

use crate::error::{Result, ScheduleError};
use crate::estimate::execution_time;
use crate::models::{Assignment, ExecutionUnit, Job};

/// One accepted move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Job that moved.
    pub job_id: usize,
    /// Unit it left.
    pub from: usize,
    /// Unit it moved to.
    pub to: usize,
    /// Makespan after the move (s).
    pub makespan: f64,
}

/// Outcome of a hill-climbing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HillClimbResult {
    /// Final assignment. Entry order follows the initial assignment.
    pub assignment: Assignment,
    /// Makespan of the initial assignment (s).
    pub initial_makespan: f64,
    /// Makespan of the final assignment (s).
    pub makespan: f64,
    /// Accepted moves, in order.
    pub moves: Vec<Move>,
    /// False if the round cap ended the search.
    pub converged: bool,
}

/// Steepest-descent local search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HillClimbing {
    max_rounds: Option<usize>,
}

/// Job and unit tables indexed in ascending ID order.
struct Problem {
    job_ids: Vec<usize>,
    unit_ids: Vec<usize>,
    /// durations[j][u]: seconds for job j on unit u.
    durations: Vec<Vec<f64>>,
}

impl Problem {
    fn new(jobs: &[Job], units: &[ExecutionUnit]) -> Result<Self> {
        let mut sorted_jobs: Vec<&Job> = jobs.iter().collect();
        sorted_jobs.sort_by_key(|j| j.id);
        let mut sorted_units: Vec<&ExecutionUnit> = units.iter().collect();
        sorted_units.sort_by_key(|u| u.id);

        let durations = sorted_jobs
            .iter()
            .map(|job| {
                sorted_units
                    .iter()
                    .map(|unit| execution_time(job.length, unit))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            job_ids: sorted_jobs.iter().map(|j| j.id).collect(),
            unit_ids: sorted_units.iter().map(|u| u.id).collect(),
            durations,
        })
    }

    /// Converts an assignment into a unit index per job index.
    fn encode(&self, assignment: &Assignment) -> Result<Vec<usize>> {
        let unit_index: HashMap<usize, usize> = self
            .unit_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let mut seen = HashSet::with_capacity(assignment.len());
        for (job_id, _) in assignment.iter() {
            if !self.job_ids.contains(&job_id) {
                return Err(ScheduleError::config(format!(
                    "assignment references unknown job {job_id}"
                )));
            }
            if !seen.insert(job_id) {
                return Err(ScheduleError::config(format!(
                    "job {job_id} is assigned more than once"
                )));
            }
        }

        self.job_ids
            .iter()
            .map(|&job_id| {
                let unit_id = assignment.unit_of(job_id).ok_or_else(|| {
                    ScheduleError::config(format!("job {job_id} is not assigned"))
                })?;
                unit_index.get(&unit_id).copied().ok_or_else(|| {
                    ScheduleError::config(format!(
                        "job {job_id} assigned to unknown unit {unit_id}"
                    ))
                })
            })
            .collect()
    }

    /// Per-unit load, summed in job order.
    fn loads(&self, placement: &[usize]) -> Vec<f64> {
        let mut loads = vec![0.0; self.unit_ids.len()];
        for (j, &u) in placement.iter().enumerate() {
            loads[u] += self.durations[j][u];
        }
        loads
    }

    fn makespan(&self, placement: &[usize]) -> f64 {
        self.loads(placement).into_iter().fold(0.0, f64::max)
    }
}

/// Indices of the three heaviest units, heaviest first.
///
/// A move touches two units, so the third entry is the heaviest unit a
/// move cannot change.
fn heaviest(loads: &[f64]) -> [Option<usize>; 3] {
    let mut top: [Option<usize>; 3] = [None; 3];
    for mut candidate in 0..loads.len() {
        for slot in &mut top {
            match *slot {
                None => {
                    *slot = Some(candidate);
                    break;
                }
                Some(held) if loads[candidate] > loads[held] => {
                    *slot = Some(candidate);
                    candidate = held;
                }
                Some(_) => {}
            }
        }
    }
    top
}

/// Makespan after moving work off `from` and onto `to`, given the new
/// loads of those two units.
fn moved_makespan(
    loads: &[f64],
    top: &[Option<usize>; 3],
    (from, from_load): (usize, f64),
    (to, to_load): (usize, f64),
) -> f64 {
    let untouched = top
        .iter()
        .flatten()
        .copied()
        .find(|&i| i != from && i != to)
        .map_or(0.0, |i| loads[i]);
    untouched.max(from_load).max(to_load)
}

/// Makespan of `assignment`: the largest per-unit sum of `length / speed`.
///
/// # Errors
/// - `InvalidConfiguration` if a job is unassigned or an entry names an
///   unknown job or unit.
/// - `InvalidResource` if a unit's speed is not positive.
pub fn makespan(assignment: &Assignment, jobs: &[Job], units: &[ExecutionUnit]) -> Result<f64> {
    let problem = Problem::new(jobs, units)?;
    let placement = problem.encode(assignment)?;
    Ok(problem.makespan(&placement))
}

impl HillClimbing {
    /// Creates an unbounded hill climber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after at most `rounds` accepted moves.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Improves `initial` until no single move lowers the makespan.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if `initial` does not bind every job exactly
    ///   once to a known unit.
    /// - `InvalidResource` if a unit's speed is not positive.
    pub fn optimize(
        &self,
        initial: &Assignment,
        jobs: &[Job],
        units: &[ExecutionUnit],
    ) -> Result<HillClimbResult> {
        let problem = Problem::new(jobs, units)?;
        let mut placement = problem.encode(initial)?;
        let mut loads = problem.loads(&placement);
        let initial_makespan = loads.iter().copied().fold(0.0, f64::max);

        let mut current = initial_makespan;
        let mut moves = Vec::new();
        let mut converged = true;

        loop {
            if self.max_rounds.is_some_and(|cap| moves.len() >= cap) {
                converged = false;
                break;
            }

            let top = heaviest(&loads);
            let mut best: Option<(usize, usize)> = None;
            let mut best_makespan = current;

            for (j, &from) in placement.iter().enumerate() {
                let from_load = loads[from] - problem.durations[j][from];
                for u in 0..problem.unit_ids.len() {
                    if u == from {
                        continue;
                    }
                    let to_load = loads[u] + problem.durations[j][u];
                    let candidate = moved_makespan(&loads, &top, (from, from_load), (u, to_load));
                    trace!(
                        job_id = problem.job_ids[j],
                        unit_id = problem.unit_ids[u],
                        makespan = candidate,
                        "neighbour"
                    );
                    if candidate < best_makespan {
                        best_makespan = candidate;
                        best = Some((j, u));
                    }
                }
            }

            let Some((j, u)) = best else {
                break;
            };

            let from = placement[j];
            placement[j] = u;
            let next_loads = problem.loads(&placement);
            let value = next_loads.iter().copied().fold(0.0, f64::max);
            if value >= current {
                // The adjusted loads rounded differently from a fresh sum.
                placement[j] = from;
                break;
            }

            let step = Move {
                job_id: problem.job_ids[j],
                from: problem.unit_ids[from],
                to: problem.unit_ids[u],
                makespan: value,
            };
            debug!(
                job_id = step.job_id,
                from = step.from,
                to = step.to,
                makespan = value,
                "accepted move"
            );
            loads = next_loads;
            current = value;
            moves.push(step);
        }

        let mut assignment = initial.clone();
        for (j, &u) in placement.iter().enumerate() {
            assignment.assign(problem.job_ids[j], problem.unit_ids[u]);
        }

        info!(
            jobs = jobs.len(),
            units = units.len(),
            initial_makespan,
            makespan = current,
            moves = moves.len(),
            converged,
            "hill climbing complete"
        );

        Ok(HillClimbResult {
            assignment,
            initial_makespan,
            makespan: current,
            moves,
            converged,
        })
    }
}
