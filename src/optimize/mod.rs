//! Local-search optimization of job → unit assignments.
//!
//! # Components
//!
//! - [`HillClimbing`]: steepest-descent search minimizing the
//!   sum-of-loads makespan
//! - [`random_assignment`], [`least_loaded_assignment`]: starting points
//! - [`HillClimbingPolicy`]: the optimizer as an [`AllocationPolicy`],
//!   realizing the optimized assignment through an execution substrate
//!
//! # Usage
//!
//! ```
//! use u_allocate::models::{Assignment, ExecutionUnit, Job};
//! use u_allocate::optimize::HillClimbing;
//!
//! let units = vec![ExecutionUnit::new(0, 1000.0), ExecutionUnit::new(1, 1000.0)];
//! let jobs = vec![Job::new(0, 2000), Job::new(1, 2000)];
//! let initial = Assignment::from_pairs([(0, 0), (1, 0)]);
//!
//! let result = HillClimbing::new().optimize(&initial, &jobs, &units).unwrap();
//! assert_eq!(result.makespan, 2.0);
//! ```

mod hill_climbing;
mod initial;

pub use hill_climbing::{makespan, HillClimbResult, HillClimbing, Move};
pub use initial::{least_loaded_assignment, random_assignment};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::{Assignment, ExecutionUnit, Job, Schedule};
use crate::scheduler::AllocationPolicy;
use crate::substrate::{ExecutionSubstrate, SpaceSharedSubstrate};
use crate::validation::validate_input;

/// Where hill climbing starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialAssignment {
    /// A caller-supplied assignment.
    Explicit(Assignment),
    /// Uniform random unit per job from a seeded generator.
    Random { seed: u64 },
    /// Each job to the unit with the least accumulated execution time.
    LeastLoaded,
}

impl InitialAssignment {
    /// Builds the starting assignment for `jobs` on `units`.
    pub fn build(&self, jobs: &[Job], units: &[ExecutionUnit]) -> Result<Assignment> {
        match self {
            Self::Explicit(assignment) => Ok(assignment.clone()),
            Self::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok(random_assignment(jobs, units, &mut rng))
            }
            Self::LeastLoaded => least_loaded_assignment(jobs, units),
        }
    }
}

/// Hill climbing as an allocation policy.
///
/// The optimized assignment is executed on a [`SpaceSharedSubstrate`], so
/// realized times honour unit ready times and job arrivals even though the
/// search objective ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct HillClimbingPolicy {
    initial: InitialAssignment,
    optimizer: HillClimbing,
}

impl HillClimbingPolicy {
    /// Creates the policy from a starting-point strategy.
    pub fn new(initial: InitialAssignment) -> Self {
        Self {
            initial,
            optimizer: HillClimbing::new(),
        }
    }

    /// Replaces the optimizer (e.g., to cap rounds).
    pub fn with_optimizer(mut self, optimizer: HillClimbing) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Runs the search without realizing it.
    pub fn search(&self, jobs: &[Job], units: &[ExecutionUnit]) -> Result<HillClimbResult> {
        validate_input(jobs, units)?;
        let initial = self.initial.build(jobs, units)?;
        self.optimizer.optimize(&initial, jobs, units)
    }
}

impl AllocationPolicy for HillClimbingPolicy {
    fn name(&self) -> &'static str {
        "HillClimbing"
    }

    fn allocate(&self, jobs: &mut [Job], units: &mut [ExecutionUnit]) -> Result<Schedule> {
        let result = self.search(jobs, units)?;
        let realized = SpaceSharedSubstrate::new().execute(&result.assignment, jobs, units)?;

        jobs.iter_mut().for_each(Job::mark_completed);
        let mut schedule = Schedule::new();
        for r in realized {
            if let Some(unit) = units.iter_mut().find(|u| u.id == r.unit_id) {
                unit.advance_to(r.finish_time);
            }
            schedule.add_result(r);
        }

        info!(
            policy = "HillClimbing",
            jobs = jobs.len(),
            units = units.len(),
            search_makespan = result.makespan,
            makespan = schedule.makespan(),
            "allocation complete"
        );
        Ok(schedule)
    }
}
