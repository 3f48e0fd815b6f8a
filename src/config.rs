//! TOML run configuration.
//!
//! ```toml
//! [workload]
//! seed = 7                # draws speeds for units that omit speed_mips
//!
//! [[units]]
//! id = 0
//! speed_mips = 1000.0
//!
//! [[units]]
//! id = 1                  # speed drawn from 100..=1600
//!
//! [[jobs]]
//! id = 0
//! length = 20000
//! arrival_time = 1.5
//! deadline = 40.0
//!
//! [policy]
//! kind = "round_robin"
//! quantum = 500
//! ```
//!
//! For `kind = "hill_climbing"`, `initial = [[job, unit], ...]` gives an
//! explicit starting assignment, otherwise `seed` gives a random one,
//! otherwise jobs start on the least-loaded unit.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{Assignment, ExecutionUnit, Job};
use crate::optimize::InitialAssignment;
use crate::runner::Policy;

/// Lowest speed drawn for a unit without `speed_mips`.
pub const MIN_RANDOM_MIPS: u32 = 100;
/// Highest speed drawn for a unit without `speed_mips`.
pub const MAX_RANDOM_MIPS: u32 = 1600;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub workload: WorkloadConfig,
    pub units: Vec<UnitConfig>,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkloadConfig {
    /// Seed for drawing unit speeds.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    pub id: usize,
    #[serde(default)]
    pub name: Option<String>,
    /// Drawn from the workload seed when omitted.
    pub speed_mips: Option<f64>,
    #[serde(default)]
    pub ready_time: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub id: usize,
    #[serde(default)]
    pub name: Option<String>,
    /// Instructions (MI).
    pub length: u64,
    #[serde(default)]
    pub arrival_time: f64,
    pub deadline: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Edf,
    MinMin,
    MinMax,
    DeadlineMinMin,
    RoundRobin,
    HillClimbing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    pub kind: PolicyKind,
    /// Round-Robin quantum (MI).
    pub quantum: Option<u64>,
    /// Hill-climbing random start seed.
    pub seed: Option<u64>,
    /// Hill-climbing explicit start as `[job, unit]` pairs.
    pub initial: Option<Vec<(usize, usize)>>,
}

impl RunConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Builds the jobs, units and policy this configuration describes.
    ///
    /// Domain values (positive lengths, speeds, ...) are checked later by
    /// the policy itself.
    pub fn build(&self) -> Result<(Vec<Job>, Vec<ExecutionUnit>, Policy), ConfigError> {
        Ok((self.build_jobs(), self.build_units()?, self.policy.build()?))
    }

    fn build_units(&self) -> Result<Vec<ExecutionUnit>, ConfigError> {
        let mut rng = self.workload.seed.map(StdRng::seed_from_u64);

        self.units
            .iter()
            .map(|cfg| {
                let speed = match (cfg.speed_mips, rng.as_mut()) {
                    (Some(speed), _) => speed,
                    (None, Some(rng)) => {
                        let drawn = rng.random_range(MIN_RANDOM_MIPS..=MAX_RANDOM_MIPS);
                        debug!(unit_id = cfg.id, speed_mips = drawn, "drew unit speed");
                        f64::from(drawn)
                    }
                    (None, None) => {
                        return Err(ConfigError::Invalid(format!(
                            "unit {} has no speed_mips and [workload] seed is unset",
                            cfg.id
                        )));
                    }
                };
                let mut unit = ExecutionUnit::new(cfg.id, speed).with_ready_time(cfg.ready_time);
                if let Some(name) = &cfg.name {
                    unit = unit.with_name(name.clone());
                }
                Ok(unit)
            })
            .collect()
    }

    fn build_jobs(&self) -> Vec<Job> {
        self.jobs
            .iter()
            .map(|cfg| {
                let mut job = Job::new(cfg.id, cfg.length).with_arrival(cfg.arrival_time);
                job.deadline = cfg.deadline;
                if let Some(name) = &cfg.name {
                    job = job.with_name(name.clone());
                }
                job
            })
            .collect()
    }
}

impl PolicyConfig {
    /// Resolves the policy and its parameters.
    pub fn build(&self) -> Result<Policy, ConfigError> {
        Ok(match self.kind {
            PolicyKind::Fcfs => Policy::Fcfs,
            PolicyKind::Sjf => Policy::Sjf,
            PolicyKind::Edf => Policy::Edf,
            PolicyKind::MinMin => Policy::MinMin,
            PolicyKind::MinMax => Policy::MinMax,
            PolicyKind::DeadlineMinMin => Policy::DeadlineMinMin,
            PolicyKind::RoundRobin => match self.quantum {
                Some(quantum) if quantum > 0 => Policy::RoundRobin { quantum },
                Some(_) => {
                    return Err(ConfigError::Invalid("quantum must be positive".into()));
                }
                None => {
                    return Err(ConfigError::Invalid(
                        "round_robin requires a quantum".into(),
                    ));
                }
            },
            PolicyKind::HillClimbing => {
                let initial = match (&self.initial, self.seed) {
                    (Some(pairs), _) => {
                        InitialAssignment::Explicit(Assignment::from_pairs(pairs.iter().copied()))
                    }
                    (None, Some(seed)) => InitialAssignment::Random { seed },
                    (None, None) => InitialAssignment::LeastLoaded,
                };
                Policy::HillClimbing { initial }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [workload]
        seed = 7

        [[units]]
        id = 0
        name = "vm-0"
        speed_mips = 1000.0

        [[units]]
        id = 1
        ready_time = 2.5

        [[jobs]]
        id = 0
        length = 20000

        [[jobs]]
        id = 1
        length = 5000
        arrival_time = 1.5
        deadline = 40.0

        [policy]
        kind = "round_robin"
        quantum = 500
    "#;

    #[test]
    fn test_parse_and_build() {
        let config = RunConfig::from_toml_str(FULL).unwrap();
        let (jobs, units, policy) = config.build().unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].length, 5000);
        assert!((jobs[1].arrival_time - 1.5).abs() < 1e-10);
        assert_eq!(jobs[1].deadline, Some(40.0));
        assert_eq!(jobs[0].deadline, None);

        assert_eq!(units[0].name, "vm-0");
        assert!((units[0].speed_mips - 1000.0).abs() < 1e-10);
        assert!((units[1].ready_time - 2.5).abs() < 1e-10);
        let drawn = units[1].speed_mips;
        assert!((100.0..=1600.0).contains(&drawn));
        assert_eq!(drawn.fract(), 0.0);

        assert_eq!(policy, Policy::RoundRobin { quantum: 500 });
    }

    #[test]
    fn test_random_speeds_reproducible() {
        let a = RunConfig::from_toml_str(FULL).unwrap().build().unwrap().1;
        let b = RunConfig::from_toml_str(FULL).unwrap().build().unwrap().1;
        assert_eq!(a[1].speed_mips, b[1].speed_mips);
    }

    #[test]
    fn test_missing_speed_without_seed() {
        let toml = r#"
            [[units]]
            id = 0
            [policy]
            kind = "fcfs"
        "#;
        let err = RunConfig::from_toml_str(toml).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_round_robin_needs_quantum() {
        let base = "[[units]]\nid = 0\nspeed_mips = 100.0\n[policy]\nkind = \"round_robin\"\n";
        let err = RunConfig::from_toml_str(base).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let zero = format!("{base}quantum = 0\n");
        let err = RunConfig::from_toml_str(&zero).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_policy_kinds() {
        let cases = [
            ("fcfs", Policy::Fcfs),
            ("sjf", Policy::Sjf),
            ("edf", Policy::Edf),
            ("min_min", Policy::MinMin),
            ("min_max", Policy::MinMax),
            ("deadline_min_min", Policy::DeadlineMinMin),
        ];
        for (kind, expected) in cases {
            let toml = format!("[[units]]\nid = 0\nspeed_mips = 1.0\n[policy]\nkind = \"{kind}\"\n");
            let policy = RunConfig::from_toml_str(&toml).unwrap().build().unwrap().2;
            assert_eq!(policy, expected);
        }
    }

    #[test]
    fn test_hill_climbing_initial() {
        let head = "[[units]]\nid = 0\nspeed_mips = 1.0\n[policy]\nkind = \"hill_climbing\"\n";

        let explicit = format!("{head}initial = [[0, 0], [1, 0]]\n");
        let policy = RunConfig::from_toml_str(&explicit).unwrap().policy.build().unwrap();
        assert_eq!(
            policy,
            Policy::HillClimbing {
                initial: InitialAssignment::Explicit(Assignment::from_pairs([(0, 0), (1, 0)]))
            }
        );

        let seeded = format!("{head}seed = 9\n");
        let policy = RunConfig::from_toml_str(&seeded).unwrap().policy.build().unwrap();
        assert_eq!(
            policy,
            Policy::HillClimbing {
                initial: InitialAssignment::Random { seed: 9 }
            }
        );

        let policy = RunConfig::from_toml_str(head).unwrap().policy.build().unwrap();
        assert_eq!(
            policy,
            Policy::HillClimbing {
                initial: InitialAssignment::LeastLoaded
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            RunConfig::from_toml_str("[policy]\nkind = \"lottery\"\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RunConfig::from_file("/nonexistent/run.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_build_then_run() {
        let config = RunConfig::from_toml_str(FULL).unwrap();
        let (jobs, units, policy) = config.build().unwrap();
        let report = crate::runner::run(&policy, &jobs, &units).unwrap();
        assert_eq!(report.schedule.result_count(), 2);
    }
}
