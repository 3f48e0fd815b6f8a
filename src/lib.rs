//! Job allocation on heterogeneous-speed execution units.
//!
//! Decides which unit runs each job and when: greedy list and batch
//! heuristics, a preemptive Round-Robin scheduler, and hill-climbing local
//! search, all driven by a single completion-time estimator. Every policy
//! is a deterministic function of its inputs.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Job`, `ExecutionUnit`, `Assignment`,
//!   `Schedule`, `ExecutionRecord`
//! - **`estimate`**: Completion-time estimator (`ready + length / speed`)
//! - **`validation`**: Input integrity checks (duplicate IDs, speeds, lengths)
//! - **`dispatching`**: Priority rules (FIFO, SPT, EDD) and the rule engine
//! - **`scheduler`**: FCFS/SJF/EDF, Min-Min/Min-Max/Deadline-Min-Min,
//!   Round-Robin, and schedule metrics
//! - **`optimize`**: Hill climbing over job → unit assignments
//! - **`substrate`**: Realizes an assignment; verifies realized results
//! - **`runner`**: `Policy` selection and the single-run driver
//! - **`config`**: TOML run configuration
//!
//! # Quick Start
//!
//! ```
//! use u_allocate::models::{ExecutionUnit, Job};
//! use u_allocate::runner::{run, Policy};
//!
//! let units = vec![ExecutionUnit::new(0, 1000.0)];
//! let jobs = vec![
//!     Job::new(0, 100_000),
//!     Job::new(1, 50_000).with_arrival(2.0),
//!     Job::new(2, 20_000).with_arrival(1.0),
//! ];
//!
//! let report = run(&Policy::Fcfs, &jobs, &units).unwrap();
//! assert_eq!(report.schedule.makespan(), 170.0);
//! assert_eq!(report.metrics.unwrap().completed, 3);
//! ```
//!
//! # Logging
//!
//! Emits `tracing` events (debug per committed job or slice, trace per
//! hill-climbing neighbour, info per run). No subscriber is installed.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Braun et al. (2001), "A Comparison of Eleven Static Heuristics for
//!   Mapping a Class of Independent Tasks onto Heterogeneous Distributed
//!   Computing Systems"
//! - Calheiros et al. (2011), "CloudSim: a toolkit for modeling and
//!   simulation of cloud computing environments"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod estimate;
pub mod models;
pub mod optimize;
pub mod runner;
pub mod scheduler;
pub mod substrate;
pub mod validation;

pub use error::{Result, ScheduleError};
