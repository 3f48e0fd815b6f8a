//! Allocation domain models.
//!
//! Provides the data types shared by every policy: the execution units that
//! run work, the jobs being placed, and the schedule a policy emits.
//!
//! # Domain Mappings
//!
//! | u-allocate | Cloud | Batch cluster | Single machine |
//! |------------|-------|---------------|----------------|
//! | Job | Cloudlet | Batch job | Process |
//! | ExecutionUnit | VM | Worker node | CPU |
//! | Assignment | Broker binding | Placement | Run queue |
//! | Schedule | Simulation result | Job log | Gantt chart |

mod assignment;
mod job;
mod schedule;
mod unit;

pub use assignment::Assignment;
pub use job::Job;
pub use schedule::{ExecutionRecord, Schedule, ScheduleResult, SliceOutcome};
pub use unit::ExecutionUnit;
