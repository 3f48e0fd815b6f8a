//! Execution unit model.
//!
//! An execution unit is anything that processes instructions at a fixed
//! rate: a VM, a worker node, a core. Units differ only in speed; the
//! only mutable state is the ready time, which the active policy advances
//! as it commits work.

use serde::{Deserialize, Serialize};

/// A processing unit with a fixed speed and a ready time.
///
/// # Time Representation
/// Times are in seconds relative to the start of the run (t=0).
/// Speeds are in MIPS (millions of instructions per second), matching
/// job lengths expressed in millions of instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionUnit {
    /// Unit identifier (0..n-1 by convention).
    pub id: usize,
    /// Human-readable name.
    pub name: String,
    /// Processing speed (MIPS). Must be positive.
    pub speed_mips: f64,
    /// Earliest time the unit is free to start new work.
    pub ready_time: f64,
}

impl ExecutionUnit {
    /// Creates a unit that is free at t=0.
    pub fn new(id: usize, speed_mips: f64) -> Self {
        Self {
            id,
            name: String::new(),
            speed_mips,
            ready_time: 0.0,
        }
    }

    /// Sets the unit name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initial ready time.
    pub fn with_ready_time(mut self, ready_time: f64) -> Self {
        self.ready_time = ready_time;
        self
    }

    /// Advances the ready time to `time`.
    ///
    /// Never moves the ready time backwards.
    pub fn advance_to(&mut self, time: f64) {
        if time > self.ready_time {
            self.ready_time = time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_builder() {
        let u = ExecutionUnit::new(2, 1500.0)
            .with_name("vm-2")
            .with_ready_time(4.5);

        assert_eq!(u.id, 2);
        assert_eq!(u.name, "vm-2");
        assert!((u.speed_mips - 1500.0).abs() < 1e-10);
        assert!((u.ready_time - 4.5).abs() < 1e-10);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut u = ExecutionUnit::new(0, 1000.0);
        u.advance_to(10.0);
        assert!((u.ready_time - 10.0).abs() < 1e-10);

        u.advance_to(3.0);
        assert!((u.ready_time - 10.0).abs() < 1e-10);
    }
}
