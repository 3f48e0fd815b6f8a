//! Scheduling context for dispatching rule evaluation.

/// Runtime state passed to dispatching rules.
///
/// All times are in seconds relative to the start of the run (t=0).
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    /// Current scheduling clock (s).
    pub current_time: f64,
}

impl SchedulingContext {
    /// Creates a context at the given time.
    pub fn at_time(current_time: f64) -> Self {
        Self { current_time }
    }
}
