//! Time budget for the search

use std::time::{Duration, Instant};

/// A monotonic start time plus a fixed budget.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock with a budget given in seconds.
    pub fn start(seconds: f64) -> Deadline {
        requires!(seconds >= 0.0 && seconds.is_finite());
        Deadline {
            start: Instant::now(),
            budget: Duration::from_secs_f64(seconds),
        }
    }
    /// True once the budget is used up.
    pub fn exceeded(&self) -> bool {
        self.start.elapsed() >= self.budget
    }
    /// Seconds elapsed since the clock started.
    pub fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
