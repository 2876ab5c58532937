//! Observers of solver progress.

use crate::solution::Solution;
use crate::utils::format_duration;
use log::{debug, info};
use std::time::Instant;

/// Receives the events of a solve.
pub trait Listener {
    /// The initial solution is built and the search starts.
    fn on_start(&mut self) {}

    /// A strictly better solution was found.
    fn on_updated(&mut self, _solution: &Solution, _objective: i32) {}

    /// The search stopped; `solution` is the best found.
    fn on_end(&mut self, _solution: &Solution, _objective: i32) {}
}

/// Reports progress through the `log` facade.
#[derive(Debug, Clone)]
pub struct LogListener {
    start_time: Instant,
    updates: usize,
}

impl Default for LogListener {
    fn default() -> Self {
        Self::new()
    }
}

impl LogListener {
    pub fn new() -> Self {
        LogListener {
            start_time: Instant::now(),
            updates: 0,
        }
    }
}

impl Listener for LogListener {
    fn on_start(&mut self) {
        self.start_time = Instant::now();
        self.updates = 0;
        info!("Search started");
    }

    fn on_updated(&mut self, solution: &Solution, objective: i32) {
        self.updates += 1;
        debug!(
            "New best solution: objective {} with {} routes after {}",
            objective,
            solution.get_route_count(),
            format_duration(self.start_time.elapsed())
        );
    }

    fn on_end(&mut self, solution: &Solution, objective: i32) {
        info!(
            "Search finished after {}: objective {} with {} routes ({} improvements)",
            format_duration(self.start_time.elapsed()),
            objective,
            solution.get_route_count(),
            self.updates
        );
    }
}
