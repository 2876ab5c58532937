//! Utility functions and structures for the SDVRP solver.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::instance::Instance;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = duration.subsec_millis();

    format!("{}h {:02}m {:02}.{:03}s", hours, minutes, seconds, millis)
}

/// Split a flat solution `0, c1, l1, ..., 0, 0, ...` into routes of
/// `(customer, load)` pairs. Empty routes are skipped.
pub fn split_routes(flat: &[i32]) -> Vec<Vec<(i32, i32)>> {
    let mut routes = Vec::new();
    let mut route = Vec::new();
    let mut index = 0;
    while index < flat.len() {
        if flat[index] == 0 {
            if !route.is_empty() {
                routes.push(std::mem::take(&mut route));
            }
            index += 1;
        } else {
            let load = flat.get(index + 1).copied().unwrap_or(0);
            route.push((flat[index], load));
            index += 2;
        }
    }
    if !route.is_empty() {
        routes.push(route);
    }
    routes
}

/// Save a solution to a file.
pub fn save_solution<P: AsRef<Path>>(
    solution: &Solution,
    instance: &Instance,
    path: P,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "SDVRP Solution")?;
    writeln!(file, "Total Distance: {}", solution.objective())?;
    writeln!(file, "Number of Routes: {}", solution.get_route_count())?;
    writeln!(file)?;

    for (i, route) in solution.routes().iter().enumerate() {
        write!(file, "Route #{}: 0", i + 1)?;
        let mut load = 0;
        let mut previous = 0;
        let mut distance = 0;
        for &(customer, amount) in route {
            write!(file, " -> {} ({})", customer, amount)?;
            load += amount;
            distance += instance.distance(previous, customer);
            previous = customer;
        }
        distance += instance.distance(previous, 0);
        writeln!(file, " -> 0")?;
        writeln!(file, "  Distance: {}", distance)?;
        writeln!(file, "  Load: {} / {}", load, instance.capacity)?;
        writeln!(file)?;
    }

    Ok(())
}

/// Statistics about the search process.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    pub iterations: u64,
    pub accepted: u64,
    pub improvements: u64,
    pub runtime: Duration,
    pub initial_objective: i32,
    pub best_objective: i32,
    pub best_routes: usize,
}

impl SearchStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Iterations: {}
- Accepted: {}
- Improvements: {}
- Runtime: {}
- Initial Objective: {}
- Best Objective: {}
- Best Solution Routes: {}",
            self.iterations,
            self.accepted,
            self.improvements,
            format_duration(self.runtime),
            self.initial_objective,
            self.best_objective,
            self.best_routes
        )
    }
}
