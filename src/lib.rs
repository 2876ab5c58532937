//! # SDVRP
//!
//! A ruin-and-recreate metaheuristic for the Split Delivery Vehicle Routing
//! Problem: customers may be served by several routes, each delivering part
//! of the demand, and the total travelled distance is minimized under a
//! per-route capacity.
//!
//! The search repeatedly ruins the current solution, reinserts the removed
//! demand with a blinking greedy insertion, improves the result with intra-
//! and inter-route local search and decides through an acceptance rule
//! whether it replaces the current solution. The best solution found within
//! the time budget is returned.

pub mod acceptance;
pub mod config;
pub mod distance_matrix_optimizer;
pub mod error;
pub mod instance;
pub mod listener;
pub mod local_search;
pub mod reinsertion;
pub mod route_context;
pub mod ruin;
pub mod solution;
pub mod sorter;
pub mod utils;

use crate::acceptance::create_acceptance_rule;
use crate::config::Config;
use crate::distance_matrix_optimizer::DistanceMatrixOptimizer;
use crate::error::SolverError;
use crate::instance::Instance;
use crate::listener::Listener;
use crate::local_search::LocalSearch;
use crate::reinsertion::Reinsertion;
use crate::route_context::RouteContext;
use crate::ruin::RuinMethod;
use crate::solution::{Customer, Solution};
use crate::sorter::Sorter;
use crate::utils::SearchStatistics;

use log::{debug, info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

pub use crate::utils::split_routes;

/// The random generator threaded through every randomized component.
pub type Random = ChaCha8Rng;

/// The main solver structure driving the ruin-and-recreate search.
pub struct Solver {
    pub config: Config,
    pub iterations: u64,
    pub run_time: Duration,
    pub statistics: Option<SearchStatistics>,
    listener: Option<Box<dyn Listener>>,
}

impl Solver {
    /// Create a solver; the configuration is validated here.
    pub fn new(config: Config) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Solver {
            config,
            iterations: 0,
            run_time: Duration::from_secs(0),
            statistics: None,
            listener: None,
        })
    }

    /// Attach a listener receiving progress events.
    pub fn with_listener(mut self, listener: Box<dyn Listener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Solve an instance and return the best solution found.
    pub fn solve(&mut self, instance: &Instance) -> Result<Solution, SolverError> {
        let start_time = Instant::now();
        let time_limit = self.config.time_limit_duration();
        let mut rng = Random::seed_from_u64(self.config.random_seed as u64);

        let mut acceptance = create_acceptance_rule(&self.config.acceptance_rule_type)?;
        let ruin = RuinMethod::new(&self.config.ruin_method_type, instance);
        let sorter = Sorter::new(self.config.sorters.clone());
        let reinsertion = Reinsertion::new(self.config.blink_rate);
        let mut local_search = LocalSearch::new(
            self.config.intra_operators.clone(),
            self.config.inter_operators.clone(),
        );

        info!(
            "Solving instance with {} customers, capacity {}, total demand {}",
            instance.get_customer_count(),
            instance.capacity,
            instance.total_demand()
        );

        // Init
        let mut current = Solution::new();
        let mut context = RouteContext::new(instance, &current);
        let mut customers: Vec<(Customer, i32)> = (1..instance.num_customers as Customer)
            .map(|customer| (customer, instance.demand(customer)))
            .filter(|&(_, demand)| demand > 0)
            .collect();
        sorter.sort(instance, &mut customers, &mut rng);
        reinsertion.reinsert(instance, &mut current, &mut context, &customers, &mut rng);
        local_search.run(instance, &mut current, &mut context, &mut rng);
        if cfg!(debug_assertions) {
            current.validate(instance)?;
        }

        let initial_objective = current.objective();
        let mut best = current.clone();
        let mut accepted = 0u64;
        let mut improvements = 0u64;
        debug!("Initial solution: objective {}", initial_objective);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_start();
        }

        // Iterating
        self.iterations = 0;
        while !self.should_terminate(start_time, time_limit) {
            self.iterations += 1;

            let mut candidate = current.clone();
            let mut candidate_context = context.clone();
            let mut removed = ruin.ruin(instance, &mut candidate, &mut candidate_context, &mut rng);
            sorter.sort(instance, &mut removed, &mut rng);
            reinsertion.reinsert(
                instance,
                &mut candidate,
                &mut candidate_context,
                &removed,
                &mut rng,
            );
            local_search.run(instance, &mut candidate, &mut candidate_context, &mut rng);
            if cfg!(debug_assertions) {
                candidate.validate(instance)?;
            }

            let (current_objective, candidate_objective) =
                (current.objective(), candidate.objective());
            if acceptance.accept(current_objective, candidate_objective, &mut rng) {
                trace!(
                    "Iteration {}: accepted {} (current {})",
                    self.iterations,
                    candidate_objective,
                    current_objective
                );
                accepted += 1;
                current = candidate;
                context = candidate_context;

                if current.objective() < best.objective() {
                    improvements += 1;
                    best = current.clone();
                    if let Some(listener) = self.listener.as_mut() {
                        listener.on_updated(&best, best.objective());
                    }
                }
            }
        }

        // Terminated
        self.run_time = start_time.elapsed();
        if let Some(listener) = self.listener.as_mut() {
            listener.on_end(&best, best.objective());
        }
        best.validate(instance)?;

        let statistics = SearchStatistics {
            iterations: self.iterations,
            accepted,
            improvements,
            runtime: self.run_time,
            initial_objective,
            best_objective: best.objective(),
            best_routes: best.get_route_count(),
        };
        info!("{}", statistics.format());
        self.statistics = Some(statistics);

        Ok(best)
    }

    /// Check if the termination criteria are met.
    fn should_terminate(&self, start_time: Instant, time_limit: Duration) -> bool {
        if let Some(max_iterations) = self.config.max_iterations {
            if self.iterations >= max_iterations {
                return true;
            }
        }
        start_time.elapsed() >= time_limit
    }
}

/// Solve an instance end to end and return the flat route encoding.
///
/// The distances are first closed under shortest paths; detours the search
/// relied on are made explicit again as zero-load visits before encoding.
pub fn solve_sdvrp(config: &Config, instance: &Instance) -> Result<Vec<i32>, SolverError> {
    Ok(solve_restored(config, instance, None)?.to_flat())
}

/// Solve on the shortest-path closure of the distances and restore the
/// detours, reporting progress to `listener`.
///
/// The returned solution is valid for `instance` and its objective is the
/// distance under the original matrix.
pub fn solve_restored(
    config: &Config,
    instance: &Instance,
    listener: Option<Box<dyn Listener>>,
) -> Result<Solution, SolverError> {
    let mut solver = Solver::new(config.clone())?;
    if let Some(listener) = listener {
        solver = solver.with_listener(listener);
    }

    let mut optimized = instance.clone();
    let optimizer = DistanceMatrixOptimizer::new(&mut optimized.distance_matrix);

    let mut solution = solver.solve(&optimized)?;
    optimizer.restore(&optimized, &mut solution);
    solution.validate(instance)?;
    Ok(solution)
}
