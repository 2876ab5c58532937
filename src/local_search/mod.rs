//! Local search operators for the SDVRP solver.
//!
//! Every operator looks for the best improving move in one route (intra) or
//! in an ordered pair of routes (inter), applies it and returns the change of
//! the objective. Capacity is never violated and every customer keeps the
//! total amount delivered to it.

pub mod cross;
pub mod exchange;
pub mod or_opt;
pub mod relocate;
pub mod sd_swap;
pub mod sd_swap_star;
pub mod swap;
pub mod swap_star;
pub mod utils;

use crate::config::{InterOperator, IntraOperator};
use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::Solution;
use crate::Random;
use itertools::Itertools;
use log::trace;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use utils::InsertionCache;

/// Cached entries kept before the memory of the search is reset.
const MAX_CACHED_ENTRIES: usize = 1 << 18;

/// Manages the local search phase of the solver.
///
/// Results are remembered across calls by route signature: a route pair
/// on which an operator found no improving move is skipped until one of the
/// two routes changes, even when the pair shows up again in a later
/// candidate solution.
pub struct LocalSearch {
    intra_operators: Vec<IntraOperator>,
    inter_operators: Vec<InterOperator>,
    /// (operator, signature, signature) triples without an improving move
    exhausted_pairs: FxHashSet<(usize, u64, u64)>,
    /// Signatures of routes no intra-route operator can improve
    exhausted_routes: FxHashSet<u64>,
    /// Insertion tables shared by the SWAP* variants
    insertion_cache: InsertionCache,
    /// Improving moves applied by the last call to `run`
    move_count: usize,
}

impl InterOperator {
    /// Whether the move differs when the two routes are swapped.
    fn is_directional(&self) -> bool {
        !matches!(self, InterOperator::Swap22 | InterOperator::SwapStar)
    }
}

impl LocalSearch {
    /// Create a new local search with the given operator lists.
    pub fn new(intra_operators: Vec<IntraOperator>, inter_operators: Vec<InterOperator>) -> Self {
        LocalSearch {
            intra_operators,
            inter_operators,
            exhausted_pairs: FxHashSet::default(),
            exhausted_routes: FxHashSet::default(),
            insertion_cache: InsertionCache::default(),
            move_count: 0,
        }
    }

    /// Improve a solution until no configured operator finds an improving move.
    ///
    /// Routes emptied by the search are removed from `context` at the end.
    pub fn run(
        &mut self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        rng: &mut Random,
    ) {
        self.limit_memory();
        self.move_count = 0;
        let start = solution.objective();

        for route in 0..context.num_routes() {
            self.intra_route(instance, solution, context, route);
        }

        let mut improvement = true;
        while improvement {
            improvement = false;

            for op_index in 0..self.inter_operators.len() {
                let operator = self.inter_operators[op_index];
                let mut pairs: Vec<(usize, usize)> = (0..context.num_routes())
                    .tuple_combinations()
                    .collect();
                if operator.is_directional() {
                    let reversed: Vec<(usize, usize)> =
                        pairs.iter().map(|&(r1, r2)| (r2, r1)).collect();
                    pairs.extend(reversed);
                }
                pairs.shuffle(rng);

                for (r1, r2) in pairs {
                    if context.is_empty(r1) || context.is_empty(r2) {
                        continue;
                    }
                    let key = Self::pair_key(op_index, operator, context, r1, r2);
                    if self.exhausted_pairs.contains(&key) {
                        continue;
                    }
                    if self
                        .inter_route(operator, instance, solution, context, r1, r2)
                        .is_some()
                    {
                        self.move_count += 1;
                        self.intra_route(instance, solution, context, r1);
                        self.intra_route(instance, solution, context, r2);
                        improvement = true;
                    } else {
                        self.exhausted_pairs.insert(key);
                    }
                }
            }
        }

        context.remove_empty_routes(instance, solution);
        trace!(
            "Local search: {} -> {} in {} moves",
            start,
            solution.objective(),
            self.move_count
        );
    }

    /// Number of improving moves applied by the last call to [`run`](Self::run).
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Memo key of an operator on a route pair; symmetric operators ignore the order.
    fn pair_key(
        op_index: usize,
        operator: InterOperator,
        context: &RouteContext,
        r1: usize,
        r2: usize,
    ) -> (usize, u64, u64) {
        let (s1, s2) = (context.signature(r1), context.signature(r2));
        if operator.is_directional() || s1 <= s2 {
            (op_index, s1, s2)
        } else {
            (op_index, s2, s1)
        }
    }

    /// Forget every remembered result once the caches grow too large.
    fn limit_memory(&mut self) {
        if self.exhausted_pairs.len() > MAX_CACHED_ENTRIES {
            self.exhausted_pairs.clear();
        }
        if self.exhausted_routes.len() > MAX_CACHED_ENTRIES {
            self.exhausted_routes.clear();
        }
        if self.insertion_cache.len() > MAX_CACHED_ENTRIES {
            self.insertion_cache.clear();
        }
    }

    /// Apply the intra-route operators to one route until none improves it.
    fn intra_route(
        &mut self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        route: usize,
    ) {
        if context.len(route) < 2 || self.exhausted_routes.contains(&context.signature(route)) {
            return;
        }
        let mut improvement = true;
        while improvement {
            improvement = false;
            for op_index in 0..self.intra_operators.len() {
                let operator = self.intra_operators[op_index];
                while self
                    .intra_move(operator, instance, solution, context, route)
                    .is_some()
                {
                    self.move_count += 1;
                    improvement = true;
                }
            }
        }
        self.exhausted_routes.insert(context.signature(route));
    }

    /// Find and apply the best improving move of an intra-route operator.
    pub fn intra_move(
        &self,
        operator: IntraOperator,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        route: usize,
    ) -> Option<i32> {
        match operator {
            IntraOperator::Exchange => self.exchange(instance, solution, context, route),
            IntraOperator::OrOpt1 => self.or_opt(1, instance, solution, context, route),
            IntraOperator::OrOpt2 => self.or_opt(2, instance, solution, context, route),
            IntraOperator::OrOpt3 => self.or_opt(3, instance, solution, context, route),
        }
    }

    /// Find and apply the best improving move of an inter-route operator.
    pub fn inter_route(
        &mut self,
        operator: InterOperator,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
    ) -> Option<i32> {
        match operator {
            InterOperator::Swap20 => self.swap(2, 0, instance, solution, context, r1, r2),
            InterOperator::Swap21 => self.swap(2, 1, instance, solution, context, r1, r2),
            InterOperator::Swap22 => self.swap(2, 2, instance, solution, context, r1, r2),
            InterOperator::Relocate => self.relocate(instance, solution, context, r1, r2),
            InterOperator::SwapStar => self.swap_star(instance, solution, context, r1, r2),
            InterOperator::Cross => self.cross(instance, solution, context, r1, r2),
            InterOperator::SdSwapStar => self.sd_swap_star(instance, solution, context, r1, r2),
            InterOperator::SdSwapOneOne => {
                self.sd_swap_one_one(instance, solution, context, r1, r2)
            }
            InterOperator::SdSwapTwoOne => {
                self.sd_swap_two_one(instance, solution, context, r1, r2)
            }
        }
    }
}
