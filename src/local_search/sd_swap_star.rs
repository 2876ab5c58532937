//! Split-delivery SWAP*: a smaller visit is swapped with part of a larger one.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Customer, Node, Solution};

use super::utils::{
    find_visit, framed_route, insertion_cost, removal_cost, InsertionPosition,
};
use super::LocalSearch;

#[derive(Clone, Copy)]
enum Placement {
    At(InsertionPosition),
    Merge(Node),
}

impl Placement {
    fn cost(&self) -> i32 {
        match self {
            Placement::At(position) => position.cost,
            Placement::Merge(_) => 0,
        }
    }

    /// Deliver `load` units of `customer` here and return the serving node.
    fn apply(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        customer: Customer,
        load: i32,
    ) -> Node {
        match *self {
            Placement::At(position) => {
                solution.insert(instance, customer, load, position.predecessor, position.successor)
            }
            Placement::Merge(node) => {
                solution.set_load(node, solution.load(node) + load);
                node
            }
        }
    }
}

impl LocalSearch {
    /// Implement the SdSwapStar neighborhood between routes `r1` and `r2`.
    ///
    /// For a visit `v1` of `r1` and a visit `v2` of `r2` with a smaller load
    /// `l2`, `v2` moves entirely to `r1` and `l2` units of `v1`'s customer
    /// move to `r2`. Both route loads are unchanged.
    pub fn sd_swap_star(
        &mut self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
    ) -> Option<i32> {
        let nodes1 = framed_route(solution, context, r1);
        let nodes2 = framed_route(solution, context, r2);
        let inner1 = &nodes1[1..nodes1.len() - 1];
        let inner2 = &nodes2[1..nodes2.len() - 1];

        // Cheapest way to bring each visit of r2 into r1 as a whole
        let into1: Vec<Option<Placement>> = inner2
            .iter()
            .map(|&v2| {
                let customer = solution.customer(v2);
                match find_visit(solution, &nodes1, customer) {
                    Some(visit) => Some(Placement::Merge(visit)),
                    None => self
                        .insertion_cache
                        .top_insertions(instance, solution, context, r1, &nodes1, customer)
                        .best()
                        .map(Placement::At),
                }
            })
            .collect();

        let mut best: Option<(i32, Node, Node, Placement, Placement)> = None;
        for &v1 in inner1 {
            let c1 = solution.customer(v1);
            let l1 = solution.load(v1);
            let merge2 = find_visit(solution, &nodes2, c1);
            let top2 = self
                .insertion_cache
                .top_insertions(instance, solution, context, r2, &nodes2, c1);

            for (j, &v2) in inner2.iter().enumerate() {
                let l2 = solution.load(v2);
                if solution.customer(v2) == c1 || l2 >= l1 {
                    continue;
                }
                let Some(placement1) = into1[j] else {
                    continue;
                };

                let placement2 = match merge2 {
                    Some(visit) => Placement::Merge(visit),
                    None => {
                        let predecessor = solution.predecessor(v2);
                        let successor = solution.successor(v2);
                        let in_place = InsertionPosition {
                            cost: insertion_cost(instance, solution, c1, predecessor, successor),
                            predecessor,
                            successor,
                        };
                        match top2.best_avoiding(v2) {
                            Some(position) if position.cost < in_place.cost => {
                                Placement::At(position)
                            }
                            _ => Placement::At(in_place),
                        }
                    }
                };

                let delta = removal_cost(instance, solution, v2) + placement1.cost() + placement2.cost();
                if delta < best.map_or(0, |(cost, ..)| cost) {
                    best = Some((delta, v1, v2, placement1, placement2));
                }
            }
        }

        let (delta, v1, v2, placement1, placement2) = best?;
        let before = solution.objective();
        let c1 = solution.customer(v1);
        let (c2, l2) = solution.remove(instance, v2);
        solution.set_load(v1, solution.load(v1) - l2);
        placement1.apply(instance, solution, c2, l2);
        let anchor2 = placement2.apply(instance, solution, c1, l2);
        debug_assert_eq!(solution.objective() - before, delta);

        context.update_from(instance, solution, r1, v1);
        context.update_from(instance, solution, r2, anchor2);
        Some(delta)
    }
}
