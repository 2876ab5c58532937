//! SWAP* neighborhood for local search.
//!
//! Two visits of different routes are exchanged, each one inserted at its
//! best position in the other route rather than in the place of the other.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Node, Solution};

use super::utils::{
    framed_route, insertion_cost, removal_cost, InsertionPosition, TopInsertions,
};
use super::LocalSearch;

/// Best place for a visit in a route from which `removed` is taken out.
///
/// The place of `removed` itself is always a candidate.
fn best_position_without(
    instance: &Instance,
    solution: &Solution,
    top: &TopInsertions,
    node: Node,
    removed: Node,
) -> InsertionPosition {
    let predecessor = solution.predecessor(removed);
    let successor = solution.successor(removed);
    let in_place = InsertionPosition {
        cost: insertion_cost(instance, solution, solution.customer(node), predecessor, successor),
        predecessor,
        successor,
    };
    match top.best_avoiding(removed) {
        Some(position) if position.cost < in_place.cost => position,
        _ => in_place,
    }
}

impl LocalSearch {
    /// Implement the SWAP* neighborhood between routes `r1` and `r2`.
    pub fn swap_star(
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
        let (load1, load2) = (context.load(r1), context.load(r2));

        // Preprocess: top 3 insertion positions of every visit in the other route
        let cache = &mut self.insertion_cache;
        let top_in_r2: Vec<TopInsertions> = inner1
            .iter()
            .map(|&v| {
                cache.top_insertions(instance, solution, context, r2, &nodes2, solution.customer(v))
            })
            .collect();
        let top_in_r1: Vec<TopInsertions> = inner2
            .iter()
            .map(|&v| {
                cache.top_insertions(instance, solution, context, r1, &nodes1, solution.customer(v))
            })
            .collect();

        let mut best: Option<(i32, Node, Node, InsertionPosition, InsertionPosition)> = None;
        for (i, &v1) in inner1.iter().enumerate() {
            let l1 = solution.load(v1);
            let removal1 = removal_cost(instance, solution, v1);
            for (j, &v2) in inner2.iter().enumerate() {
                let l2 = solution.load(v2);
                if solution.customer(v1) == solution.customer(v2)
                    || load1 - l1 + l2 > instance.capacity
                    || load2 - l2 + l1 > instance.capacity
                {
                    continue;
                }
                let removal2 = removal_cost(instance, solution, v2);
                let into1 = best_position_without(instance, solution, &top_in_r1[j], v2, v1);
                let into2 = best_position_without(instance, solution, &top_in_r2[i], v1, v2);
                let delta = removal1 + removal2 + into1.cost + into2.cost;
                if delta < best.map_or(0, |(cost, ..)| cost) {
                    best = Some((delta, v1, v2, into1, into2));
                }
            }
        }

        let (delta, v1, v2, into1, into2) = best?;
        let before = solution.objective();
        let (c1, l1) = solution.remove(instance, v1);
        let (c2, l2) = solution.remove(instance, v2);
        let new2 = solution.insert(instance, c2, l2, into1.predecessor, into1.successor);
        let new1 = solution.insert(instance, c1, l1, into2.predecessor, into2.successor);
        debug_assert_eq!(solution.objective() - before, delta);

        context.update_from(instance, solution, r1, new2);
        context.update_from(instance, solution, r2, new1);
        Some(delta)
    }
}
