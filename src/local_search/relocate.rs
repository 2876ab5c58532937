//! Relocate neighborhood: move one visit to another route.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Node, Solution};

use super::utils::{anchor, find_visit, framed_route, insertion_cost, removal_cost};
use super::LocalSearch;

#[derive(Clone, Copy)]
enum Target {
    /// Insert between two adjacent nodes of the other route.
    Between(Node, Node),
    /// Add the load to a visit of the same customer.
    Merge(Node),
}

impl LocalSearch {
    /// Implement the Relocate neighborhood from route `r1` to route `r2`.
    pub fn relocate(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
    ) -> Option<i32> {
        let nodes1 = framed_route(solution, context, r1);
        let nodes2 = framed_route(solution, context, r2);
        let residual = instance.capacity - context.load(r2);

        let mut best: Option<(i32, Node, Target)> = None;
        for &node in &nodes1[1..nodes1.len() - 1] {
            let load = solution.load(node);
            if load > residual {
                continue;
            }
            let customer = solution.customer(node);
            let removal = removal_cost(instance, solution, node);

            if let Some(visit) = find_visit(solution, &nodes2, customer) {
                if removal < best.map_or(0, |(cost, _, _)| cost) {
                    best = Some((removal, node, Target::Merge(visit)));
                }
            }
            for edge in nodes2.windows(2) {
                let delta = removal + insertion_cost(instance, solution, customer, edge[0], edge[1]);
                if delta < best.map_or(0, |(cost, _, _)| cost) {
                    best = Some((delta, node, Target::Between(edge[0], edge[1])));
                }
            }
        }

        let (delta, node, target) = best?;
        let before = solution.objective();
        let (predecessor, successor) = (solution.predecessor(node), solution.successor(node));

        let kept = match target {
            Target::Between(from, to) => {
                solution.splice_segment(instance, node, node, from, to);
                node
            }
            Target::Merge(visit) => {
                let (_, load) = solution.remove(instance, node);
                solution.set_load(visit, solution.load(visit) + load);
                visit
            }
        };
        debug_assert_eq!(solution.objective() - before, delta);

        context.update_from(instance, solution, r1, anchor(predecessor, successor));
        context.update_from(instance, solution, r2, kept);
        Some(delta)
    }
}
