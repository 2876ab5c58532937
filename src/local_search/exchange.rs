//! Exchange neighborhood: swap two visits of the same route.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::Solution;

use super::utils::{dist, framed_route};
use super::LocalSearch;

impl LocalSearch {
    /// Implement the Exchange neighborhood.
    pub fn exchange(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        route: usize,
    ) -> Option<i32> {
        let nodes = framed_route(solution, context, route);
        let n = nodes.len() - 2;
        let d = |a, b| dist(instance, solution, a, b);

        let mut best: Option<(i32, usize, usize)> = None;
        for i in 1..n {
            let (a, x, c) = (nodes[i - 1], nodes[i], nodes[i + 1]);
            for j in (i + 1)..=n {
                let (p, y, b) = (nodes[j - 1], nodes[j], nodes[j + 1]);
                let delta = if j == i + 1 {
                    d(a, y) + d(y, x) + d(x, b) - d(a, x) - d(x, y) - d(y, b)
                } else {
                    d(a, y) + d(y, c) + d(p, x) + d(x, b) - d(a, x) - d(x, c) - d(p, y) - d(y, b)
                };
                if delta < best.map_or(0, |(cost, _, _)| cost) {
                    best = Some((delta, i, j));
                }
            }
        }

        let (delta, i, j) = best?;
        let before = solution.objective();
        let (a, x) = (nodes[i - 1], nodes[i]);
        let (p, y, b) = (nodes[j - 1], nodes[j], nodes[j + 1]);

        solution.splice_segment(instance, y, y, a, x);
        if j != i + 1 {
            solution.splice_segment(instance, x, x, p, b);
        }
        debug_assert_eq!(solution.objective() - before, delta);

        context.update_from(instance, solution, route, x);
        Some(delta)
    }
}
