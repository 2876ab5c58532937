//! Or-opt neighborhood: move a block of consecutive visits within its route.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::Solution;

use super::utils::{dist, framed_route};
use super::LocalSearch;

#[derive(Clone, Copy)]
struct OrOptMove {
    delta: i32,
    /// Index of the first block node in the framed route
    start: usize,
    /// Index of the framed edge receiving the block
    edge: usize,
    reversed: bool,
}

impl LocalSearch {
    /// Implement the OrOpt neighborhood for blocks of `length` visits.
    ///
    /// The block may be reinserted reversed, including at its own place.
    pub fn or_opt(
        &self,
        length: usize,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        route: usize,
    ) -> Option<i32> {
        let nodes = framed_route(solution, context, route);
        let n = nodes.len() - 2;
        if length == 0 || n < length {
            return None;
        }
        let d = |a, b| dist(instance, solution, a, b);

        let mut best: Option<OrOptMove> = None;
        let mut consider = |delta: i32, start: usize, edge: usize, reversed: bool| {
            if delta < best.map_or(0, |m| m.delta) {
                best = Some(OrOptMove {
                    delta,
                    start,
                    edge,
                    reversed,
                });
            }
        };

        for i in 1..=(n + 1 - length) {
            let end = i + length - 1;
            let (p, f, e, s) = (nodes[i - 1], nodes[i], nodes[end], nodes[end + 1]);
            let forward = context.segment_distance(f, e);
            let backward = context.reversed_segment_distance(f, e);
            let removal = d(p, s) - d(p, f) - d(e, s);

            if length > 1 {
                let in_place = d(p, e) + backward + d(f, s) - d(p, f) - forward - d(e, s);
                consider(in_place, i, i - 1, true);
            }

            for k in (0..=n).filter(|&k| k + 1 < i || k > end) {
                let (u, v) = (nodes[k], nodes[k + 1]);
                let base = removal - d(u, v);
                consider(base + d(u, f) + d(e, v), i, k, false);
                if length > 1 {
                    consider(base + d(u, e) + backward - forward + d(f, v), i, k, true);
                }
            }
        }

        let best = best?;
        let before = solution.objective();
        let (f, e) = (nodes[best.start], nodes[best.start + length - 1]);
        if best.edge + 1 != best.start {
            let (u, v) = (nodes[best.edge], nodes[best.edge + 1]);
            solution.splice_segment(instance, f, e, u, v);
        }
        if best.reversed {
            solution.reverse_segment(instance, f, e);
        }
        debug_assert_eq!(solution.objective() - before, best.delta);

        context.update_from(instance, solution, route, f);
        Some(best.delta)
    }
}
