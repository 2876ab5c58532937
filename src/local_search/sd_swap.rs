//! Split-delivery swaps: one or two visits of route 2 trade places with a
//! matching part of a larger visit of route 1.
//!
//! The moved visits are placed next to the larger visit, and the same amount
//! of its customer takes their old place. Both route loads are unchanged.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Node, Solution};

use super::utils::{dist, framed_route};
use super::LocalSearch;

/// Where the visits coming from route 2 go in route 1.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
    /// Replace the visit of route 1 entirely (equal loads).
    InPlace,
}

#[derive(Clone, Copy)]
struct SdSwapMove {
    delta: i32,
    v1: Node,
    /// Visits of route 2 in the order they are placed in route 1
    moved: [Node; 2],
    count: usize,
    side: Side,
}

impl LocalSearch {
    /// Implement the SdSwapOneOne neighborhood between routes `r1` and `r2`.
    pub fn sd_swap_one_one(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
    ) -> Option<i32> {
        let nodes1 = framed_route(solution, context, r1);
        let nodes2 = framed_route(solution, context, r2);
        let d = |a, b| dist(instance, solution, a, b);

        let mut best: Option<SdSwapMove> = None;
        for i in 1..nodes1.len() - 1 {
            let (p1, v1, s1) = (nodes1[i - 1], nodes1[i], nodes1[i + 1]);
            let l1 = solution.load(v1);
            let c1 = solution.customer(v1);
            let c1_cost = |a: Node, b: Node| {
                instance.distance(solution.customer(a), c1) + instance.distance(c1, solution.customer(b))
            };

            for j in 1..nodes2.len() - 1 {
                let (p2, v2, s2) = (nodes2[j - 1], nodes2[j], nodes2[j + 1]);
                let l2 = solution.load(v2);
                if solution.customer(v2) == c1 || l2 > l1 {
                    continue;
                }
                // c1 takes the place of v2 in route 2
                let gain2 = c1_cost(p2, s2) - d(p2, v2) - d(v2, s2);

                let mut options = Vec::with_capacity(2);
                if l1 == l2 {
                    options.push((Side::InPlace, d(p1, v2) + d(v2, s1) - d(p1, v1) - d(v1, s1)));
                } else {
                    options.push((Side::Before, d(p1, v2) + d(v2, v1) - d(p1, v1)));
                    options.push((Side::After, d(v1, v2) + d(v2, s1) - d(v1, s1)));
                }
                for (side, gain1) in options {
                    let delta = gain1 + gain2;
                    if delta < best.map_or(0, |m| m.delta) {
                        best = Some(SdSwapMove {
                            delta,
                            v1,
                            moved: [v2, 0],
                            count: 1,
                            side,
                        });
                    }
                }
            }
        }

        let best = best?;
        Some(self.apply_sd_swap(instance, solution, context, r1, r2, best))
    }

    /// Implement the SdSwapTwoOne neighborhood between routes `r1` and `r2`.
    pub fn sd_swap_two_one(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
    ) -> Option<i32> {
        let nodes1 = framed_route(solution, context, r1);
        let nodes2 = framed_route(solution, context, r2);
        if nodes2.len() < 4 {
            return None;
        }
        let d = |a, b| dist(instance, solution, a, b);

        let mut best: Option<SdSwapMove> = None;
        for i in 1..nodes1.len() - 1 {
            let (p1, v1, s1) = (nodes1[i - 1], nodes1[i], nodes1[i + 1]);
            let l1 = solution.load(v1);
            let c1 = solution.customer(v1);
            let c1_cost = |a: Node, b: Node| {
                instance.distance(solution.customer(a), c1) + instance.distance(c1, solution.customer(b))
            };

            for j in 1..nodes2.len() - 2 {
                let (p2, x, y, s2) = (nodes2[j - 1], nodes2[j], nodes2[j + 1], nodes2[j + 2]);
                let pair_load = solution.load(x) + solution.load(y);
                if solution.customer(x) == c1 || solution.customer(y) == c1 || pair_load > l1 {
                    continue;
                }
                let gain2 = c1_cost(p2, s2) - d(p2, x) - d(x, y) - d(y, s2);

                for (first, second) in [(x, y), (y, x)] {
                    let inner = d(first, second);
                    let mut options = Vec::with_capacity(2);
                    if l1 == pair_load {
                        options.push((
                            Side::InPlace,
                            d(p1, first) + inner + d(second, s1) - d(p1, v1) - d(v1, s1),
                        ));
                    } else {
                        options.push((Side::Before, d(p1, first) + inner + d(second, v1) - d(p1, v1)));
                        options.push((Side::After, d(v1, first) + inner + d(second, s1) - d(v1, s1)));
                    }
                    for (side, gain1) in options {
                        let delta = gain1 + gain2;
                        if delta < best.map_or(0, |m| m.delta) {
                            best = Some(SdSwapMove {
                                delta,
                                v1,
                                moved: [first, second],
                                count: 2,
                                side,
                            });
                        }
                    }
                }
            }
        }

        let best = best?;
        Some(self.apply_sd_swap(instance, solution, context, r1, r2, best))
    }

    fn apply_sd_swap(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
        m: SdSwapMove,
    ) -> i32 {
        let before = solution.objective();
        let moved = &m.moved[..m.count];

        // The visits of route 2 are consecutive; find the nodes around them
        let (mut p2, mut s2) = (solution.predecessor(moved[0]), solution.successor(moved[0]));
        if m.count == 2 {
            if p2 == moved[1] {
                p2 = solution.predecessor(moved[1]);
            } else {
                s2 = solution.successor(moved[1]);
            }
        }

        let mut visits = Vec::with_capacity(m.count);
        let mut amount = 0;
        for &node in moved {
            let (customer, load) = solution.remove(instance, node);
            visits.push((customer, load));
            amount += load;
        }

        let c1 = solution.customer(m.v1);
        let (mut predecessor, successor, anchor1) = match m.side {
            Side::Before => (solution.predecessor(m.v1), m.v1, m.v1),
            Side::After => (m.v1, solution.successor(m.v1), m.v1),
            Side::InPlace => {
                let (p1, s1) = (solution.predecessor(m.v1), solution.successor(m.v1));
                solution.remove(instance, m.v1);
                (p1, s1, 0)
            }
        };
        if m.side != Side::InPlace {
            solution.set_load(m.v1, solution.load(m.v1) - amount);
        }
        let anchor2 = solution.insert(instance, c1, amount, p2, s2);

        let mut anchor1 = anchor1;
        for (customer, load) in visits {
            predecessor = solution.insert(instance, customer, load, predecessor, successor);
            if anchor1 == 0 {
                anchor1 = predecessor;
            }
        }

        let delta = solution.objective() - before;
        debug_assert_eq!(delta, m.delta);
        context.update_from(instance, solution, r1, anchor1);
        context.update_from(instance, solution, r2, anchor2);
        delta
    }
}
