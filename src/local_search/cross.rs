//! Cross neighborhood: exchange route tails between two routes (2-opt*).

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Node, Solution};

use super::utils::{dist, framed_route};
use super::LocalSearch;

#[derive(Clone, Copy)]
struct CrossMove {
    delta: i32,
    /// Last kept node of route 1 (0 keeps nothing)
    a: Node,
    /// Last kept node of route 2 (0 keeps nothing)
    b: Node,
    reversed: bool,
}

impl LocalSearch {
    /// Implement the Cross neighborhood between routes `r1` and `r2`.
    ///
    /// Cutting route 1 after `a` and route 2 after `b`, the plain variant
    /// joins each prefix with the other tail. The reversed variant joins the
    /// prefix of route 1 with the reversed prefix of route 2, and the reversed
    /// tail of route 1 with the tail of route 2.
    pub fn cross(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
    ) -> Option<i32> {
        let nodes1 = framed_route(solution, context, r1);
        let nodes2 = framed_route(solution, context, r2);
        let (n1, n2) = (nodes1.len() - 2, nodes2.len() - 2);
        let d = |a, b| dist(instance, solution, a, b);
        let (load1, load2) = (context.load(r1), context.load(r2));
        let (head1, tail1) = (nodes1[1], nodes1[n1]);
        let head2 = nodes2[1];
        let capacity = instance.capacity;

        let mut best: Option<CrossMove> = None;
        for i in 0..=n1 {
            let (a, a_next) = (nodes1[i], nodes1[i + 1]);
            let prefix1 = context.pre_load(a);
            let suffix1 = load1 - prefix1;
            // Tail of route 1 from a_next, depot return included
            let tail1_forward = if a_next == 0 {
                0
            } else {
                context.segment_distance(a_next, tail1) + d(tail1, 0)
            };

            for j in 0..=n2 {
                let (b, b_next) = (nodes2[j], nodes2[j + 1]);
                let prefix2 = context.pre_load(b);
                let suffix2 = load2 - prefix2;
                let removed = d(a, a_next) + d(b, b_next);

                if prefix1 + suffix2 <= capacity && prefix2 + suffix1 <= capacity {
                    let delta = d(a, b_next) + d(b, a_next) - removed;
                    if delta < best.map_or(0, |m| m.delta) {
                        best = Some(CrossMove {
                            delta,
                            a,
                            b,
                            reversed: false,
                        });
                    }
                }

                if b != 0 && a_next != 0 && prefix1 + prefix2 <= capacity && suffix1 + suffix2 <= capacity {
                    let prefix2_forward = d(0, head2) + context.segment_distance(head2, b);
                    let prefix2_reversed = context.reversed_segment_distance(head2, b) + d(head2, 0);
                    let tail1_reversed = d(0, tail1) + context.reversed_segment_distance(a_next, tail1);
                    let delta = d(a, b) + prefix2_reversed + tail1_reversed + d(a_next, b_next)
                        - removed
                        - prefix2_forward
                        - tail1_forward;
                    if delta < best.map_or(0, |m| m.delta) {
                        best = Some(CrossMove {
                            delta,
                            a,
                            b,
                            reversed: true,
                        });
                    }
                }
            }
        }

        let CrossMove { delta, a, b, reversed } = best?;
        let before = solution.objective();
        let a_next = if a == 0 { head1 } else { solution.successor(a) };
        let b_next = if b == 0 { head2 } else { solution.successor(b) };
        let tail2 = context.tail(r2);

        let (anchor1, anchor2) = if reversed {
            solution.reverse_segment(instance, head2, b);
            solution.reverse_segment(instance, a_next, tail1);
            // Route 1: prefix, tail1..a_next. Route 2: b..head2, tail of route 2.
            solution.splice_segment(instance, tail1, a_next, head2, b_next);
            solution.splice_segment(instance, b, head2, a, 0);
            (b, tail1)
        } else {
            if a_next != 0 && b_next != 0 {
                solution.splice_segment(instance, a_next, tail1, tail2, 0);
                solution.splice_segment(instance, b_next, tail2, a, 0);
            } else if a_next != 0 {
                solution.splice_segment(instance, a_next, tail1, b, 0);
            } else if b_next != 0 {
                solution.splice_segment(instance, b_next, tail2, a, 0);
            }
            (
                if a != 0 { a } else { b_next },
                if b != 0 { b } else { a_next },
            )
        };
        debug_assert_eq!(solution.objective() - before, delta);

        context.update_from(instance, solution, r1, anchor1);
        context.update_from(instance, solution, r2, anchor2);
        Some(delta)
    }
}
