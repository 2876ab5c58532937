//! Swap neighborhood: exchange blocks of consecutive visits between two routes.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Node, Solution};

use super::utils::{anchor, dist, framed_route};
use super::LocalSearch;

/// A block `first..=last` of a framed route with its surrounding nodes.
#[derive(Clone, Copy)]
struct Block {
    before: Node,
    first: Node,
    last: Node,
    after: Node,
    load: i32,
    forward: i32,
    backward: i32,
}

impl Block {
    fn new(nodes: &[Node], start: usize, length: usize, solution: &Solution, context: &RouteContext) -> Self {
        let first = nodes[start];
        let last = nodes[start + length - 1];
        Block {
            before: nodes[start - 1],
            first,
            last,
            after: nodes[start + length],
            load: context.segment_load(solution, first, last),
            forward: context.segment_distance(first, last),
            backward: context.reversed_segment_distance(first, last),
        }
    }

    /// Ends of the block as visited, and its internal distance.
    fn oriented(&self, reversed: bool) -> (Node, Node, i32) {
        if reversed {
            (self.last, self.first, self.backward)
        } else {
            (self.first, self.last, self.forward)
        }
    }
}

#[derive(Clone, Copy)]
struct SwapMove {
    delta: i32,
    block1: Block,
    reversed1: bool,
    /// The block of route 2, or the receiving edge when nothing comes back
    block2: Option<Block>,
    edge: (Node, Node),
    reversed2: bool,
}

impl LocalSearch {
    /// Implement the Swap<A, B> neighborhood between routes `r1` and `r2`.
    ///
    /// A block of `length1` visits of `r1` is exchanged with a block of
    /// `length2` visits of `r2`, each inserted forward or reversed. With
    /// `length2 == 0` the block of `r1` is moved into any edge of `r2`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &self,
        length1: usize,
        length2: usize,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        r1: usize,
        r2: usize,
    ) -> Option<i32> {
        let nodes1 = framed_route(solution, context, r1);
        let nodes2 = framed_route(solution, context, r2);
        let (n1, n2) = (nodes1.len() - 2, nodes2.len() - 2);
        if length1 == 0 || n1 < length1 || n2 < length2 {
            return None;
        }
        let d = |a, b| dist(instance, solution, a, b);
        let orientations1: &[bool] = if length1 > 1 { &[false, true] } else { &[false] };
        let orientations2: &[bool] = if length2 > 1 { &[false, true] } else { &[false] };
        let (load1, load2) = (context.load(r1), context.load(r2));

        let mut best: Option<SwapMove> = None;
        for i in 1..=(n1 + 1 - length1) {
            let block1 = Block::new(&nodes1, i, length1, solution, context);
            let removed1 = d(block1.before, block1.first) + block1.forward + d(block1.last, block1.after);

            if length2 == 0 {
                if load2 + block1.load > instance.capacity {
                    continue;
                }
                let gap1 = d(block1.before, block1.after) - removed1;
                for edge in nodes2.windows(2) {
                    let (u, v) = (edge[0], edge[1]);
                    for &reversed1 in orientations1 {
                        let (head, tail, inner) = block1.oriented(reversed1);
                        let delta = gap1 + d(u, head) + inner + d(tail, v) - d(u, v);
                        if delta < best.map_or(0, |m| m.delta) {
                            best = Some(SwapMove {
                                delta,
                                block1,
                                reversed1,
                                block2: None,
                                edge: (u, v),
                                reversed2: false,
                            });
                        }
                    }
                }
                continue;
            }

            for j in 1..=(n2 + 1 - length2) {
                let block2 = Block::new(&nodes2, j, length2, solution, context);
                if load1 - block1.load + block2.load > instance.capacity
                    || load2 - block2.load + block1.load > instance.capacity
                {
                    continue;
                }
                let removed2 = d(block2.before, block2.first) + block2.forward + d(block2.last, block2.after);

                for &reversed1 in orientations1 {
                    let (head1, tail1, inner1) = block1.oriented(reversed1);
                    let into2 = d(block2.before, head1) + inner1 + d(tail1, block2.after);
                    for &reversed2 in orientations2 {
                        let (head2, tail2, inner2) = block2.oriented(reversed2);
                        let into1 = d(block1.before, head2) + inner2 + d(tail2, block1.after);
                        let delta = into1 + into2 - removed1 - removed2;
                        if delta < best.map_or(0, |m| m.delta) {
                            best = Some(SwapMove {
                                delta,
                                block1,
                                reversed1,
                                block2: Some(block2),
                                edge: (0, 0),
                                reversed2,
                            });
                        }
                    }
                }
            }
        }

        let best = best?;
        let before = solution.objective();
        let block1 = best.block1;
        let (anchor1, anchor2) = match best.block2 {
            None => {
                let (u, v) = best.edge;
                solution.splice_segment(instance, block1.first, block1.last, u, v);
                (anchor(block1.before, block1.after), block1.first)
            }
            Some(block2) => {
                solution.splice_segment(instance, block1.first, block1.last, block2.last, block2.after);
                solution.splice_segment(instance, block2.first, block2.last, block1.before, block1.after);
                if best.reversed2 {
                    solution.reverse_segment(instance, block2.first, block2.last);
                }
                (block2.first, block1.first)
            }
        };
        if best.reversed1 {
            solution.reverse_segment(instance, block1.first, block1.last);
        }
        debug_assert_eq!(solution.objective() - before, best.delta);

        context.update_from(instance, solution, r1, anchor1);
        context.update_from(instance, solution, r2, anchor2);
        Some(best.delta)
    }
}
