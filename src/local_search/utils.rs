//! Utility functions for local search operations.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Customer, Node, Solution};
use rustc_hash::FxHashMap;

/// Nodes of a route framed by the depot: `[0, n1, ..., nk, 0]`.
pub fn framed_route(solution: &Solution, context: &RouteContext, route: usize) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(context.len(route) + 2);
    nodes.push(0);
    nodes.extend(solution.route_nodes(context.head(route)));
    nodes.push(0);
    nodes
}

/// Distance between the customers of two nodes (0 is the depot).
#[inline]
pub fn dist(instance: &Instance, solution: &Solution, from: Node, to: Node) -> i32 {
    instance.distance(solution.customer(from), solution.customer(to))
}

/// Cost of putting `customer` on the edge `from -> to`.
#[inline]
pub fn insertion_cost(
    instance: &Instance,
    solution: &Solution,
    customer: Customer,
    from: Node,
    to: Node,
) -> i32 {
    let a = solution.customer(from);
    let b = solution.customer(to);
    instance.distance(a, customer) + instance.distance(customer, b) - instance.distance(a, b)
}

/// Cost change of taking `node` out from between its neighbours.
#[inline]
pub fn removal_cost(instance: &Instance, solution: &Solution, node: Node) -> i32 {
    let predecessor = solution.predecessor(node);
    let successor = solution.successor(node);
    dist(instance, solution, predecessor, successor)
        - dist(instance, solution, predecessor, node)
        - dist(instance, solution, node, successor)
}

/// A node still on the route after the part between `predecessor` and
/// `successor` was taken out, or 0 if nothing is left.
#[inline]
pub fn anchor(predecessor: Node, successor: Node) -> Node {
    if predecessor != 0 {
        predecessor
    } else {
        successor
    }
}

/// First visit of `customer` among `nodes`.
pub fn find_visit(solution: &Solution, nodes: &[Node], customer: Customer) -> Option<Node> {
    nodes
        .iter()
        .copied()
        .find(|&node| node != 0 && solution.customer(node) == customer)
}

/// An insertion point on the edge `predecessor -> successor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPosition {
    pub cost: i32,
    pub predecessor: Node,
    pub successor: Node,
}

impl InsertionPosition {
    fn touches(&self, node: Node) -> bool {
        self.predecessor == node || self.successor == node
    }
}

/// The three cheapest insertion points of a customer in a route.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopInsertions {
    positions: [Option<InsertionPosition>; 3],
}

impl TopInsertions {
    fn add(&mut self, position: InsertionPosition) {
        let mut carry = Some(position);
        for slot in self.positions.iter_mut() {
            match (*slot, carry) {
                (None, Some(_)) => {
                    *slot = carry;
                    return;
                }
                (Some(current), Some(new)) if new.cost < current.cost => {
                    *slot = Some(new);
                    carry = Some(current);
                }
                _ => {}
            }
        }
    }

    /// Cheapest point.
    pub fn best(&self) -> Option<InsertionPosition> {
        self.positions[0]
    }

    /// Cheapest point whose edge does not involve `node`.
    pub fn best_avoiding(&self, node: Node) -> Option<InsertionPosition> {
        self.positions
            .iter()
            .flatten()
            .copied()
            .find(|position| !position.touches(node))
    }
}

/// Find the three cheapest insertion points of `customer` along a framed route.
pub fn find_top_insertion_positions(
    instance: &Instance,
    solution: &Solution,
    customer: Customer,
    framed: &[Node],
) -> TopInsertions {
    let mut top = TopInsertions::default();
    for edge in framed.windows(2) {
        top.add(InsertionPosition {
            cost: insertion_cost(instance, solution, customer, edge[0], edge[1]),
            predecessor: edge[0],
            successor: edge[1],
        });
    }
    top
}

/// Top insertion points of customers per route state.
///
/// Entries are keyed by the route signature, so a table computed for a route
/// stays valid until that route is modified, across candidate solutions.
#[derive(Debug, Default)]
pub struct InsertionCache {
    tables: FxHashMap<(u64, Customer), TopInsertions>,
}

impl InsertionCache {
    /// Top insertion points of `customer` in `route`, whose framed nodes are `framed`.
    pub fn top_insertions(
        &mut self,
        instance: &Instance,
        solution: &Solution,
        context: &RouteContext,
        route: usize,
        framed: &[Node],
        customer: Customer,
    ) -> TopInsertions {
        *self
            .tables
            .entry((context.signature(route), customer))
            .or_insert_with(|| find_top_insertion_positions(instance, solution, customer, framed))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}
