//! Solution representation for the SDVRP.
//!
//! Visits live in an arena indexed by [`Node`] handles. Handle 0 is reserved:
//! as a link it stands for the depot at either end of a route. A route is the
//! chain of successors starting at a node whose predecessor is 0. Because of
//! split delivery a customer may own several visit nodes.

use crate::error::SolverError;
use crate::instance::Instance;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a visit slot.
pub type Node = u32;
/// Customer index; 0 is the depot.
pub type Customer = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct NodeData {
    customer: Customer,
    load: i32,
    predecessor: Node,
    successor: Node,
}

/// Represents a complete (or partially ruined) SDVRP solution.
#[derive(Clone, Serialize, Deserialize)]
pub struct Solution {
    nodes: Vec<NodeData>,
    free_nodes: Vec<Node>,
    objective: i32,
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl Solution {
    /// Create a new, empty solution.
    pub fn new() -> Self {
        Solution {
            nodes: vec![NodeData::default()],
            free_nodes: Vec::new(),
            objective: 0,
        }
    }

    /// Total travelled distance.
    pub fn objective(&self) -> i32 {
        self.objective
    }

    /// Size of the node arena, including the reserved handle and free slots.
    pub fn max_node_index(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn customer(&self, node: Node) -> Customer {
        self.nodes[node as usize].customer
    }

    #[inline]
    pub fn load(&self, node: Node) -> i32 {
        self.nodes[node as usize].load
    }

    #[inline]
    pub fn predecessor(&self, node: Node) -> Node {
        self.nodes[node as usize].predecessor
    }

    #[inline]
    pub fn successor(&self, node: Node) -> Node {
        self.nodes[node as usize].successor
    }

    /// Whether `node` currently holds a visit.
    pub fn is_live(&self, node: Node) -> bool {
        node != 0 && (node as usize) < self.nodes.len() && self.customer(node) != 0
    }

    /// Change the amount delivered at a visit. Edges are unchanged.
    pub fn set_load(&mut self, node: Node, load: i32) {
        self.nodes[node as usize].load = load;
    }

    fn allocate(&mut self, customer: Customer, load: i32) -> Node {
        let data = NodeData {
            customer,
            load,
            predecessor: 0,
            successor: 0,
        };
        match self.free_nodes.pop() {
            Some(node) => {
                self.nodes[node as usize] = data;
                node
            }
            None => {
                self.nodes.push(data);
                (self.nodes.len() - 1) as Node
            }
        }
    }

    #[inline]
    fn link(&mut self, predecessor: Node, successor: Node) {
        if predecessor != 0 {
            self.nodes[predecessor as usize].successor = successor;
        }
        if successor != 0 {
            self.nodes[successor as usize].predecessor = predecessor;
        }
    }

    /// Cost of the edge between two nodes (0 means the depot).
    #[inline]
    fn edge(&self, instance: &Instance, from: Node, to: Node) -> i32 {
        instance.distance(self.customer(from), self.customer(to))
    }

    fn check_adjacent(&self, predecessor: Node, successor: Node) {
        debug_assert!(predecessor == 0 || self.successor(predecessor) == successor);
        debug_assert!(successor == 0 || self.predecessor(successor) == predecessor);
    }

    /// Insert a visit between two adjacent nodes; `(0, 0)` opens a new route.
    pub fn insert(
        &mut self,
        instance: &Instance,
        customer: Customer,
        load: i32,
        predecessor: Node,
        successor: Node,
    ) -> Node {
        debug_assert!(customer != 0);
        self.check_adjacent(predecessor, successor);
        let node = self.allocate(customer, load);
        self.objective += self.edge(instance, predecessor, node) + self.edge(instance, node, successor)
            - self.edge(instance, predecessor, successor);
        self.link(predecessor, node);
        self.link(node, successor);
        node
    }

    /// Insert a visit right after a live node.
    pub fn insert_after(
        &mut self,
        instance: &Instance,
        node: Node,
        customer: Customer,
        load: i32,
    ) -> Node {
        let successor = self.successor(node);
        self.insert(instance, customer, load, node, successor)
    }

    /// Remove a visit and release its slot. Returns `(customer, load)`.
    pub fn remove(&mut self, instance: &Instance, node: Node) -> (Customer, i32) {
        let NodeData {
            customer,
            load,
            predecessor,
            successor,
        } = self.nodes[node as usize];
        self.objective += self.edge(instance, predecessor, successor)
            - self.edge(instance, predecessor, node)
            - self.edge(instance, node, successor);
        self.link(predecessor, successor);
        self.nodes[node as usize] = NodeData::default();
        self.free_nodes.push(node);
        (customer, load)
    }

    /// Move the chain `start..=end` between `predecessor` and `successor`.
    ///
    /// The target nodes must be adjacent once the chain is detached and must
    /// not belong to the chain. `(0, 0)` turns the chain into its own route.
    pub fn splice_segment(
        &mut self,
        instance: &Instance,
        start: Node,
        end: Node,
        predecessor: Node,
        successor: Node,
    ) {
        let before = self.predecessor(start);
        let after = self.successor(end);
        self.objective += self.edge(instance, before, after)
            - self.edge(instance, before, start)
            - self.edge(instance, end, after);
        self.link(before, after);

        self.check_adjacent(predecessor, successor);
        self.objective += self.edge(instance, predecessor, start)
            + self.edge(instance, end, successor)
            - self.edge(instance, predecessor, successor);
        self.link(predecessor, start);
        self.link(end, successor);
    }

    /// Reverse the chain `start..=end` in place.
    pub fn reverse_segment(&mut self, instance: &Instance, start: Node, end: Node) {
        if start == end {
            return;
        }
        let before = self.predecessor(start);
        let after = self.successor(end);

        let mut delta = self.edge(instance, before, end) + self.edge(instance, start, after)
            - self.edge(instance, before, start)
            - self.edge(instance, end, after);

        let mut node = start;
        loop {
            let next = self.successor(node);
            if node != end {
                delta += self.edge(instance, next, node) - self.edge(instance, node, next);
            }
            let data = &mut self.nodes[node as usize];
            std::mem::swap(&mut data.predecessor, &mut data.successor);
            if node == end {
                break;
            }
            node = next;
        }

        self.objective += delta;
        self.link(before, end);
        self.link(start, after);
    }

    /// Cut the route after `node`; its successor starts a new route.
    pub fn split_after(&mut self, instance: &Instance, node: Node) {
        let successor = self.successor(node);
        if successor == 0 {
            return;
        }
        self.objective += self.edge(instance, node, 0) + self.edge(instance, 0, successor)
            - self.edge(instance, node, successor);
        self.nodes[node as usize].successor = 0;
        self.nodes[successor as usize].predecessor = 0;
    }

    /// Iterate over all live nodes, in handle order.
    pub fn node_indices(&self) -> impl Iterator<Item = Node> + '_ {
        (1..self.nodes.len() as Node).filter(move |&node| self.customer(node) != 0)
    }

    /// First node of the route containing `node`.
    pub fn head_of(&self, mut node: Node) -> Node {
        while self.predecessor(node) != 0 {
            node = self.predecessor(node);
        }
        node
    }

    /// Nodes of the route starting at `head`, in visiting order.
    pub fn route_nodes(&self, head: Node) -> RouteIter<'_> {
        RouteIter {
            solution: self,
            node: head,
        }
    }

    /// First nodes of all routes, in handle order.
    pub fn route_heads(&self) -> impl Iterator<Item = Node> + '_ {
        self.node_indices()
            .filter(move |&node| self.predecessor(node) == 0)
    }

    /// Get the number of routes.
    pub fn get_route_count(&self) -> usize {
        self.route_heads().count()
    }

    /// `(customer, load)` pairs of every route.
    pub fn routes(&self) -> Vec<Vec<(Customer, i32)>> {
        self.route_heads()
            .map(|head| {
                self.route_nodes(head)
                    .map(|node| (self.customer(node), self.load(node)))
                    .collect()
            })
            .collect()
    }

    /// Flat encoding: `0, c1, l1, c2, l2, ..., 0` for each route.
    pub fn to_flat(&self) -> Vec<i32> {
        let mut result = Vec::new();
        for route in self.routes() {
            result.push(0);
            for (customer, load) in route {
                result.push(customer as i32);
                result.push(load);
            }
            result.push(0);
        }
        result
    }

    /// Objective computed from scratch.
    pub fn recompute_objective(&self, instance: &Instance) -> i32 {
        self.route_heads()
            .map(|head| {
                let mut distance = 0;
                let mut previous = 0;
                for node in self.route_nodes(head) {
                    distance += self.edge(instance, previous, node);
                    previous = node;
                }
                distance + self.edge(instance, previous, 0)
            })
            .sum()
    }

    /// Check every solution invariant.
    pub fn validate(&self, instance: &Instance) -> Result<(), SolverError> {
        let mut served = vec![0i32; instance.num_customers];
        let mut visited = 0usize;

        for head in self.route_heads() {
            let mut load = 0;
            for node in self.route_nodes(head) {
                let data = &self.nodes[node as usize];
                if data.customer as usize >= instance.num_customers {
                    return Err(SolverError::InvalidNode {
                        node,
                        reason: "unknown customer",
                    });
                }
                if data.load < 0 {
                    return Err(SolverError::InvalidNode {
                        node,
                        reason: "negative load",
                    });
                }
                if data.successor != 0 && self.predecessor(data.successor) != node {
                    return Err(SolverError::InvalidNode {
                        node,
                        reason: "broken successor link",
                    });
                }
                load += data.load;
                served[data.customer as usize] += data.load;
                visited += 1;
            }
            if load > instance.capacity {
                return Err(SolverError::CapacityExceeded {
                    head,
                    load,
                    capacity: instance.capacity,
                });
            }
        }

        if let Some(node) = self.node_indices().nth(visited) {
            return Err(SolverError::InvalidNode {
                node,
                reason: "not reachable from a route head",
            });
        }

        for customer in 1..instance.num_customers {
            if served[customer] != instance.demands[customer] {
                return Err(SolverError::DemandMismatch {
                    customer: customer as Customer,
                    served: served[customer],
                    demand: instance.demands[customer],
                });
            }
        }

        let actual = self.recompute_objective(instance);
        if actual != self.objective {
            return Err(SolverError::ObjectiveMismatch {
                tracked: self.objective,
                actual,
            });
        }
        Ok(())
    }
}

/// Iterator over the nodes of one route.
pub struct RouteIter<'a> {
    solution: &'a Solution,
    node: Node,
}

impl Iterator for RouteIter<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.node == 0 {
            return None;
        }
        let node = self.node;
        self.node = self.solution.successor(node);
        Some(node)
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Objective: {}", self.objective)?;
        let routes = self.routes();
        writeln!(f, "  Routes: {}", routes.len())?;

        for (i, route) in routes.iter().enumerate() {
            let load: i32 = route.iter().map(|&(_, load)| load).sum();
            writeln!(f, "  Route {}: {:?} (Load: {})", i, route, load)?;
        }

        Ok(())
    }
}
