//! Per-route bookkeeping derived from a [`Solution`].
//!
//! The context is rebuilt for a route whenever an operator modifies it, which
//! costs one pass over the route. In exchange operators get O(1) access to
//! route loads, segment loads and segment distances in both directions.

use crate::instance::Instance;
use crate::solution::{Node, Solution};
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    heads: Vec<Node>,
    tails: Vec<Node>,
    loads: Vec<i32>,
    num_customers: Vec<usize>,
    /// Fingerprint of the node chain of each route.
    signatures: Vec<u64>,
    /// Route index of every live node.
    route_indices: Vec<usize>,
    /// 0-based position of every node in its route.
    positions: Vec<usize>,
    /// Load from the head up to and including the node.
    pre_loads: Vec<i32>,
    /// Distance from the depot along the route up to the node.
    pre_distances: Vec<i32>,
    /// Distance of the reversed chain from the head up to the node.
    pre_reversed_distances: Vec<i32>,
}

impl RouteContext {
    /// Build the context for every route of a solution.
    pub fn new(instance: &Instance, solution: &Solution) -> Self {
        let mut context = RouteContext::default();
        let heads: Vec<Node> = solution.route_heads().collect();
        for head in heads {
            context.push_route(instance, solution, head);
        }
        context
    }

    pub fn num_routes(&self) -> usize {
        self.heads.len()
    }

    pub fn head(&self, route: usize) -> Node {
        self.heads[route]
    }

    pub fn tail(&self, route: usize) -> Node {
        self.tails[route]
    }

    pub fn load(&self, route: usize) -> i32 {
        self.loads[route]
    }

    /// Number of visits on the route.
    pub fn len(&self, route: usize) -> usize {
        self.num_customers[route]
    }

    /// Hash of the route's visits (handle, customer and load, in order).
    ///
    /// Two routes with equal signatures present the same moves to every
    /// operator, whichever solution they belong to.
    pub fn signature(&self, route: usize) -> u64 {
        self.signatures[route]
    }

    pub fn is_empty(&self, route: usize) -> bool {
        self.heads[route] == 0
    }

    pub fn route_index(&self, node: Node) -> usize {
        self.route_indices[node as usize]
    }

    pub fn position(&self, node: Node) -> usize {
        self.positions[node as usize]
    }

    pub fn pre_load(&self, node: Node) -> i32 {
        if node == 0 {
            0
        } else {
            self.pre_loads[node as usize]
        }
    }

    /// Total load of the chain `start..=end`.
    pub fn segment_load(&self, solution: &Solution, start: Node, end: Node) -> i32 {
        self.pre_loads[end as usize] - self.pre_loads[start as usize] + solution.load(start)
    }

    /// Distance along the chain `start..=end` in visiting order.
    pub fn segment_distance(&self, start: Node, end: Node) -> i32 {
        self.pre_distances[end as usize] - self.pre_distances[start as usize]
    }

    /// Distance along the chain `start..=end` travelled backwards.
    pub fn reversed_segment_distance(&self, start: Node, end: Node) -> i32 {
        self.pre_reversed_distances[end as usize] - self.pre_reversed_distances[start as usize]
    }

    /// Distance of a whole route.
    pub fn route_distance(&self, instance: &Instance, solution: &Solution, route: usize) -> i32 {
        let tail = self.tails[route];
        if tail == 0 {
            return 0;
        }
        self.pre_distances[tail as usize] + instance.distance(solution.customer(tail), 0)
    }

    /// Register a new route starting at `head` and return its index.
    pub fn push_route(&mut self, instance: &Instance, solution: &Solution, head: Node) -> usize {
        self.heads.push(head);
        self.tails.push(0);
        self.loads.push(0);
        self.num_customers.push(0);
        self.signatures.push(0);
        let route = self.heads.len() - 1;
        self.update(instance, solution, route, head);
        route
    }

    /// Recompute route `route`, whose first node is now `head` (0 if empty).
    pub fn update(&mut self, instance: &Instance, solution: &Solution, route: usize, head: Node) {
        let size = solution.max_node_index();
        if self.route_indices.len() < size {
            self.route_indices.resize(size, 0);
            self.positions.resize(size, 0);
            self.pre_loads.resize(size, 0);
            self.pre_distances.resize(size, 0);
            self.pre_reversed_distances.resize(size, 0);
        }

        debug_assert!(head == 0 || solution.predecessor(head) == 0);
        self.heads[route] = head;

        let mut load = 0;
        let mut distance = 0;
        let mut reversed = 0;
        let mut previous = 0;
        let mut count = 0;
        let mut hasher = DefaultHasher::new();
        for node in solution.route_nodes(head) {
            let customer = solution.customer(node);
            let previous_customer = solution.customer(previous);
            distance += instance.distance(previous_customer, customer);
            if previous != 0 {
                reversed += instance.distance(customer, previous_customer);
            }
            load += solution.load(node);
            hasher.write_u32(node);
            hasher.write_u32(customer);
            hasher.write_i32(solution.load(node));

            let index = node as usize;
            self.route_indices[index] = route;
            self.positions[index] = count;
            self.pre_loads[index] = load;
            self.pre_distances[index] = distance;
            self.pre_reversed_distances[index] = reversed;

            previous = node;
            count += 1;
        }

        self.tails[route] = previous;
        self.loads[route] = load;
        self.num_customers[route] = count;
        self.signatures[route] = hasher.finish();
    }

    /// Refresh a route from any node still on it, or mark it empty.
    pub fn update_from(
        &mut self,
        instance: &Instance,
        solution: &Solution,
        route: usize,
        anchor: Node,
    ) {
        let head = if anchor == 0 {
            0
        } else {
            solution.head_of(anchor)
        };
        self.update(instance, solution, route, head);
    }

    /// Drop empty routes and renumber the others.
    pub fn remove_empty_routes(&mut self, instance: &Instance, solution: &Solution) {
        if self.heads.iter().all(|&head| head != 0) {
            return;
        }
        let heads: Vec<Node> = self.heads.iter().copied().filter(|&h| h != 0).collect();
        self.heads.clear();
        self.tails.clear();
        self.loads.clear();
        self.num_customers.clear();
        self.signatures.clear();
        for head in heads {
            self.push_route(instance, solution, head);
        }
    }

    /// Nodes of a route in visiting order.
    pub fn route_nodes(&self, solution: &Solution, route: usize) -> Vec<Node> {
        solution.route_nodes(self.heads[route]).collect()
    }

    /// Whether the route has room for `amount` more units.
    pub fn fits(&self, instance: &Instance, route: usize, amount: i32) -> bool {
        self.loads[route] + amount <= instance.capacity
    }
}
