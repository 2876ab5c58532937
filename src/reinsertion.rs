//! Greedy insertion with blinking and demand splitting.
//!
//! Used to build the initial solution and as the recreate step after a ruin.

use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Customer, Node, Solution};
use crate::Random;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
enum Position {
    /// Between two adjacent nodes of an existing route.
    Between(Node, Node),
    /// Add to the load of an existing visit of the same customer.
    Merge(Node),
    /// Open a new route.
    NewRoute,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    route: usize,
    position: Position,
    cost: i32,
    residual: i32,
}

/// Split reinsertion of removed customers.
#[derive(Debug, Clone)]
pub struct Reinsertion {
    blink_rate: f64,
}

impl Reinsertion {
    pub fn new(blink_rate: f64) -> Self {
        Reinsertion { blink_rate }
    }

    /// Insert every `(customer, amount)` pair, in order.
    pub fn reinsert(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        customers: &[(Customer, i32)],
        rng: &mut Random,
    ) {
        for &(customer, amount) in customers {
            self.insert_customer(instance, solution, context, customer, amount, rng);
        }
    }

    fn blink(&self, rng: &mut Random) -> bool {
        self.blink_rate > 0.0 && rng.gen_bool(self.blink_rate)
    }

    /// Cheapest way to add `customer` to `route`, if any position survives blinking.
    fn best_in_route(
        &self,
        instance: &Instance,
        solution: &Solution,
        context: &RouteContext,
        route: usize,
        customer: Customer,
        rng: &mut Random,
    ) -> Option<Candidate> {
        let residual = instance.capacity - context.load(route);
        if residual <= 0 || context.is_empty(route) {
            return None;
        }

        let nodes = context.route_nodes(solution, route);
        if let Some(&node) = nodes.iter().find(|&&n| solution.customer(n) == customer) {
            return Some(Candidate {
                route,
                position: Position::Merge(node),
                cost: 0,
                residual,
            });
        }

        let mut best: Option<Candidate> = None;
        let mut predecessor: Node = 0;
        for successor in nodes.into_iter().chain(std::iter::once(0)) {
            if !self.blink(rng) {
                let from = solution.customer(predecessor);
                let to = solution.customer(successor);
                let cost = instance.distance(from, customer) + instance.distance(customer, to)
                    - instance.distance(from, to);
                if best.map_or(true, |b| cost < b.cost) {
                    best = Some(Candidate {
                        route,
                        position: Position::Between(predecessor, successor),
                        cost,
                        residual,
                    });
                }
            }
            predecessor = successor;
        }
        best
    }

    fn insert_customer(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        customer: Customer,
        amount: i32,
        rng: &mut Random,
    ) {
        let mut remaining = amount;
        while remaining > 0 {
            let mut candidates: Vec<Candidate> = (0..context.num_routes())
                .filter_map(|route| {
                    self.best_in_route(instance, solution, context, route, customer, rng)
                })
                .collect();
            candidates.push(Candidate {
                route: usize::MAX,
                position: Position::NewRoute,
                cost: instance.distance(0, customer) + instance.distance(customer, 0),
                residual: instance.capacity,
            });
            candidates.sort_by_key(|c| c.cost);

            // Option A: a single position absorbing everything.
            let single = candidates.iter().find(|c| c.residual >= remaining).copied();

            // Option B: fill the cheapest positions one after another.
            let mut split_cost: i64 = 0;
            let mut left = remaining;
            for candidate in &candidates {
                if left <= 0 {
                    break;
                }
                if let Position::NewRoute = candidate.position {
                    let routes = (left + candidate.residual - 1) / candidate.residual;
                    split_cost += routes as i64 * candidate.cost as i64;
                    left = 0;
                } else {
                    split_cost += candidate.cost as i64;
                    left -= candidate.residual;
                }
            }

            let (target, load) = match single {
                Some(c) if c.cost as i64 <= split_cost => (c, remaining),
                _ => {
                    let cheapest = candidates[0];
                    (cheapest, remaining.min(cheapest.residual))
                }
            };
            self.apply(instance, solution, context, customer, load, target);
            remaining -= load;
        }
    }

    fn apply(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        customer: Customer,
        load: i32,
        candidate: Candidate,
    ) {
        match candidate.position {
            Position::Between(predecessor, successor) => {
                let node = solution.insert(instance, customer, load, predecessor, successor);
                context.update_from(instance, solution, candidate.route, node);
            }
            Position::Merge(node) => {
                solution.set_load(node, solution.load(node) + load);
                context.update_from(instance, solution, candidate.route, node);
            }
            Position::NewRoute => {
                let node = solution.insert(instance, customer, load, 0, 0);
                context.push_route(instance, solution, node);
            }
        }
    }
}
