//! Ruin methods removing (parts of) visits from a solution.
//!
//! Every method returns the removed `(customer, amount)` pairs, aggregated
//! per customer in order of first removal, and leaves the route context
//! rebuilt for the ruined solution.

use crate::config::RuinMethodType;
use crate::instance::Instance;
use crate::route_context::RouteContext;
use crate::solution::{Customer, Node, Solution};
use crate::Random;
use rand::seq::SliceRandom;
use rand::Rng;

/// Collects removed amounts per customer, keeping first-removal order.
#[derive(Debug, Default)]
struct Removed {
    slots: Vec<Option<usize>>,
    entries: Vec<(Customer, i32)>,
}

impl Removed {
    fn new(num_customers: usize) -> Self {
        Removed {
            slots: vec![None; num_customers],
            entries: Vec::new(),
        }
    }

    fn add(&mut self, customer: Customer, amount: i32) {
        if amount <= 0 {
            return;
        }
        match self.slots[customer as usize] {
            Some(slot) => self.entries[slot].1 += amount,
            None => {
                self.slots[customer as usize] = Some(self.entries.len());
                self.entries.push((customer, amount));
            }
        }
    }
}

/// Removes a random number of uniformly chosen visits.
#[derive(Debug, Clone)]
pub struct RandomRuin {
    sizes: Vec<usize>,
}

impl RandomRuin {
    pub fn new(sizes: Vec<usize>) -> Self {
        RandomRuin { sizes }
    }

    pub fn ruin(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        rng: &mut Random,
    ) -> Vec<(Customer, i32)> {
        let mut nodes: Vec<Node> = solution.node_indices().collect();
        let size = self.sizes.choose(rng).copied().unwrap_or(0).min(nodes.len());
        let (chosen, _) = nodes.partial_shuffle(rng, size);

        let mut removed = Removed::new(instance.num_customers);
        for &node in chosen.iter() {
            let (customer, load) = solution.remove(instance, node);
            removed.add(customer, load);
        }
        *context = RouteContext::new(instance, solution);
        removed.entries
    }
}

/// Slack induction by string removals, with partial removal of split loads.
#[derive(Debug, Clone)]
pub struct SisrsRuin {
    average_customers: usize,
    max_length: usize,
    split_rate: f64,
    preserved_probability: f64,
    /// Customers sorted by distance from each customer, the customer first.
    neighbors: Vec<Vec<Customer>>,
}

impl SisrsRuin {
    pub fn new(
        instance: &Instance,
        average_customers: usize,
        max_length: usize,
        split_rate: f64,
        preserved_probability: f64,
    ) -> Self {
        let neighbors = (0..instance.num_customers as Customer)
            .map(|customer| {
                let mut list = vec![customer];
                list.extend(instance.get_neighbors(customer));
                list
            })
            .collect();
        SisrsRuin {
            average_customers,
            max_length,
            split_rate,
            preserved_probability,
            neighbors,
        }
    }

    /// Maximum string length and number of strings for this call.
    fn calculate_limits(&self, context: &RouteContext, rng: &mut Random) -> (f64, usize) {
        let routes = context.num_routes().max(1);
        let visits: usize = (0..context.num_routes()).map(|r| context.len(r)).sum();
        let average_cardinality = (visits as f64 / routes as f64).round();

        let lsmax = average_cardinality.min(self.max_length as f64).max(1.0);
        let ksmax = 4.0 * self.average_customers as f64 / (1.0 + lsmax) - 1.0;
        let ks = if ksmax > 0.0 {
            rng.gen_range(1.0..ksmax + 1.0).floor() as usize
        } else {
            1
        };
        (lsmax, ks.max(1))
    }

    pub fn ruin(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        rng: &mut Random,
    ) -> Vec<(Customer, i32)> {
        let mut removed = Removed::new(instance.num_customers);
        let live: Vec<Node> = solution.node_indices().collect();
        let Some(&seed) = live.choose(rng) else {
            return removed.entries;
        };

        let mut visits: Vec<Vec<Node>> = vec![Vec::new(); instance.num_customers];
        for &node in &live {
            visits[solution.customer(node) as usize].push(node);
        }
        // The seed visit opens the first string.
        let seed_customer = solution.customer(seed);
        visits[seed_customer as usize].retain(|&n| n != seed);
        visits[seed_customer as usize].insert(0, seed);

        let (lsmax, ks) = self.calculate_limits(context, rng);
        let mut ruined = vec![false; context.num_routes()];
        let mut ruined_count = 0;

        'outer: for &customer in &self.neighbors[seed_customer as usize] {
            for &node in &visits[customer as usize] {
                if !solution.is_live(node) {
                    continue;
                }
                let route = context.route_index(node);
                if ruined[route] {
                    continue;
                }
                self.remove_string(instance, solution, context, route, node, lsmax, &mut removed, rng);
                ruined[route] = true;
                ruined_count += 1;
                if ruined_count >= ks {
                    break 'outer;
                }
            }
        }

        *context = RouteContext::new(instance, solution);
        removed.entries
    }

    #[allow(clippy::too_many_arguments)]
    fn remove_string(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &RouteContext,
        route: usize,
        anchor: Node,
        lsmax: f64,
        removed: &mut Removed,
        rng: &mut Random,
    ) {
        let nodes = context.route_nodes(solution, route);
        let len = nodes.len();
        let ltmax = lsmax.min(len as f64);
        let length = (rng.gen_range(1.0..ltmax + 1.0).floor() as usize).clamp(1, len);

        let position = context.position(anchor);
        let lowest = (position + 1).saturating_sub(length);
        let highest = position.min(len - length);
        let start = rng.gen_range(lowest..=highest);

        let mut count = 0;
        for &node in &nodes[start..] {
            if count >= length {
                break;
            }
            if node != anchor
                && self.preserved_probability > 0.0
                && rng.gen_bool(self.preserved_probability)
            {
                continue;
            }
            count += 1;

            let load = solution.load(node);
            if load > 1 && self.split_rate > 0.0 && rng.gen_bool(self.split_rate) {
                let amount = rng.gen_range(1..load);
                solution.set_load(node, load - amount);
                removed.add(solution.customer(node), amount);
            } else {
                let (customer, load) = solution.remove(instance, node);
                removed.add(customer, load);
            }
        }
    }
}

/// A configured ruin method.
#[derive(Debug, Clone)]
pub enum RuinMethod {
    Sisrs(SisrsRuin),
    Random(RandomRuin),
}

impl RuinMethod {
    pub fn new(method: &RuinMethodType, instance: &Instance) -> Self {
        match method {
            RuinMethodType::SISRs(average_customers, max_length, split_rate, preserved) => {
                RuinMethod::Sisrs(SisrsRuin::new(
                    instance,
                    (*average_customers).max(1) as usize,
                    (*max_length).max(1) as usize,
                    *split_rate,
                    *preserved,
                ))
            }
            RuinMethodType::Random(sizes) => RuinMethod::Random(RandomRuin::new(
                sizes.iter().map(|&s| s.max(0) as usize).collect(),
            )),
        }
    }

    /// Ruin `solution` and return the removed amounts.
    pub fn ruin(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        context: &mut RouteContext,
        rng: &mut Random,
    ) -> Vec<(Customer, i32)> {
        match self {
            RuinMethod::Sisrs(method) => method.ruin(instance, solution, context, rng),
            RuinMethod::Random(method) => method.ruin(instance, solution, context, rng),
        }
    }
}
