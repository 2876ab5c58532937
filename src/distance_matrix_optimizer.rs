//! Shortest-path closure of the distance matrix.
//!
//! Solving on the closed matrix lets the search use detours through other
//! customers (or the depot) for free. [`DistanceMatrixOptimizer::restore`]
//! makes those detours explicit again as zero-load visits, so the restored
//! solution has the same cost under the original matrix.

use crate::instance::Instance;
use crate::solution::{Customer, Node, Solution};
use log::debug;

pub struct DistanceMatrixOptimizer {
    /// Last intermediate node of the shortest path between two nodes, if
    /// that path is shorter than the direct edge.
    via: Vec<Vec<Option<Customer>>>,
}

impl DistanceMatrixOptimizer {
    /// Replace every entry of `distance_matrix` by its shortest-path distance.
    pub fn new(distance_matrix: &mut [Vec<i32>]) -> Self {
        let n = distance_matrix.len();
        let mut via = vec![vec![None; n]; n];
        let mut improved = 0usize;

        for k in 0..n {
            for i in 0..n {
                let d_ik = distance_matrix[i][k];
                for j in 0..n {
                    let through = d_ik.saturating_add(distance_matrix[k][j]);
                    if through < distance_matrix[i][j] {
                        if via[i][j].is_none() {
                            improved += 1;
                        }
                        distance_matrix[i][j] = through;
                        via[i][j] = Some(k as Customer);
                    }
                }
            }
        }

        debug!(
            "Distance matrix optimizer shortened {} of {} entries",
            improved,
            n * n
        );
        DistanceMatrixOptimizer { via }
    }

    /// Whether the matrix already satisfied the triangle inequality.
    pub fn is_identity(&self) -> bool {
        self.via.iter().all(|row| row.iter().all(Option::is_none))
    }

    /// Intermediate nodes of the shortest path from `from` to `to`, in order.
    pub fn path(&self, from: Customer, to: Customer) -> Vec<Customer> {
        let mut path = Vec::new();
        self.collect_path(from, to, &mut path);
        path
    }

    fn collect_path(&self, from: Customer, to: Customer, path: &mut Vec<Customer>) {
        if let Some(k) = self.via[from as usize][to as usize] {
            self.collect_path(from, k, path);
            path.push(k);
            self.collect_path(k, to, path);
        }
    }

    /// Expand every shortened edge of `solution` into its detour.
    ///
    /// `instance` must hold the optimized matrix; the objective is left
    /// unchanged. Intermediate customers are inserted with load 0 and an
    /// intermediate depot cuts the route in two.
    pub fn restore(&self, instance: &Instance, solution: &mut Solution) {
        if self.is_identity() {
            return;
        }
        let heads: Vec<Node> = solution.route_heads().collect();
        for head in heads {
            let nodes: Vec<Node> = solution.route_nodes(head).collect();
            let mut previous: Node = 0;
            for next in nodes.into_iter().chain(std::iter::once(0)) {
                let from = solution.customer(previous);
                let to = solution.customer(next);
                for customer in self.path(from, to) {
                    if customer == 0 {
                        solution.split_after(instance, previous);
                        previous = 0;
                    } else {
                        previous = solution.insert(instance, customer, 0, previous, next);
                    }
                }
                previous = next;
            }
        }
    }
}
