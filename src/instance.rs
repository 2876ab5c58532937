//! Problem definition for the SDVRP.

use crate::error::SolverError;
use crate::solution::Customer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How the distances of an instance are given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputFormat {
    /// Explicit `(n + 1) x (n + 1)` matrix, depot first.
    DenseMatrix(Vec<Vec<i32>>),
    /// Integer coordinates, depot first; distances are rounded Euclidean.
    CoordList(Vec<(i32, i32)>),
}

impl InputFormat {
    /// The tag used by the flat entry point.
    pub fn to_str(&self) -> &'static str {
        match self {
            InputFormat::DenseMatrix(_) => "DENSE_MATRIX",
            InputFormat::CoordList(_) => "COORD_LIST",
        }
    }

    /// Build the full distance matrix.
    pub fn to_distance_matrix(&self) -> Vec<Vec<i32>> {
        match self {
            InputFormat::DenseMatrix(matrix) => matrix.clone(),
            InputFormat::CoordList(coords) => coords
                .iter()
                .map(|&(x1, y1)| {
                    coords
                        .iter()
                        .map(|&(x2, y2)| euclidean_distance(x1 - x2, y1 - y2))
                        .collect()
                })
                .collect(),
        }
    }
}

/// Rounded Euclidean length of the vector `(dx, dy)`.
pub fn euclidean_distance(dx: i32, dy: i32) -> i32 {
    (dx as f64).hypot(dy as f64).round() as i32
}

/// Serialized form of an instance: capacity, customer demands and distances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceInput {
    pub capacity: i32,
    /// Demands of customers `1..=n` (the depot is not listed).
    pub demands: Vec<i32>,
    pub input: InputFormat,
}

/// Represents an SDVRP instance. Node 0 is the depot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Number of nodes including the depot.
    pub num_customers: usize,
    pub capacity: i32,
    /// Demand per node, `demands[0] == 0`.
    pub demands: Vec<i32>,
    pub distance_matrix: Vec<Vec<i32>>,
}

impl Instance {
    /// Create an instance from customer demands (depot excluded) and a full
    /// distance matrix (depot included).
    pub fn new(
        capacity: i32,
        customer_demands: &[i32],
        distance_matrix: Vec<Vec<i32>>,
    ) -> Result<Self, SolverError> {
        let num_customers = customer_demands.len() + 1;

        if capacity <= 0 {
            return Err(SolverError::InvalidInstance(format!(
                "capacity must be positive, got {}",
                capacity
            )));
        }
        if let Some(&demand) = customer_demands.iter().find(|&&d| d < 0) {
            return Err(SolverError::InvalidInstance(format!(
                "negative demand {}",
                demand
            )));
        }
        if distance_matrix.len() != num_customers
            || distance_matrix.iter().any(|row| row.len() != num_customers)
        {
            return Err(SolverError::InvalidInstance(format!(
                "distance matrix must be {0}x{0}",
                num_customers
            )));
        }
        for (i, row) in distance_matrix.iter().enumerate() {
            if row[i] != 0 {
                return Err(SolverError::InvalidInstance(format!(
                    "distance from {0} to {0} must be zero",
                    i
                )));
            }
            if row.iter().any(|&d| d < 0) {
                return Err(SolverError::InvalidInstance(format!(
                    "negative distance in row {}",
                    i
                )));
            }
        }

        let mut demands = Vec::with_capacity(num_customers);
        demands.push(0);
        demands.extend_from_slice(customer_demands);

        Ok(Instance {
            num_customers,
            capacity,
            demands,
            distance_matrix,
        })
    }

    /// Create an instance from a dense matrix.
    pub fn from_dense_matrix(
        capacity: i32,
        customer_demands: &[i32],
        matrix: Vec<Vec<i32>>,
    ) -> Result<Self, SolverError> {
        Self::new(capacity, customer_demands, matrix)
    }

    /// Create an instance from integer coordinates.
    pub fn from_coord_list(
        capacity: i32,
        customer_demands: &[i32],
        coords: &[(i32, i32)],
    ) -> Result<Self, SolverError> {
        if coords.len() != customer_demands.len() + 1 {
            return Err(SolverError::InvalidInstance(format!(
                "expected {} coordinates, got {}",
                customer_demands.len() + 1,
                coords.len()
            )));
        }
        let format = InputFormat::CoordList(coords.to_vec());
        Self::new(capacity, customer_demands, format.to_distance_matrix())
    }

    /// Create an instance from its serialized form.
    pub fn from_input(input: &InstanceInput) -> Result<Self, SolverError> {
        match &input.input {
            InputFormat::DenseMatrix(matrix) => {
                Self::from_dense_matrix(input.capacity, &input.demands, matrix.clone())
            }
            InputFormat::CoordList(coords) => {
                Self::from_coord_list(input.capacity, &input.demands, coords)
            }
        }
    }

    /// Create an instance from flat buffers selected by a format tag.
    ///
    /// `DENSE_MATRIX` reads `distance_matrix` row-major with `(n + 1)^2`
    /// entries; `COORD_LIST` reads one `(x, y)` pair per node.
    pub fn from_flat(
        capacity: i32,
        customer_demands: &[i32],
        input_format: &str,
        distance_matrix: &[i32],
        coord_list_x: &[i32],
        coord_list_y: &[i32],
    ) -> Result<Self, SolverError> {
        let n = customer_demands.len() + 1;
        match input_format {
            "DENSE_MATRIX" => {
                if distance_matrix.len() != n * n {
                    return Err(SolverError::InvalidInstance(format!(
                        "expected {} matrix entries, got {}",
                        n * n,
                        distance_matrix.len()
                    )));
                }
                let matrix = distance_matrix.chunks(n).map(|row| row.to_vec()).collect();
                Self::from_dense_matrix(capacity, customer_demands, matrix)
            }
            "COORD_LIST" => {
                if coord_list_x.len() != coord_list_y.len() {
                    return Err(SolverError::InvalidInstance(
                        "coordinate lists differ in length".to_string(),
                    ));
                }
                let coords: Vec<(i32, i32)> = coord_list_x
                    .iter()
                    .copied()
                    .zip(coord_list_y.iter().copied())
                    .collect();
                Self::from_coord_list(capacity, customer_demands, &coords)
            }
            other => Err(SolverError::UnknownInputFormat(other.to_string())),
        }
    }

    /// Load an instance from a JSON file holding an [`InstanceInput`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let reader = BufReader::new(File::open(path)?);
        let input: InstanceInput = serde_json::from_reader(reader)?;
        Self::from_input(&input)
    }

    /// Distance between two customers (0 is the depot).
    #[inline]
    pub fn distance(&self, from: Customer, to: Customer) -> i32 {
        self.distance_matrix[from as usize][to as usize]
    }

    /// Demand of a customer.
    #[inline]
    pub fn demand(&self, customer: Customer) -> i32 {
        self.demands[customer as usize]
    }

    /// Number of customers excluding the depot.
    pub fn get_customer_count(&self) -> usize {
        self.num_customers - 1
    }

    /// Total demand over all customers.
    pub fn total_demand(&self) -> i64 {
        self.demands.iter().map(|&d| d as i64).sum()
    }

    /// Customers other than `customer` (and the depot), nearest first.
    pub fn get_neighbors(&self, customer: Customer) -> Vec<Customer> {
        let mut neighbors: Vec<Customer> = (1..self.num_customers as Customer)
            .filter(|&c| c != customer)
            .collect();
        neighbors.sort_by_key(|&c| (self.distance(customer, c), c));
        neighbors
    }
}
