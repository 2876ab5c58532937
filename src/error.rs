//! Error type shared by configuration, instance loading and solution checks.

use crate::solution::{Customer, Node};
use std::fmt;

/// Errors reported by the solver.
///
/// Configuration and instance errors are raised before any search starts.
/// The invariant variants indicate a logic fault inside the search and are
/// never expected on valid input.
#[derive(Debug)]
pub enum SolverError {
    /// A strategy name (operator, acceptance rule, ruin method, sorter) is not recognized.
    UnknownName { kind: &'static str, name: String },
    /// The input format tag is neither `DENSE_MATRIX` nor `COORD_LIST`.
    UnknownInputFormat(String),
    /// A configuration parameter is out of range.
    InvalidConfig(String),
    /// The instance data is inconsistent.
    InvalidInstance(String),
    /// A route carries more than the vehicle capacity.
    CapacityExceeded { head: Node, load: i32, capacity: i32 },
    /// The loads delivered to a customer do not add up to its demand.
    DemandMismatch {
        customer: Customer,
        served: i32,
        demand: i32,
    },
    /// The incrementally tracked objective drifted from the recomputed one.
    ObjectiveMismatch { tracked: i32, actual: i32 },
    /// A node is malformed (bad links, depot as customer, negative load).
    InvalidNode { node: Node, reason: &'static str },
    /// I/O error.
    Io(std::io::Error),
    /// JSON (de)serialization error.
    Json(serde_json::Error),
}

impl SolverError {
    /// Whether the error is a caller mistake detected before solving.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SolverError::UnknownName { .. }
                | SolverError::UnknownInputFormat(_)
                | SolverError::InvalidConfig(_)
                | SolverError::InvalidInstance(_)
        )
    }

    /// Whether the error reports a broken solution invariant.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SolverError::CapacityExceeded { .. }
                | SolverError::DemandMismatch { .. }
                | SolverError::ObjectiveMismatch { .. }
                | SolverError::InvalidNode { .. }
        )
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::UnknownName { kind, name } => write!(f, "Invalid {}: {}", kind, name),
            SolverError::UnknownInputFormat(tag) => write!(f, "Invalid input format: {}", tag),
            SolverError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SolverError::InvalidInstance(msg) => write!(f, "Invalid instance: {}", msg),
            SolverError::CapacityExceeded {
                head,
                load,
                capacity,
            } => write!(
                f,
                "Route starting at node {} carries {} > capacity {}",
                head, load, capacity
            ),
            SolverError::DemandMismatch {
                customer,
                served,
                demand,
            } => write!(
                f,
                "Customer {} served {} units, demand is {}",
                customer, served, demand
            ),
            SolverError::ObjectiveMismatch { tracked, actual } => write!(
                f,
                "Tracked objective {} differs from actual {}",
                tracked, actual
            ),
            SolverError::InvalidNode { node, reason } => {
                write!(f, "Invalid node {}: {}", node, reason)
            }
            SolverError::Io(e) => write!(f, "I/O error: {}", e),
            SolverError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Io(e) => Some(e),
            SolverError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SolverError {
    fn from(e: std::io::Error) -> Self {
        SolverError::Io(e)
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(e: serde_json::Error) -> Self {
        SolverError::Json(e)
    }
}
