//! Solution and population types shared by evaluators, archives and observers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute key holding the crowding distance assigned by a density estimator.
pub const CROWDING_DISTANCE: &str = "crowding_distance";

/// Attribute key holding the aggregated constraint violation of a solution.
///
/// Negative for infeasible solutions, `0.0` (or absent) for feasible ones.
pub const CONSTRAINT_VIOLATION: &str = "overall_constraint_violation";

/// A candidate solution: decision variables, objective values and annotations.
///
/// Objectives are minimized. An empty objective vector means the solution has
/// not been evaluated yet. Copies are always explicit via [`Clone`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solution {
    /// Decision variables.
    pub variables: Vec<f64>,
    /// Objective values (lower is better).
    #[serde(default)]
    pub objectives: Vec<f64>,
    /// Auxiliary annotations such as crowding distance.
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
}

/// Ordered sequence of solutions. Order only matters for reproducible output.
pub type Population = Vec<Solution>;

impl Solution {
    /// Create an unevaluated solution from decision variables.
    pub fn new(variables: Vec<f64>) -> Self {
        Self {
            variables,
            objectives: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Create a solution that only carries objective values.
    ///
    /// Used for reference fronts and tests where decision variables are irrelevant.
    pub fn from_objectives(objectives: Vec<f64>) -> Self {
        Self {
            variables: Vec::new(),
            objectives,
            attributes: BTreeMap::new(),
        }
    }

    /// Whether objective values have been assigned.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        !self.objectives.is_empty()
    }

    /// Read an attribute.
    pub fn attribute(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).copied()
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: f64) {
        self.attributes.insert(key.into(), value);
    }

    /// Aggregated constraint violation, `0.0` when not annotated.
    pub fn constraint_violation(&self) -> f64 {
        self.attribute(CONSTRAINT_VIOLATION).unwrap_or(0.0)
    }

    /// A solution is feasible when it carries no negative violation.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.constraint_violation() >= 0.0
    }

    /// Crowding distance, if a density estimator has annotated this solution.
    pub fn crowding_distance(&self) -> Option<f64> {
        self.attribute(CROWDING_DISTANCE)
    }
}
