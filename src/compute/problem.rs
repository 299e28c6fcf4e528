//! Problem abstraction consumed by evaluators.

use crate::schema::{ProblemInfo, Solution};

/// Failure while scoring a single solution.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ProblemError(pub String);

impl ProblemError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An optimization problem able to score one solution at a time.
///
/// Implementations must be shareable across worker threads.
pub trait Problem: Send + Sync {
    /// Problem name, used in logs and plot labels.
    fn name(&self) -> &str;

    /// Length of a solution's decision vector.
    fn number_of_variables(&self) -> usize;

    /// Length of the objective vector `evaluate` fills in.
    fn number_of_objectives(&self) -> usize;

    /// Fill in the objective vector of `solution`.
    fn evaluate(&self, solution: &mut Solution) -> Result<(), ProblemError>;

    /// Whether the optimum of this problem moves over time.
    fn supports_dynamic_tracking(&self) -> bool {
        false
    }

    /// Descriptor attached to progress events.
    fn info(&self) -> ProblemInfo {
        ProblemInfo::new(self.name(), self.supports_dynamic_tracking())
    }
}

/// ZDT1 benchmark: two objectives, convex front, variables in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Zdt1 {
    number_of_variables: usize,
}

impl Zdt1 {
    pub fn new(number_of_variables: usize) -> Self {
        Self {
            number_of_variables: number_of_variables.max(2),
        }
    }

    /// Variable bounds, identical for every variable.
    pub fn bounds(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

impl Default for Zdt1 {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Problem for Zdt1 {
    fn name(&self) -> &str {
        "ZDT1"
    }

    fn number_of_variables(&self) -> usize {
        self.number_of_variables
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn evaluate(&self, solution: &mut Solution) -> Result<(), ProblemError> {
        let x = &solution.variables;
        if x.len() != self.number_of_variables {
            return Err(ProblemError(format!(
                "ZDT1 expects {} variables, got {}",
                self.number_of_variables,
                x.len()
            )));
        }

        let f1 = x[0];
        let tail: f64 = x[1..].iter().sum();
        let g = 1.0 + 9.0 * tail / (self.number_of_variables - 1) as f64;
        let f2 = g * (1.0 - (f1 / g).sqrt());

        solution.objectives = vec![f1, f2];
        Ok(())
    }
}
