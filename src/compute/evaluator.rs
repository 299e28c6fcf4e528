//! Population evaluators.
//!
//! An evaluator turns an unevaluated population into an evaluated one of the
//! same length and order. Any single scoring failure fails the whole call, so
//! callers never see a partially evaluated population.

use rayon::prelude::*;

use crate::schema::{EvaluatorConfig, Population, Solution};

use super::distributed::{DistributedEvaluator, ThreadPoolBackend};
use super::problem::{Problem, ProblemError};

/// Errors raised by [`Evaluator::evaluate`].
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Evaluation of solution {index} failed: {source}")]
    Problem {
        index: usize,
        #[source]
        source: ProblemError,
    },
    #[error("Compute backend '{0}' is unavailable")]
    BackendUnavailable(String),
    #[error("Compute backend failed: {0}")]
    Backend(String),
    #[error("Backend returned {actual} solutions, expected {expected}")]
    PartitionMismatch { expected: usize, actual: usize },
    #[error("Solution {index} has {actual} objectives, expected {expected}")]
    IncompleteObjectives {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Strategy for scoring a population against a problem.
pub trait Evaluator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Score every solution, preserving input order.
    fn evaluate(
        &self,
        population: Population,
        problem: &dyn Problem,
    ) -> Result<Population, EvaluationError>;
}

/// Check that every solution carries a full objective vector.
pub fn ensure_evaluated(
    population: &[Solution],
    problem: &dyn Problem,
) -> Result<(), EvaluationError> {
    let expected = problem.number_of_objectives();
    match population
        .iter()
        .position(|s| s.objectives.len() != expected)
    {
        Some(index) => Err(EvaluationError::IncompleteObjectives {
            index,
            expected,
            actual: population[index].objectives.len(),
        }),
        None => Ok(()),
    }
}

/// Scores solutions in order on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEvaluator;

impl Evaluator for SequentialEvaluator {
    fn name(&self) -> &str {
        "sequential"
    }

    fn evaluate(
        &self,
        mut population: Population,
        problem: &dyn Problem,
    ) -> Result<Population, EvaluationError> {
        for (index, solution) in population.iter_mut().enumerate() {
            problem
                .evaluate(solution)
                .map_err(|source| EvaluationError::Problem { index, source })?;
        }

        ensure_evaluated(&population, problem)?;
        Ok(population)
    }
}

/// Scores solutions on a rayon worker pool.
///
/// Each worker writes its result in place at the solution's index, so the
/// returned population keeps the input order regardless of completion order.
#[derive(Debug, Default)]
pub struct ParallelEvaluator {
    /// Dedicated pool; `None` uses rayon's global pool.
    pool: Option<rayon::ThreadPool>,
}

impl ParallelEvaluator {
    /// Evaluate on rayon's global pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Evaluate on a dedicated pool with `num_threads` workers.
    pub fn with_threads(num_threads: usize) -> Result<Self, EvaluationError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("evaluator-{i}"))
            .build()
            .map_err(|e| EvaluationError::ThreadPool(e.to_string()))?;

        Ok(Self { pool: Some(pool) })
    }
}

impl Evaluator for ParallelEvaluator {
    fn name(&self) -> &str {
        "parallel"
    }

    fn evaluate(
        &self,
        mut population: Population,
        problem: &dyn Problem,
    ) -> Result<Population, EvaluationError> {
        let run = |population: &mut Population| {
            population
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(index, solution)| {
                    problem
                        .evaluate(solution)
                        .map_err(|source| EvaluationError::Problem { index, source })
                })
        };

        match &self.pool {
            Some(pool) => pool.install(|| run(&mut population))?,
            None => run(&mut population)?,
        }

        ensure_evaluated(&population, problem)?;
        Ok(population)
    }
}

/// Build the evaluator described by a configuration.
pub fn evaluator_from_config(
    config: &EvaluatorConfig,
) -> Result<Box<dyn Evaluator>, EvaluationError> {
    let evaluator: Box<dyn Evaluator> = match config {
        EvaluatorConfig::Sequential => Box::new(SequentialEvaluator),
        EvaluatorConfig::Parallel { num_threads: None } => Box::new(ParallelEvaluator::new()),
        EvaluatorConfig::Parallel {
            num_threads: Some(n),
        } => Box::new(ParallelEvaluator::with_threads(*n)?),
        EvaluatorConfig::Distributed {
            workers,
            partitions,
        } => Box::new(DistributedEvaluator::new(
            ThreadPoolBackend::new(*workers)?,
            *partitions,
        )),
    };

    log::debug!("Using {} evaluator", evaluator.name());
    Ok(evaluator)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::compute::problem::{Problem, ProblemError};
    use crate::schema::Solution;

    /// Objectives echo the first variable; fails on a marker value.
    #[derive(Default)]
    pub struct EchoProblem {
        pub calls: AtomicUsize,
    }

    pub const FAIL_MARKER: f64 = -1.0;

    impl Problem for EchoProblem {
        fn name(&self) -> &str {
            "Echo"
        }

        fn number_of_variables(&self) -> usize {
            1
        }

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn evaluate(&self, solution: &mut Solution) -> Result<(), ProblemError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let x = solution.variables[0];
            if x == FAIL_MARKER {
                return Err(ProblemError::new("marker value"));
            }
            solution.objectives = vec![x, -x];
            Ok(())
        }
    }

    pub fn population(n: usize) -> Vec<Solution> {
        (0..n).map(|i| Solution::new(vec![i as f64])).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn assert_ordered(population: &[Solution]) {
        for (i, solution) in population.iter().enumerate() {
            assert_eq!(solution.objectives, vec![i as f64, -(i as f64)]);
        }
    }

    #[test]
    fn test_sequential_preserves_order() {
        let problem = EchoProblem::default();
        let result = SequentialEvaluator.evaluate(population(10), &problem).unwrap();

        assert_eq!(result.len(), 10);
        assert_ordered(&result);
    }

    #[test]
    fn test_sequential_failure_is_total() {
        let problem = EchoProblem::default();
        let mut input = population(5);
        input[3].variables[0] = FAIL_MARKER;

        let err = SequentialEvaluator.evaluate(input, &problem).unwrap_err();
        assert!(matches!(err, EvaluationError::Problem { index: 3, .. }));
    }

    #[test]
    fn test_parallel_preserves_order() {
        let problem = EchoProblem::default();
        let evaluator = ParallelEvaluator::with_threads(4).unwrap();
        let result = evaluator.evaluate(population(257), &problem).unwrap();

        assert_eq!(result.len(), 257);
        assert_ordered(&result);
    }

    #[test]
    fn test_parallel_global_pool() {
        let problem = EchoProblem::default();
        let result = ParallelEvaluator::new()
            .evaluate(population(33), &problem)
            .unwrap();
        assert_ordered(&result);
    }

    #[test]
    fn test_parallel_failure_is_total() {
        let problem = EchoProblem::default();
        let mut input = population(64);
        input[40].variables[0] = FAIL_MARKER;

        let err = ParallelEvaluator::with_threads(2)
            .unwrap()
            .evaluate(input, &problem)
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Problem { index: 40, .. }));
    }

    #[test]
    fn test_empty_population() {
        let problem = EchoProblem::default();
        let result = SequentialEvaluator.evaluate(Vec::new(), &problem).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_evaluator_from_config() {
        let problem = EchoProblem::default();
        for config in [
            EvaluatorConfig::Sequential,
            EvaluatorConfig::Parallel {
                num_threads: Some(2),
            },
            EvaluatorConfig::Distributed {
                workers: 2,
                partitions: 3,
            },
        ] {
            let evaluator = evaluator_from_config(&config).unwrap();
            let result = evaluator.evaluate(population(7), &problem).unwrap();
            assert_ordered(&result);
        }
    }
}
