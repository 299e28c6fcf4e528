//! Distributed evaluation through a cluster-style compute backend.
//!
//! The population is split into contiguous partitions, shipped to a
//! [`ComputeBackend`] and reassembled by offset. A backend that is down, fails,
//! or returns partitions that do not cover the input exactly fails the whole
//! call.

use rayon::prelude::*;

use crate::schema::Population;

use super::evaluator::{EvaluationError, Evaluator, ensure_evaluated};
use super::problem::Problem;

/// A contiguous slice of a population sent to a backend.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Index of the first solution in the original population.
    pub offset: usize,
    /// Solutions of this slice, in population order.
    pub solutions: Population,
}

/// Contract a distributed compute backend must satisfy.
///
/// Partitions may be processed and returned in any order; the evaluator
/// restores order from each partition's offset.
pub trait ComputeBackend: Send + Sync {
    /// Backend name for logs and errors.
    fn name(&self) -> &str;

    /// Whether the backend can currently accept work.
    fn is_available(&self) -> bool;

    /// Evaluate every solution of every partition.
    fn run_partitions(
        &self,
        partitions: Vec<Partition>,
        problem: &dyn Problem,
    ) -> Result<Vec<Partition>, EvaluationError>;
}

/// In-process backend running each partition as a task on a dedicated rayon pool.
#[derive(Debug)]
pub struct ThreadPoolBackend {
    pool: rayon::ThreadPool,
}

impl ThreadPoolBackend {
    pub fn new(workers: usize) -> Result<Self, EvaluationError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("backend-worker-{i}"))
            .build()
            .map_err(|e| EvaluationError::ThreadPool(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ComputeBackend for ThreadPoolBackend {
    fn name(&self) -> &str {
        "thread-pool"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn run_partitions(
        &self,
        partitions: Vec<Partition>,
        problem: &dyn Problem,
    ) -> Result<Vec<Partition>, EvaluationError> {
        self.pool.install(|| {
            partitions
                .into_par_iter()
                .map(|mut partition| -> Result<Partition, EvaluationError> {
                    for (i, solution) in partition.solutions.iter_mut().enumerate() {
                        problem.evaluate(solution).map_err(|source| {
                            EvaluationError::Problem {
                                index: partition.offset + i,
                                source,
                            }
                        })?;
                    }
                    Ok(partition)
                })
                .collect()
        })
    }
}

/// Evaluator delegating to a [`ComputeBackend`].
pub struct DistributedEvaluator<B> {
    backend: B,
    partitions: usize,
}

impl<B: ComputeBackend> DistributedEvaluator<B> {
    /// Split populations into at most `partitions` chunks (at least one).
    pub fn new(backend: B, partitions: usize) -> Self {
        Self {
            backend,
            partitions: partitions.max(1),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn split(&self, population: Population) -> Vec<Partition> {
        let chunk = population.len().div_ceil(self.partitions).max(1);
        let mut partitions = Vec::with_capacity(self.partitions);
        let mut offset = 0;
        let mut rest = population.into_iter();

        loop {
            let solutions: Population = rest.by_ref().take(chunk).collect();
            if solutions.is_empty() {
                break;
            }
            let len = solutions.len();
            partitions.push(Partition { offset, solutions });
            offset += len;
        }

        partitions
    }

    fn reassemble(
        mut partitions: Vec<Partition>,
        expected: usize,
    ) -> Result<Population, EvaluationError> {
        partitions.sort_by_key(|p| p.offset);

        let mut population = Population::with_capacity(expected);
        for partition in partitions {
            if partition.offset != population.len() {
                return Err(EvaluationError::PartitionMismatch {
                    expected,
                    actual: population.len() + partition.solutions.len(),
                });
            }
            population.extend(partition.solutions);
        }

        if population.len() != expected {
            return Err(EvaluationError::PartitionMismatch {
                expected,
                actual: population.len(),
            });
        }

        Ok(population)
    }
}

impl<B: ComputeBackend> Evaluator for DistributedEvaluator<B> {
    fn name(&self) -> &str {
        "distributed"
    }

    fn evaluate(
        &self,
        population: Population,
        problem: &dyn Problem,
    ) -> Result<Population, EvaluationError> {
        if !self.backend.is_available() {
            return Err(EvaluationError::BackendUnavailable(
                self.backend.name().to_string(),
            ));
        }

        let expected = population.len();
        if expected == 0 {
            return Ok(population);
        }

        let partitions = self.split(population);
        log::debug!(
            "Submitting {} partitions ({} solutions) to backend '{}'",
            partitions.len(),
            expected,
            self.backend.name()
        );

        let evaluated = self.backend.run_partitions(partitions, problem)?;
        let population = Self::reassemble(evaluated, expected)?;

        ensure_evaluated(&population, problem)?;
        Ok(population)
    }
}
