//! Configuration types for an optimization run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Benchmark problem settings.
    #[serde(default)]
    pub problem: ProblemConfig,
    /// Search loop settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Archive settings.
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Evaluation strategy.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    /// Observers attached to the run.
    #[serde(default)]
    pub observers: ObserversConfig,
    /// Final result files.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Problem settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Number of decision variables.
    #[serde(default = "default_number_of_variables")]
    pub number_of_variables: usize,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            number_of_variables: default_number_of_variables(),
        }
    }
}

fn default_number_of_variables() -> usize {
    30
}

/// Search loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Solutions evaluated per iteration.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Evaluation budget.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: u64,
    /// Gaussian perturbation applied to archive members.
    #[serde(default = "default_mutation_strength")]
    pub mutation_strength: f64,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            max_evaluations: default_max_evaluations(),
            mutation_strength: default_mutation_strength(),
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    100
}
fn default_max_evaluations() -> u64 {
    25_000
}
fn default_mutation_strength() -> f64 {
    0.1
}

/// Archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Maximum number of non-dominated solutions kept.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    100
}

/// Evaluation strategy selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EvaluatorConfig {
    /// Score solutions one by one on the calling thread.
    #[default]
    Sequential,
    /// Score solutions on a local worker pool.
    Parallel {
        /// Worker count (None = rayon global pool).
        #[serde(default)]
        num_threads: Option<usize>,
    },
    /// Score partitions of the population on a compute backend.
    Distributed {
        /// Backend worker count.
        #[serde(default = "default_workers")]
        workers: usize,
        /// Number of partitions the population is split into.
        #[serde(default = "default_partitions")]
        partitions: usize,
    },
}

fn default_workers() -> usize {
    4
}
fn default_partitions() -> usize {
    8
}

/// Observers attached to a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObserversConfig {
    /// Show a progress meter bounded by the evaluation budget.
    #[serde(default)]
    pub progress_bar: bool,
    /// Periodic fitness logging.
    #[serde(default)]
    pub basic: Option<BasicObserverConfig>,
    /// Write each front to `FUN.<n>` files.
    #[serde(default)]
    pub write_front: Option<WriteFrontConfig>,
    /// Render fronts to files.
    #[serde(default)]
    pub plot_front: Option<PlotFrontConfig>,
}

/// Periodic logger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicObserverConfig {
    /// Log when `evaluations % frequency == 0`.
    #[serde(default = "default_frequency")]
    pub frequency: u64,
}

impl Default for BasicObserverConfig {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
        }
    }
}

fn default_frequency() -> u64 {
    1
}

/// Front file writer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFrontConfig {
    /// Target directory. Existing files inside it are removed.
    pub directory: PathBuf,
}

/// Front plotting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotFrontConfig {
    /// Target directory. Existing files inside it are removed.
    pub directory: PathBuf,
    /// Minimum IGD between consecutive fronts that triggers a new plot.
    #[serde(default = "default_igd_threshold")]
    pub igd_threshold: f64,
    /// IGD assumed when no previous front exists.
    #[serde(default = "default_initial_igd")]
    pub initial_igd: f64,
}

/// IGD between consecutive fronts above which a new plot is rendered.
pub const DEFAULT_IGD_THRESHOLD: f64 = 0.005;

/// IGD assumed before any front has been seen (maximal distance).
pub const DEFAULT_INITIAL_IGD: f64 = 1.0;

fn default_igd_threshold() -> f64 {
    DEFAULT_IGD_THRESHOLD
}
fn default_initial_igd() -> f64 {
    DEFAULT_INITIAL_IGD
}

/// Final result files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the final `FUN` and `VAR` files.
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

impl RunConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.problem.number_of_variables == 0 {
            return Err(ConfigError::NoVariables);
        }
        if self.search.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.search.max_evaluations == 0 {
            return Err(ConfigError::NoEvaluations);
        }
        if !(self.search.mutation_strength > 0.0) {
            return Err(ConfigError::InvalidMutationStrength(
                self.search.mutation_strength,
            ));
        }
        if self.archive.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        match &self.evaluator {
            EvaluatorConfig::Sequential => {}
            EvaluatorConfig::Parallel { num_threads } => {
                if *num_threads == Some(0) {
                    return Err(ConfigError::ZeroWorkers);
                }
            }
            EvaluatorConfig::Distributed {
                workers,
                partitions,
            } => {
                if *workers == 0 {
                    return Err(ConfigError::ZeroWorkers);
                }
                if *partitions == 0 {
                    return Err(ConfigError::ZeroPartitions);
                }
            }
        }

        if let Some(basic) = &self.observers.basic
            && basic.frequency == 0
        {
            return Err(ConfigError::ZeroFrequency);
        }

        if let Some(plot) = &self.observers.plot_front {
            if !(plot.igd_threshold >= 0.0) {
                return Err(ConfigError::InvalidThreshold(plot.igd_threshold));
            }
            if !(plot.initial_igd >= 0.0) {
                return Err(ConfigError::InvalidThreshold(plot.initial_igd));
            }
        }

        Ok(())
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Problem must have at least one decision variable")]
    NoVariables,
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("Evaluation budget must be non-zero")]
    NoEvaluations,
    #[error("Mutation strength must be positive, got {0}")]
    InvalidMutationStrength(f64),
    #[error("Archive capacity must be non-zero")]
    ZeroCapacity,
    #[error("Worker count must be non-zero")]
    ZeroWorkers,
    #[error("Partition count must be non-zero")]
    ZeroPartitions,
    #[error("Display frequency must be non-zero")]
    ZeroFrequency,
    #[error("IGD threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
