//! MOEA Watch - Instrumentation substrate for multi-objective optimizers.
//!
//! This crate provides the pieces every population-based multi-objective run
//! needs around its search loop: a bounded non-dominated archive truncated by
//! crowding distance, pluggable evaluators (sequential, local-parallel and
//! distributed) and an observer bus through which a run reports progress to
//! loggers, progress meters and front writers.
//!
//! # Architecture
//!
//! The crate is split into four modules:
//!
//! - `schema`: Solutions, progress events and run configuration
//! - `compute`: Dominance, crowding distance, archive, evaluators, IGD
//! - `observe`: Observer bus and concrete observers
//! - `output`: Front files and renderers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Instant;
//!
//! use moea_watch::{
//!     compute::{CrowdingDistanceArchive, Evaluator, ParallelEvaluator, Problem, Zdt1},
//!     observe::{BasicObserver, Observable, ProgressBarObserver},
//!     schema::{ProgressEvent, Solution},
//! };
//!
//! let problem = Zdt1::new(30);
//! let evaluator = ParallelEvaluator::new();
//! let mut archive = CrowdingDistanceArchive::new(100);
//!
//! let mut bus = Observable::new();
//! bus.register(BasicObserver::new(100));
//! bus.register(ProgressBarObserver::new(1000));
//!
//! let start = Instant::now();
//! let population: Vec<Solution> = (0..1000)
//!     .map(|i| Solution::new(vec![i as f64 / 1000.0; 30]))
//!     .collect();
//! let population = evaluator.evaluate(population, &problem).unwrap();
//! archive.extend(population);
//!
//! let event = ProgressEvent::builder()
//!     .evaluations(1000)
//!     .computing_time(start.elapsed())
//!     .solutions(archive.to_population())
//!     .problem(problem.info())
//!     .build()
//!     .unwrap();
//! for failure in bus.notify(&event) {
//!     eprintln!("{} failed: {}", failure.observer, failure.error);
//! }
//! ```

pub mod compute;
pub mod observe;
pub mod output;
pub mod schema;

// Re-export commonly used types
pub use compute::{CrowdingDistanceArchive, Evaluator, InvertedGenerationalDistance, Problem};
pub use observe::{Observable, Observer, ObserverError};
pub use schema::{ProgressEvent, RunConfig, Solution};
