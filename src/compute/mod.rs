//! Compute module - Dominance, archives, evaluators and quality indicators.

mod archive;
mod density;
mod distributed;
mod dominance;
mod evaluator;
mod indicator;
mod problem;

pub use archive::*;
pub use density::*;
pub use distributed::*;
pub use dominance::*;
pub use evaluator::*;
pub use indicator::*;
pub use problem::*;
