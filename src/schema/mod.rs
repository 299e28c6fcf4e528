//! Schema module - Solutions, progress events and run configuration.

mod config;
mod event;
mod solution;

pub use config::*;
pub use event::*;
pub use solution::*;
