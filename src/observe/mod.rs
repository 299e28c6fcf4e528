//! Observe module - Publish/subscribe bus for algorithm progress.
//!
//! A run loop owns an [`Observable`] and publishes a [`ProgressEvent`] after
//! each iteration. Registered observers are called synchronously, in
//! registration order, on the publishing thread. Each call runs inside a
//! fault boundary: an observer error is logged and collected, and the
//! remaining observers still see the event (see [`FaultPolicy`]).
//!
//! # Example
//!
//! ```rust
//! use moea_watch::observe::{Observable, ObserverError};
//! use moea_watch::schema::{ProgressEvent, Solution};
//!
//! let mut bus = Observable::new();
//! bus.register(|event: &ProgressEvent| -> Result<(), ObserverError> {
//!     println!("evaluations: {}", event.evaluations());
//!     Ok(())
//! });
//!
//! let event = ProgressEvent::builder()
//!     .evaluations(100)
//!     .solutions(vec![Solution::from_objectives(vec![0.5, 0.5])])
//!     .build()
//!     .unwrap();
//! let failures = bus.notify(&event);
//! assert!(failures.is_empty());
//! ```

mod basic;
mod output_dir;
mod plot_front;
mod progress;
mod sink;
mod write_front;

use std::fmt;
use std::io;
use std::sync::Arc;

use log::Level;

use crate::schema::{EventField, ProgressEvent};

pub use basic::BasicObserver;
pub use output_dir::prepare_output_directory;
pub use plot_front::PlotFrontToFileObserver;
pub use progress::{Meter, ProgressBarObserver, TextMeter};
pub use sink::{LOG_TARGET, LogCrateSink, LogSink, MemorySink, default_sink};
pub use write_front::WriteFrontToFileObserver;

/// Errors raised by [`Observer::update`].
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The event lacks a field this observer requires.
    #[error("Event field {0} is required by this observer")]
    MissingField(EventField),
    #[error("Observer I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Receives progress events.
pub trait Observer: Send {
    /// Name used when reporting failures.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn update(&mut self, event: &ProgressEvent) -> Result<(), ObserverError>;
}

/// Blanket implementation for observer closures.
impl<F> Observer for F
where
    F: FnMut(&ProgressEvent) -> Result<(), ObserverError> + Send,
{
    fn update(&mut self, event: &ProgressEvent) -> Result<(), ObserverError> {
        self(event)
    }
}

/// Handle returned by [`Observable::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the bus does when an observer fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Log the failure and keep notifying the remaining observers.
    #[default]
    Isolate,
    /// Stop notifying at the first failure.
    Propagate,
}

/// A failed observer call collected by [`Observable::notify`].
#[derive(Debug)]
pub struct ObserverFailure {
    /// Handle of the failing observer.
    pub id: ObserverId,
    /// Its [`Observer::name`].
    pub observer: String,
    /// The error it returned.
    pub error: ObserverError,
}

/// Ordered set of observers notified synchronously.
pub struct Observable {
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
    next_id: u64,
    policy: FaultPolicy,
    sink: Arc<dyn LogSink>,
}

impl Default for Observable {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable {
    pub fn new() -> Self {
        Self::with_policy(FaultPolicy::default())
    }

    pub fn with_policy(policy: FaultPolicy) -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
            policy,
            sink: default_sink(),
        }
    }

    /// Report observer failures through `sink` instead of the `log` facade.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Add an observer at the end of the notification order.
    pub fn register<O: Observer + 'static>(&mut self, observer: O) -> ObserverId {
        self.register_boxed(Box::new(observer))
    }

    pub fn register_boxed(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer, returning it if it was registered.
    pub fn deregister(&mut self, id: ObserverId) -> Option<Box<dyn Observer>> {
        let index = self.observers.iter().position(|(i, _)| *i == id)?;
        Some(self.observers.remove(index).1)
    }

    /// Remove every observer.
    pub fn deregister_all(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Call every observer with `event`, in registration order.
    ///
    /// Returns the failures that occurred; empty when every observer succeeded.
    pub fn notify(&mut self, event: &ProgressEvent) -> Vec<ObserverFailure> {
        let mut failures = Vec::new();

        for (id, observer) in &mut self.observers {
            if let Err(error) = observer.update(event) {
                self.sink.log(
                    Level::Warn,
                    &format!(
                        "Observer {} ({}) failed at {} evaluations: {}",
                        id,
                        observer.name(),
                        event.evaluations(),
                        error
                    ),
                );
                failures.push(ObserverFailure {
                    id: *id,
                    observer: observer.name().to_string(),
                    error,
                });

                if self.policy == FaultPolicy::Propagate {
                    break;
                }
            }
        }

        failures
    }
}
