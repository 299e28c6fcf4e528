//! Progress events published by a run loop on the observer bus.
//!
//! Required fields are checked when the event is built, so observers never
//! see an event without an evaluation count or a solution set. Fields that
//! only some observers need stay optional and are checked by those observers.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Population, Solution};

/// Named fields of a [`ProgressEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventField {
    Evaluations,
    ComputingTime,
    Solutions,
    Problem,
    TerminationCriterionIsMet,
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Evaluations => "EVALUATIONS",
            Self::ComputingTime => "COMPUTING_TIME",
            Self::Solutions => "SOLUTIONS",
            Self::Problem => "PROBLEM",
            Self::TerminationCriterionIsMet => "termination_criterion_is_met",
        };
        f.write_str(name)
    }
}

/// Errors raised while building an event.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Required event field {0} is missing")]
    MissingField(EventField),
}

/// Identity and capabilities of the problem a run is solving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInfo {
    /// Human-readable problem name, used as plot label.
    pub name: String,
    /// Whether the problem's optimum moves over time.
    pub dynamic: bool,
}

impl ProblemInfo {
    pub fn new(name: impl Into<String>, dynamic: bool) -> Self {
        Self {
            name: name.into(),
            dynamic,
        }
    }
}

/// Snapshot of an algorithm's progress, immutable once built.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    evaluations: u64,
    computing_time: Option<Duration>,
    solutions: Population,
    problem: Option<ProblemInfo>,
    termination_criterion_is_met: Option<bool>,
}

impl ProgressEvent {
    /// Start building an event.
    pub fn builder() -> ProgressEventBuilder {
        ProgressEventBuilder::default()
    }

    /// Number of evaluations performed so far.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Elapsed computing time, if the publisher reports it.
    #[inline]
    pub fn computing_time(&self) -> Option<Duration> {
        self.computing_time
    }

    /// Current solutions (population or archive snapshot). Always a sequence.
    #[inline]
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// The problem being solved, if the publisher attached it.
    #[inline]
    pub fn problem(&self) -> Option<&ProblemInfo> {
        self.problem.as_ref()
    }

    /// Termination or change signal, when the publisher tracks one.
    #[inline]
    pub fn termination_criterion_is_met(&self) -> Option<bool> {
        self.termination_criterion_is_met
    }
}

/// Builder for [`ProgressEvent`].
#[derive(Debug, Default)]
pub struct ProgressEventBuilder {
    evaluations: Option<u64>,
    computing_time: Option<Duration>,
    solutions: Option<Population>,
    problem: Option<ProblemInfo>,
    termination_criterion_is_met: Option<bool>,
}

impl ProgressEventBuilder {
    #[must_use]
    pub fn evaluations(mut self, evaluations: u64) -> Self {
        self.evaluations = Some(evaluations);
        self
    }

    #[must_use]
    pub fn computing_time(mut self, computing_time: Duration) -> Self {
        self.computing_time = Some(computing_time);
        self
    }

    #[must_use]
    pub fn solutions(mut self, solutions: Population) -> Self {
        self.solutions = Some(solutions);
        self
    }

    #[must_use]
    pub fn problem(mut self, problem: ProblemInfo) -> Self {
        self.problem = Some(problem);
        self
    }

    #[must_use]
    pub fn termination_criterion_is_met(mut self, met: bool) -> Self {
        self.termination_criterion_is_met = Some(met);
        self
    }

    /// Finish the event. `evaluations` and `solutions` are required.
    pub fn build(self) -> Result<ProgressEvent, EventError> {
        let evaluations = self
            .evaluations
            .ok_or(EventError::MissingField(EventField::Evaluations))?;
        let solutions = self
            .solutions
            .ok_or(EventError::MissingField(EventField::Solutions))?;

        Ok(ProgressEvent {
            evaluations,
            computing_time: self.computing_time,
            solutions,
            problem: self.problem,
            termination_criterion_is_met: self.termination_criterion_is_met,
        })
    }
}
