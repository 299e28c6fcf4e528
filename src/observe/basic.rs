//! Periodic progress logger.

use std::sync::Arc;

use log::Level;

use crate::schema::{EventField, ProgressEvent};

use super::sink::{LogSink, default_sink};
use super::{Observer, ObserverError};

/// Logs evaluations, a representative objective vector and computing time
/// every `display_frequency` evaluations.
pub struct BasicObserver {
    display_frequency: u64,
    sink: Arc<dyn LogSink>,
}

impl BasicObserver {
    pub fn new(display_frequency: u64) -> Self {
        Self::with_sink(display_frequency, default_sink())
    }

    /// A frequency of 0 is treated as 1.
    pub fn with_sink(display_frequency: u64, sink: Arc<dyn LogSink>) -> Self {
        Self {
            display_frequency: display_frequency.max(1),
            sink,
        }
    }

    pub fn display_frequency(&self) -> u64 {
        self.display_frequency
    }
}

impl Default for BasicObserver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Observer for BasicObserver {
    fn name(&self) -> &str {
        "BasicObserver"
    }

    fn update(&mut self, event: &ProgressEvent) -> Result<(), ObserverError> {
        let computing_time = event
            .computing_time()
            .ok_or(ObserverError::MissingField(EventField::ComputingTime))?;
        let evaluations = event.evaluations();

        if evaluations % self.display_frequency != 0 {
            return Ok(());
        }

        if let Some(first) = event.solutions().first() {
            self.sink.log(
                Level::Info,
                &format!(
                    "Evaluations: {} | Best fitness: {:?} | Computing time: {:.3}s",
                    evaluations,
                    first.objectives,
                    computing_time.as_secs_f64()
                ),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::observe::MemorySink;
    use crate::schema::Solution;

    fn event(evaluations: u64, solutions: Vec<Solution>) -> ProgressEvent {
        ProgressEvent::builder()
            .evaluations(evaluations)
            .computing_time(Duration::from_millis(1500))
            .solutions(solutions)
            .build()
            .unwrap()
    }

    #[test]
    fn test_logs_at_frequency() {
        let sink = MemorySink::new();
        let mut observer = BasicObserver::with_sink(10, sink.clone());

        for evaluations in [5, 10, 15, 20] {
            let front = vec![Solution::from_objectives(vec![evaluations as f64, 1.0])];
            observer.update(&event(evaluations, front)).unwrap();
        }

        let messages = sink.messages(Level::Info);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Evaluations: 10 "));
        assert!(messages[0].contains("[10.0, 1.0]"));
        assert!(messages[0].contains("1.500s"));
        assert!(messages[1].starts_with("Evaluations: 20 "));
    }

    #[test]
    fn test_empty_solutions_do_not_log() {
        let sink = MemorySink::new();
        let mut observer = BasicObserver::with_sink(10, sink.clone());

        observer.update(&event(10, Vec::new())).unwrap();
        observer.update(&event(20, Vec::new())).unwrap();

        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_first_solution_is_representative() {
        let sink = MemorySink::new();
        let mut observer = BasicObserver::with_sink(1, sink.clone());

        let front = vec![
            Solution::from_objectives(vec![0.25, 0.75]),
            Solution::from_objectives(vec![0.75, 0.25]),
        ];
        observer.update(&event(3, front)).unwrap();

        assert!(sink.messages(Level::Info)[0].contains("[0.25, 0.75]"));
    }

    #[test]
    fn test_missing_computing_time() {
        let mut observer = BasicObserver::with_sink(1, MemorySink::new());
        let event = ProgressEvent::builder()
            .evaluations(1)
            .solutions(vec![Solution::from_objectives(vec![1.0])])
            .build()
            .unwrap();

        let err = observer.update(&event).unwrap_err();
        assert!(matches!(
            err,
            ObserverError::MissingField(EventField::ComputingTime)
        ));
    }

    #[test]
    fn test_zero_frequency_clamped() {
        let observer = BasicObserver::with_sink(0, MemorySink::new());
        assert_eq!(observer.display_frequency(), 1);
    }
}
