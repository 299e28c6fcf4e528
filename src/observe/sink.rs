//! Logging sinks injected into observers.

use std::sync::{Arc, Mutex, PoisonError};

use log::Level;

/// Log target used by [`LogCrateSink`].
pub const LOG_TARGET: &str = "moea_watch";

/// Destination for observer log lines.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards to the `log` crate facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{message}");
    }
}

/// Keeps log lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All records so far, oldest first.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages logged at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: Level, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

/// The sink observers use unless another is injected.
pub fn default_sink() -> Arc<dyn LogSink> {
    Arc::new(LogCrateSink)
}
