//! Writes each published front to a numbered `FUN.<n>` file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::output::write_function_values;
use crate::schema::ProgressEvent;

use super::output_dir::prepare_output_directory;
use super::sink::{LogSink, default_sink};
use super::{Observer, ObserverError};

/// Snapshots objective vectors into `<directory>/FUN.<counter>`.
///
/// Construction empties (or creates) the directory. One writer per directory.
pub struct WriteFrontToFileObserver {
    directory: PathBuf,
    counter: u64,
}

impl WriteFrontToFileObserver {
    pub fn new(directory: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_sink(directory, default_sink())
    }

    pub fn with_sink(directory: impl AsRef<Path>, sink: Arc<dyn LogSink>) -> io::Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        prepare_output_directory(&directory, sink.as_ref())?;
        Ok(Self {
            directory,
            counter: 0,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of files written so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }
}

impl Observer for WriteFrontToFileObserver {
    fn name(&self) -> &str {
        "WriteFrontToFileObserver"
    }

    fn update(&mut self, event: &ProgressEvent) -> Result<(), ObserverError> {
        let solutions = event.solutions();
        if solutions.is_empty() {
            return Ok(());
        }

        let path = self.directory.join(format!("FUN.{}", self.counter));
        write_function_values(&path, solutions)?;
        self.counter += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::observe::MemorySink;
    use crate::schema::Solution;
    use tempfile::tempdir;

    fn event(solutions: Vec<Solution>) -> ProgressEvent {
        ProgressEvent::builder()
            .evaluations(100)
            .solutions(solutions)
            .build()
            .unwrap()
    }

    #[test]
    fn test_existing_directory_emptied_on_construction() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("FUN.0"), "stale\n").unwrap();
        fs::write(dir.path().join("FUN.1"), "stale\n").unwrap();

        let observer = WriteFrontToFileObserver::with_sink(dir.path(), MemorySink::new()).unwrap();

        assert_eq!(fs::read_dir(observer.directory()).unwrap().count(), 0);
        assert_eq!(observer.counter(), 0);
    }

    #[test]
    fn test_writes_numbered_files() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("fronts");
        let mut observer = WriteFrontToFileObserver::with_sink(&target, MemorySink::new()).unwrap();

        observer
            .update(&event(vec![Solution::from_objectives(vec![0.0, 1.0])]))
            .unwrap();
        observer
            .update(&event(vec![
                Solution::from_objectives(vec![0.5, 0.5]),
                Solution::from_objectives(vec![1.0, 0.0]),
            ]))
            .unwrap();

        assert_eq!(observer.counter(), 2);
        assert_eq!(fs::read_to_string(target.join("FUN.0")).unwrap(), "0 1\n");
        assert_eq!(
            fs::read_to_string(target.join("FUN.1")).unwrap(),
            "0.5 0.5\n1 0\n"
        );
    }

    #[test]
    fn test_empty_solutions_skip_file_and_counter() {
        let dir = tempdir().unwrap();
        let mut observer = WriteFrontToFileObserver::with_sink(dir.path(), MemorySink::new()).unwrap();

        observer.update(&event(Vec::new())).unwrap();

        assert_eq!(observer.counter(), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
