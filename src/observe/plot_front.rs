//! Renders fronts to files, with IGD gating for dynamic problems.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compute::InvertedGenerationalDistance;
use crate::output::{FrontRenderer, JsonFrontRenderer};
use crate::schema::{
    DEFAULT_IGD_THRESHOLD, DEFAULT_INITIAL_IGD, EventField, Population, ProgressEvent, Solution,
};

use super::output_dir::prepare_output_directory;
use super::sink::{LogSink, default_sink};
use super::{Observer, ObserverError};

/// Plots fronts into a directory.
///
/// For static problems every event is rendered as `<prefix>-<evaluations>`,
/// even one with no solutions. For dynamic problems only non-empty events
/// with the termination flag set are
/// considered: the front is compared with the previous one by IGD and
/// rendered as `<prefix>-<counter>` only when the distance exceeds
/// `igd_threshold`. Rendered fronts accumulate, so each plot shows every
/// front that moved enough to be drawn.
pub struct PlotFrontToFileObserver<R: FrontRenderer = JsonFrontRenderer> {
    directory: PathBuf,
    renderer: R,
    prefix: String,
    last_front: Population,
    fronts: Population,
    counter: u64,
    igd_threshold: f64,
    initial_igd: f64,
    sink: Arc<dyn LogSink>,
}

impl PlotFrontToFileObserver<JsonFrontRenderer> {
    pub fn new(directory: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_renderer(directory, JsonFrontRenderer::default(), default_sink())
    }
}

impl<R: FrontRenderer> PlotFrontToFileObserver<R> {
    /// Empties (or creates) `directory` and logs through `sink`.
    pub fn with_renderer(
        directory: impl AsRef<Path>,
        renderer: R,
        sink: Arc<dyn LogSink>,
    ) -> io::Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        prepare_output_directory(&directory, sink.as_ref())?;
        Ok(Self {
            directory,
            renderer,
            prefix: "front".to_string(),
            last_front: Vec::new(),
            fronts: Vec::new(),
            counter: 0,
            igd_threshold: DEFAULT_IGD_THRESHOLD,
            initial_igd: DEFAULT_INITIAL_IGD,
            sink,
        })
    }

    #[must_use]
    pub fn with_igd_threshold(mut self, threshold: f64) -> Self {
        self.igd_threshold = threshold;
        self
    }

    /// Distance assumed for the first dynamic front, which has nothing to compare against.
    #[must_use]
    pub fn with_initial_igd(mut self, initial_igd: f64) -> Self {
        self.initial_igd = initial_igd;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn last_front(&self) -> &[Solution] {
        &self.last_front
    }

    /// All fronts rendered so far in the dynamic branch.
    pub fn plotted(&self) -> &[Solution] {
        &self.fronts
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn stem(&self, index: u64) -> PathBuf {
        self.directory.join(format!("{}-{}", self.prefix, index))
    }

    fn update_dynamic(&mut self, event: &ProgressEvent, label: &str) -> Result<(), ObserverError> {
        let solutions = event.solutions();
        if solutions.is_empty() || event.termination_criterion_is_met() != Some(true) {
            return Ok(());
        }

        let igd = if self.counter > 0 {
            InvertedGenerationalDistance::new(&self.last_front).compute(solutions)
        } else {
            self.initial_igd
        };

        if igd > self.igd_threshold {
            self.fronts.extend_from_slice(solutions);
            let stem = self.stem(self.counter);
            let path = self.renderer.render(&self.fronts, Some(label), &stem)?;
            self.sink.log(
                log::Level::Debug,
                &format!("IGD {igd:.6} above threshold, plotted {}", path.display()),
            );
        }

        self.counter += 1;
        self.last_front = solutions.to_vec();
        Ok(())
    }
}

impl<R: FrontRenderer> Observer for PlotFrontToFileObserver<R> {
    fn name(&self) -> &str {
        "PlotFrontToFileObserver"
    }

    fn update(&mut self, event: &ProgressEvent) -> Result<(), ObserverError> {
        let problem = event
            .problem()
            .ok_or(ObserverError::MissingField(EventField::Problem))?;

        if problem.dynamic {
            return self.update_dynamic(event, &problem.name);
        }

        let stem = self.stem(event.evaluations());
        self.renderer.render(event.solutions(), None, &stem)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::observe::MemorySink;
    use crate::schema::ProblemInfo;
    use tempfile::tempdir;

    /// Records render calls instead of writing files.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<(PathBuf, usize, Option<String>)>,
    }

    impl FrontRenderer for RecordingRenderer {
        fn render(
            &mut self,
            front: &[Solution],
            label: Option<&str>,
            stem: &Path,
        ) -> io::Result<PathBuf> {
            self.calls
                .push((stem.to_path_buf(), front.len(), label.map(str::to_string)));
            Ok(stem.to_path_buf())
        }
    }

    fn front(points: &[(f64, f64)]) -> Vec<Solution> {
        points
            .iter()
            .map(|&(a, b)| Solution::from_objectives(vec![a, b]))
            .collect()
    }

    fn event(evaluations: u64, solutions: Vec<Solution>, dynamic: bool, met: bool) -> ProgressEvent {
        ProgressEvent::builder()
            .evaluations(evaluations)
            .solutions(solutions)
            .problem(ProblemInfo::new("FDA2", dynamic))
            .termination_criterion_is_met(met)
            .build()
            .unwrap()
    }

    fn observer(dir: &Path) -> PlotFrontToFileObserver<RecordingRenderer> {
        PlotFrontToFileObserver::with_renderer(dir, RecordingRenderer::default(), MemorySink::new())
            .unwrap()
    }

    #[test]
    fn test_dynamic_gating() {
        let dir = tempdir().unwrap();
        let mut observer = observer(dir.path());

        let first = front(&[(0.0, 1.0), (0.5, 0.5), (1.0, 0.0)]);
        observer.update(&event(100, first, true, true)).unwrap();
        assert_eq!(observer.renderer().calls.len(), 1);
        assert_eq!(observer.renderer().calls[0].0, dir.path().join("front-0"));
        assert_eq!(observer.renderer().calls[0].2.as_deref(), Some("FDA2"));

        // Every point moves by 0.001, well below the threshold.
        let second = front(&[(0.001, 1.0), (0.501, 0.5), (1.001, 0.0)]);
        observer.update(&event(200, second.clone(), true, true)).unwrap();
        assert_eq!(observer.renderer().calls.len(), 1);
        assert_eq!(observer.counter(), 2);
        assert_eq!(observer.last_front(), second.as_slice());
        assert_eq!(observer.plotted().len(), 3);

        let moved = front(&[(0.0, 2.0), (1.0, 1.0), (2.0, 0.0)]);
        observer.update(&event(300, moved, true, true)).unwrap();
        assert_eq!(observer.renderer().calls.len(), 2);
        assert_eq!(observer.renderer().calls[1].0, dir.path().join("front-2"));
        assert_eq!(observer.renderer().calls[1].1, 6);
    }

    #[test]
    fn test_dynamic_waits_for_termination_flag() {
        let dir = tempdir().unwrap();
        let mut observer = observer(dir.path());

        observer
            .update(&event(100, front(&[(0.0, 1.0)]), true, false))
            .unwrap();

        assert!(observer.renderer().calls.is_empty());
        assert_eq!(observer.counter(), 0);
    }

    #[test]
    fn test_configurable_threshold() {
        let dir = tempdir().unwrap();
        let mut observer = observer(dir.path()).with_igd_threshold(2.0);

        observer
            .update(&event(100, front(&[(0.0, 1.0)]), true, true))
            .unwrap();

        assert!(observer.renderer().calls.is_empty());
        assert_eq!(observer.counter(), 1);
    }

    #[test]
    fn test_static_renders_every_event() {
        let dir = tempdir().unwrap();
        let mut observer = observer(dir.path());

        for evaluations in [100, 200] {
            observer
                .update(&event(evaluations, front(&[(0.0, 1.0), (1.0, 0.0)]), false, false))
                .unwrap();
        }

        let calls = &observer.renderer().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, dir.path().join("front-100"));
        assert_eq!(calls[1].0, dir.path().join("front-200"));
        assert_eq!(calls[1].2, None);
    }

    #[test]
    fn test_static_renders_empty_front() {
        let dir = tempdir().unwrap();
        let mut observer = observer(dir.path());

        observer.update(&event(40, Vec::new(), false, false)).unwrap();

        let calls = &observer.renderer().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, dir.path().join("front-40"));
        assert_eq!(calls[0].1, 0);
    }

    #[test]
    fn test_dynamic_ignores_empty_front() {
        let dir = tempdir().unwrap();
        let mut observer = observer(dir.path());

        observer.update(&event(40, Vec::new(), true, true)).unwrap();

        assert!(observer.renderer().calls.is_empty());
        assert_eq!(observer.counter(), 0);
    }

    #[test]
    fn test_missing_problem() {
        let dir = tempdir().unwrap();
        let mut observer = observer(dir.path());
        let event = ProgressEvent::builder()
            .evaluations(1)
            .solutions(front(&[(0.0, 1.0)]))
            .build()
            .unwrap();

        assert!(matches!(
            observer.update(&event),
            Err(ObserverError::MissingField(EventField::Problem))
        ));
    }

    #[test]
    fn test_json_renderer_writes_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("old.json"), "{}").unwrap();
        let mut observer = PlotFrontToFileObserver::new(dir.path())
            .unwrap()
            .with_prefix("zdt1");

        observer
            .update(&event(50, front(&[(0.0, 1.0)]), false, false))
            .unwrap();

        assert!(!dir.path().join("old.json").exists());
        assert!(dir.path().join("zdt1-50.json").is_file());
    }
}
