//! Progress bar observer.

use std::io::{self, Stderr, Write};

use crate::schema::ProgressEvent;

use super::{Observer, ObserverError};

/// A visual progress meter.
pub trait Meter: Send {
    /// Move the meter forward by `delta` units.
    fn advance(&mut self, delta: u64) -> io::Result<()>;

    /// Close the meter. Called once.
    fn finish(&mut self) -> io::Result<()>;
}

const BAR_WIDTH: usize = 40;

/// Text bar redrawn in place with a carriage return.
pub struct TextMeter<W: Write + Send> {
    writer: W,
    total: u64,
    position: u64,
    description: String,
}

impl TextMeter<Stderr> {
    pub fn stderr(total: u64, description: impl Into<String>) -> Self {
        Self::new(io::stderr(), total, description)
    }
}

impl<W: Write + Send> TextMeter<W> {
    pub fn new(writer: W, total: u64, description: impl Into<String>) -> Self {
        Self {
            writer,
            total,
            position: 0,
            description: description.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn draw(&mut self) -> io::Result<()> {
        let filled = if self.total == 0 {
            BAR_WIDTH
        } else {
            ((self.position.min(self.total) as f64 / self.total as f64) * BAR_WIDTH as f64) as usize
        };
        write!(
            self.writer,
            "\r{}: [{}{}] {}/{}",
            self.description,
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            self.position,
            self.total
        )?;
        self.writer.flush()
    }
}

impl<W: Write + Send> Meter for TextMeter<W> {
    fn advance(&mut self, delta: u64) -> io::Result<()> {
        self.position = self.position.saturating_add(delta);
        self.draw()
    }

    fn finish(&mut self) -> io::Result<()> {
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

type MeterFactory = Box<dyn FnMut(u64) -> Box<dyn Meter> + Send>;

/// Shows evaluation progress towards `maxx` on a [`Meter`].
///
/// The meter is created on the first event and finished exactly once, when
/// the evaluation count reaches `maxx`. Later events only update the counter.
pub struct ProgressBarObserver {
    progress: u64,
    maxx: u64,
    meter: Option<Box<dyn Meter>>,
    factory: MeterFactory,
    finished: bool,
}

impl ProgressBarObserver {
    /// Progress bar on stderr.
    pub fn new(maxx: u64) -> Self {
        Self::with_meter_factory(maxx, |total| {
            Box::new(TextMeter::stderr(total, "Progress")) as Box<dyn Meter>
        })
    }

    pub fn with_meter_factory<F>(maxx: u64, factory: F) -> Self
    where
        F: FnMut(u64) -> Box<dyn Meter> + Send + 'static,
    {
        Self {
            progress: 0,
            maxx,
            meter: None,
            factory: Box::new(factory),
            finished: false,
        }
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Observer for ProgressBarObserver {
    fn name(&self) -> &str {
        "ProgressBarObserver"
    }

    fn update(&mut self, event: &ProgressEvent) -> Result<(), ObserverError> {
        let evaluations = event.evaluations();
        if self.finished {
            self.progress = self.progress.max(evaluations);
            return Ok(());
        }

        let factory = &mut self.factory;
        let maxx = self.maxx;
        let meter = self.meter.get_or_insert_with(|| factory(maxx));

        let target = evaluations.min(self.maxx);
        let delta = target.saturating_sub(self.progress);
        if delta > 0 {
            meter.advance(delta)?;
        }
        self.progress = self.progress.max(target);

        if self.progress >= self.maxx {
            meter.finish()?;
            self.finished = true;
            self.meter = None;
        }

        Ok(())
    }
}
