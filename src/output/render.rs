//! Front renderers used by plotting observers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::schema::Solution;

/// Turns a front into a file.
pub trait FrontRenderer: Send {
    /// Render `front` to a file derived from `stem` and return its path.
    fn render(&mut self, front: &[Solution], label: Option<&str>, stem: &Path)
    -> io::Result<PathBuf>;
}

#[derive(Serialize)]
struct PlotDocument<'a> {
    title: &'a str,
    label: Option<&'a str>,
    points: Vec<&'a [f64]>,
}

/// Writes fronts as JSON scatter data (`<stem>.json`) for an external plotting tool.
#[derive(Debug, Clone)]
pub struct JsonFrontRenderer {
    title: String,
}

impl JsonFrontRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for JsonFrontRenderer {
    fn default() -> Self {
        Self::new("Front approximation")
    }
}

impl FrontRenderer for JsonFrontRenderer {
    fn render(
        &mut self,
        front: &[Solution],
        label: Option<&str>,
        stem: &Path,
    ) -> io::Result<PathBuf> {
        let mut name = stem.as_os_str().to_owned();
        name.push(".json");
        let path = PathBuf::from(name);

        let document = PlotDocument {
            title: &self.title,
            label,
            points: front.iter().map(|s| s.objectives.as_slice()).collect(),
        };

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.flush()?;

        Ok(path)
    }
}
