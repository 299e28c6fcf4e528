//! Plain-text front files.
//!
//! One solution per line, values separated by a single space:
//!
//! ```text
//! 0.0 1.0
//! 0.25 0.5
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::schema::{Population, Solution};

/// Errors raised while reading a front file.
#[derive(Debug, thiserror::Error)]
pub enum FrontFileError {
    #[error("Failed to read front file: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid value '{value}' on line {line}")]
    Parse { line: usize, value: String },
    #[error("Line {line} has {actual} values, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

/// Write the objective vectors of `solutions` to `path`.
pub fn write_function_values<P: AsRef<Path>>(path: P, solutions: &[Solution]) -> io::Result<()> {
    write_rows(path, solutions.iter().map(|s| s.objectives.as_slice()))
}

/// Write the decision variables of `solutions` to `path`.
pub fn write_variables<P: AsRef<Path>>(path: P, solutions: &[Solution]) -> io::Result<()> {
    write_rows(path, solutions.iter().map(|s| s.variables.as_slice()))
}

fn write_rows<'a, P, I>(path: P, rows: I) -> io::Result<()>
where
    P: AsRef<Path>,
    I: Iterator<Item = &'a [f64]>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        let mut first = true;
        for value in row {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{value}")?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Read a front file into solutions carrying objectives only.
///
/// Blank lines are skipped; every other line must have the same arity.
pub fn read_front<P: AsRef<Path>>(path: P) -> Result<Population, FrontFileError> {
    let content = fs::read_to_string(path)?;
    let mut front = Population::new();
    let mut arity = None;

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| FrontFileError::Parse {
                    line: line_no,
                    value: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match arity {
            None => arity = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(FrontFileError::Ragged {
                    line: line_no,
                    expected,
                    actual: values.len(),
                });
            }
            Some(_) => {}
        }

        front.push(Solution::from_objectives(values));
    }

    Ok(front)
}
