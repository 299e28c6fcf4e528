//! Output directory preparation shared by file-writing observers.

use std::fs;
use std::io;
use std::path::Path;

use log::Level;

use super::sink::LogSink;

/// Make `directory` an existing, file-free directory.
///
/// Files directly inside an existing directory are deleted (subdirectories
/// are left alone); a missing directory is created with its parents. Both
/// cases are logged at warning level.
pub fn prepare_output_directory(directory: &Path, sink: &dyn LogSink) -> io::Result<()> {
    if directory.is_dir() {
        sink.log(
            Level::Warn,
            &format!(
                "Directory {} exists. Removing contents.",
                directory.display()
            ),
        );
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                fs::remove_file(entry.path())?;
            }
        }
    } else {
        sink.log(
            Level::Warn,
            &format!(
                "Directory {} does not exist. Creating it.",
                directory.display()
            ),
        );
        fs::create_dir_all(directory)?;
    }

    Ok(())
}
