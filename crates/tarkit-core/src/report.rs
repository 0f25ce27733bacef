//! Pack and unpack reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of a bulk extraction.
///
/// Paths are the resolved destinations, in archive order.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Files written to disk.
    pub files: Vec<PathBuf>,

    /// Directories created or found already present.
    pub directories: Vec<PathBuf>,

    /// Total payload bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one extracted entry.
    pub(crate) fn record(&mut self, path: &Path, is_dir: bool, bytes: u64) {
        if is_dir {
            self.directories.push(path.to_path_buf());
        } else {
            self.files.push(path.to_path_buf());
            self.bytes_written += bytes;
        }
    }

    /// Returns total number of entries extracted.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files.len() + self.directories.len()
    }
}

/// Report of a one-call pack.
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Entries written, directories included.
    pub entries: u64,

    /// Uncompressed tar bytes written, footer excluded.
    pub bytes_written: u64,

    /// Duration of the pack.
    pub duration: Duration,
}
