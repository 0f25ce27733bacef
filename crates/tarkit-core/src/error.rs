//! Error types for archive packing and unpacking.

use std::path::PathBuf;
use thiserror::Error;

use crate::report::ExtractionReport;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while writing or reading an archive stream.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed on the filesystem or the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path handed to the writer does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The archive stream is malformed or truncated.
    #[error("corrupt archive: {0}")]
    CorruptArchive(String),

    /// An entry payload did not match the size declared in its header.
    #[error("payload size mismatch for {name}: declared {declared} bytes, {detail}")]
    SizeMismatch {
        /// Archive name of the entry.
        name: String,
        /// Size written into the entry header.
        declared: u64,
        /// What the source actually delivered.
        detail: String,
    },

    /// The writer holds an incomplete entry and cannot continue.
    #[error("archive stream is incomplete after an earlier failure: {reason}")]
    Poisoned {
        /// Description of the failure that left the stream incomplete.
        reason: String,
    },

    /// A call was made with an argument that cannot be honoured.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An entry name would resolve outside the extraction root.
    #[error("path traversal detected: {name}")]
    PathTraversal {
        /// The offending entry name.
        name: String,
    },

    /// A directory entry collides with an existing non-directory.
    #[error("cannot create directory, path exists and is not a directory: {path}")]
    NotADirectory {
        /// The destination path.
        path: PathBuf,
    },
}

impl ArchiveError {
    /// Returns `true` if this error means the archive bytes themselves are bad.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarkit_core::ArchiveError;
    ///
    /// let err = ArchiveError::CorruptArchive("bad checksum".to_string());
    /// assert!(err.is_corruption());
    ///
    /// let err = ArchiveError::InvalidArgument("empty name".to_string());
    /// assert!(!err.is_corruption());
    /// ```
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptArchive(_) | Self::SizeMismatch { .. })
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarkit_core::ArchiveError;
    ///
    /// let err = ArchiveError::CorruptArchive("truncated header".to_string());
    /// assert_eq!(err.context(), Some("truncated header"));
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::CorruptArchive(msg) | Self::InvalidArgument(msg) => Some(msg),
            Self::Poisoned { reason } => Some(reason),
            Self::SizeMismatch { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Maps a stream read failure onto the archive taxonomy.
    ///
    /// Decoders report malformed input as `InvalidData` or `InvalidInput`,
    /// and short streams surface as `UnexpectedEof`; all mean the archive is
    /// corrupt.
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::InvalidData
            | std::io::ErrorKind::InvalidInput
            | std::io::ErrorKind::UnexpectedEof => Self::CorruptArchive(err.to_string()),
            _ => Self::Io(err),
        }
    }
}

/// A bulk extraction that stopped part way.
///
/// Carries everything extracted before the failing entry so callers can
/// inspect or clean up partial output.
#[derive(Error, Debug)]
#[error("extraction stopped after {} entries: {error}", report.total_items())]
pub struct PartialExtraction {
    /// Entries materialized before the failure.
    pub report: ExtractionReport,

    /// The failure that stopped extraction.
    #[source]
    pub error: ArchiveError,
}

impl From<PartialExtraction> for ArchiveError {
    fn from(partial: PartialExtraction) -> Self {
        partial.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiveError::CorruptArchive("bad checksum".into());
        assert_eq!(err.to_string(), "corrupt archive: bad checksum");
    }

    #[test]
    fn test_source_not_found_display() {
        let err = ArchiveError::SourceNotFound {
            path: PathBuf::from("missing.txt"),
        };
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = ArchiveError::SizeMismatch {
            name: "file".into(),
            declared: 11,
            detail: "source ended after 4 bytes".into(),
        };
        let display = err.to_string();
        assert!(display.contains("file"));
        assert!(display.contains("11"));
        assert!(display.contains("after 4 bytes"));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ArchiveError = io_err.into();
        assert!(matches!(err, ArchiveError::Io(_)));
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_from_read_classifies_kinds() {
        let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert!(matches!(
            ArchiveError::from_read(eof),
            ArchiveError::CorruptArchive(_)
        ));

        let invalid = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad deflate");
        assert!(matches!(
            ArchiveError::from_read(invalid),
            ArchiveError::CorruptArchive(_)
        ));

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(ArchiveError::from_read(denied), ArchiveError::Io(_)));
    }

    #[test]
    fn test_context() {
        let err = ArchiveError::Poisoned {
            reason: "short payload".into(),
        };
        assert_eq!(err.context(), Some("short payload"));

        let err = ArchiveError::PathTraversal {
            name: "../etc/passwd".into(),
        };
        assert_eq!(err.context(), None);
    }

    #[test]
    fn test_partial_extraction_into_error() {
        let partial = PartialExtraction {
            report: ExtractionReport::default(),
            error: ArchiveError::CorruptArchive("truncated".into()),
        };
        assert!(partial.to_string().contains("after 0 entries"));

        let err: ArchiveError = partial.into();
        assert!(err.is_corruption());
    }
}
