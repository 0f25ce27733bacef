//! Error conversion utilities for CLI.
//!
//! Converts tarkit-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use tarkit_core::ArchiveError;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::SourceNotFound { path } => {
            anyhow!(
                "No such file or directory: '{}'\n\
                 HINT: Check the path; sources and archives are resolved from the current directory.",
                path.display()
            )
        }
        ArchiveError::CorruptArchive(reason) => {
            anyhow!(
                "Corrupt archive '{}': {}\n\
                 HINT: The file may be truncated, or use a different compression than expected. \
                 Try --compression to name it explicitly.",
                archive.display(),
                reason
            )
        }
        ArchiveError::PathTraversal { name } => {
            anyhow!(
                "Security violation: Archive '{}' contains entry '{}' that escapes the output directory\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                name
            )
        }
        ArchiveError::NotADirectory { path } => {
            anyhow!(
                "Cannot unpack '{}': '{}' exists and is not a directory\n\
                 HINT: Remove the conflicting file or choose another output directory.",
                archive.display(),
                path.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, archive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_path_traversal_error() {
        let err = ArchiveError::PathTraversal {
            name: "../../etc/passwd".into(),
        };
        let converted = convert_archive_error(err, Path::new("malicious.tar"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("escapes the output directory"));
        assert!(msg.contains("malicious.tar"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_corrupt_archive_error() {
        let err = ArchiveError::CorruptArchive("header checksum mismatch".into());
        let converted = convert_archive_error(err, Path::new("broken.tar.gz"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("header checksum mismatch"));
        assert!(msg.contains("--compression"));
    }

    #[test]
    fn test_convert_source_not_found() {
        let err = ArchiveError::SourceNotFound {
            path: PathBuf::from("missing.txt"),
        };
        let converted = convert_archive_error(err, Path::new("out.tar"));
        assert!(format!("{converted:?}").contains("missing.txt"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let converted = convert_archive_error(ArchiveError::Io(io_err), Path::new("a.tar"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
    }

    #[test]
    fn test_other_errors_keep_context() {
        let err = ArchiveError::InvalidArgument("compression level 12 out of range".into());
        let converted = convert_archive_error(err, Path::new("a.tar"));
        let msg = format!("{converted:#}");
        assert!(msg.contains("a.tar"));
        assert!(msg.contains("compression level 12"));
    }
}
