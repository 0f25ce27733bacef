//! One-call packing and unpacking of archive files.
//!
//! Each function opens an [`ArchiveWriter`] or [`ArchiveReader`] on a path,
//! drives it to completion and closes it.

use std::path::Path;
use std::time::Instant;

use crate::ArchiveReader;
use crate::ArchiveWriter;
use crate::CompressionCodec;
use crate::ExtractionReport;
use crate::PackReport;
use crate::ReaderConfig;
use crate::Result;
use crate::WriterConfig;

/// Conventional suffix for plain tar archives.
pub const TAR_SUFFIX: &str = ".tar";

/// Conventional suffix for gzip-compressed tar archives.
pub const TAR_GZ_SUFFIX: &str = ".tar.gz";

/// Packs `paths` into a plain tar file at `archive`.
///
/// Directories are added as trees, everything else as single files.
///
/// # Errors
///
/// Returns `SourceNotFound` if any path is missing, or any error from
/// writing the archive. A partly written archive file is left in place.
///
/// # Examples
///
/// ```no_run
/// use tarkit_core::pack;
///
/// let report = pack("backup.tar", &["src", "Cargo.toml"])?;
/// println!("packed {} entries", report.entries);
/// # Ok::<(), tarkit_core::ArchiveError>(())
/// ```
pub fn pack<A: AsRef<Path>, P: AsRef<Path>>(archive: A, paths: &[P]) -> Result<PackReport> {
    pack_with(archive, paths, &WriterConfig::default())
}

/// Packs `paths` into a gzip-compressed tar file at `archive`.
///
/// # Errors
///
/// Same as [`pack`].
pub fn pack_gz<A: AsRef<Path>, P: AsRef<Path>>(archive: A, paths: &[P]) -> Result<PackReport> {
    let config = WriterConfig::default().with_compression(Some(CompressionCodec::Gzip));
    pack_with(archive, paths, &config)
}

/// Packs `paths` into `archive` using `config`.
///
/// # Errors
///
/// Same as [`pack`], plus `InvalidArgument` for an invalid configuration.
pub fn pack_with<A: AsRef<Path>, P: AsRef<Path>>(
    archive: A,
    paths: &[P],
    config: &WriterConfig,
) -> Result<PackReport> {
    let start = Instant::now();
    let mut writer = ArchiveWriter::create(archive, config)?;
    writer.add_paths(paths)?;

    let entries = writer.entries_written();
    let bytes_written = writer.bytes_written();
    writer.close()?;

    Ok(PackReport {
        entries,
        bytes_written,
        duration: start.elapsed(),
    })
}

/// Unpacks the plain tar file at `archive` into `dest`.
///
/// # Errors
///
/// Returns `SourceNotFound` if `archive` is missing, or the first error met
/// while extracting. Entries already extracted stay on disk.
///
/// # Examples
///
/// ```no_run
/// use tarkit_core::unpack;
///
/// let report = unpack("backup.tar", "restore")?;
/// println!("{} files, {} bytes", report.files.len(), report.bytes_written);
/// # Ok::<(), tarkit_core::ArchiveError>(())
/// ```
pub fn unpack<A: AsRef<Path>, D: AsRef<Path>>(archive: A, dest: D) -> Result<ExtractionReport> {
    unpack_with(archive, dest, &ReaderConfig::default())
}

/// Unpacks the gzip-compressed tar file at `archive` into `dest`.
///
/// # Errors
///
/// Same as [`unpack`], plus `CorruptArchive` if the file is not gzip.
pub fn unpack_gz<A: AsRef<Path>, D: AsRef<Path>>(
    archive: A,
    dest: D,
) -> Result<ExtractionReport> {
    let config = ReaderConfig::default().with_compression(Some(CompressionCodec::Gzip));
    unpack_with(archive, dest, &config)
}

/// Unpacks `archive` into `dest` using `config`.
///
/// # Errors
///
/// Same as [`unpack`].
pub fn unpack_with<A: AsRef<Path>, D: AsRef<Path>>(
    archive: A,
    dest: D,
    config: &ReaderConfig,
) -> Result<ExtractionReport> {
    let mut reader = ArchiveReader::open(archive, config)?;
    let report = reader.extract_all(Some(dest.as_ref()))?;
    reader.close();
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pack_unpack_hello_world() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "Hello World").unwrap();
        let archive = temp.path().join(format!("hello{TAR_SUFFIX}"));

        let report = pack(&archive, &[&file]).unwrap();
        assert_eq!(report.entries, 1);

        let out = temp.path().join("out");
        let report = unpack(&archive, &out).unwrap();
        assert_eq!(report.files, vec![out.join("file")]);
        assert_eq!(fs::read_to_string(out.join("file")).unwrap(), "Hello World");
    }

    #[test]
    fn test_pack_gz_unpack_gz() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a"), "1").unwrap();
        let archive = temp.path().join(format!("dir{TAR_GZ_SUFFIX}"));

        pack_gz(&archive, &[&dir]).unwrap();
        let bytes = fs::read(&archive).unwrap();
        assert!(bytes.starts_with(CompressionCodec::Gzip.magic()));

        let out = temp.path().join("out");
        unpack_gz(&archive, &out).unwrap();
        assert_eq!(fs::read_to_string(out.join("dir/a")).unwrap(), "1");
    }

    #[test]
    fn test_unpack_gz_on_plain_tar() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();
        let archive = temp.path().join("plain.tar");
        pack(&archive, &[&file]).unwrap();

        let err = unpack_gz(&archive, temp.path().join("out")).unwrap_err();
        assert!(matches!(err, ArchiveError::CorruptArchive(_)));
    }

    #[test]
    fn test_pack_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = pack(temp.path().join("a.tar"), &[temp.path().join("missing")]).unwrap_err();
        assert!(matches!(err, ArchiveError::SourceNotFound { .. }));
    }

    #[test]
    fn test_unpack_missing_archive() {
        let temp = TempDir::new().unwrap();
        let err = unpack(temp.path().join("missing.tar"), temp.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::SourceNotFound { .. }));
    }
}
