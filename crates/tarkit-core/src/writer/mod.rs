//! Archive writer.
//!
//! [`ArchiveWriter`] appends entries onto a sink through an optional
//! compression filter. The layering is, from the outside in:
//!
//! ```text
//! tar::Builder -> CountingWriter -> Encoder (optional codec) -> sink
//! ```
//!
//! Every payload is copied through an exact-length reader, so the bytes that
//! follow a header always match the size it declares. A source that delivers
//! fewer or more bytes than declared fails the call with
//! [`ArchiveError::SizeMismatch`] and poisons the writer.

mod walker;

use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tar::EntryType;
use tar::Header;
use tar::HeaderMode;
use tracing::debug;
use tracing::warn;

use crate::ArchiveError;
use crate::CompressionCodec;
use crate::EntryKind;
use crate::Result;
use crate::WriterConfig;
use crate::compression::encoder::Encoder;
use crate::entry::DEFAULT_FILE_MODE;
use crate::entry::unix_now;
use crate::io::CountingWriter;
use crate::io::ExactReader;
use crate::path::base_name;

/// Modification time stamped on every entry in deterministic mode.
///
/// Matches the `tar` crate's `HeaderMode::Deterministic` timestamp.
pub const DETERMINISTIC_MTIME: u64 = 1_153_704_088;

/// Writes entries into a tar stream.
///
/// # Examples
///
/// ```
/// use tarkit_core::ArchiveReader;
/// use tarkit_core::ArchiveWriter;
///
/// let mut writer = ArchiveWriter::new(Vec::new());
/// writer.add_bytes("file", b"Hello World")?;
/// let archive = writer.into_inner()?;
///
/// let mut reader = ArchiveReader::new(archive.as_slice());
/// let (entry, data) = reader.next_as_bytes()?.unwrap();
/// assert_eq!(entry.name, "file");
/// assert_eq!(data, b"Hello World");
/// # Ok::<(), tarkit_core::ArchiveError>(())
/// ```
pub struct ArchiveWriter<W: Write> {
    builder: tar::Builder<CountingWriter<Encoder<W>>>,
    config: WriterConfig,
    poisoned: Option<String>,
    entries_written: u64,
}

impl<W: Write> ArchiveWriter<W> {
    /// Creates a writer producing plain tar into `sink`.
    pub fn new(sink: W) -> Self {
        Self::from_encoder(Encoder::Plain(sink), WriterConfig::default())
    }

    /// Creates a writer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an invalid configuration, or an I/O
    /// error if the compression filter cannot be set up.
    pub fn with_config(sink: W, config: &WriterConfig) -> Result<Self> {
        config.validate()?;
        let encoder = Encoder::new(sink, config.compression, config.compression_level)?;
        Ok(Self::from_encoder(encoder, config.clone()))
    }

    fn from_encoder(encoder: Encoder<W>, config: WriterConfig) -> Self {
        Self {
            builder: tar::Builder::new(CountingWriter::new(encoder)),
            config,
            poisoned: None,
            entries_written: 0,
        }
    }

    /// Adds one regular file, named by its final path component.
    ///
    /// Symlinks are followed.
    ///
    /// # Errors
    ///
    /// - `SourceNotFound` if `path` does not exist
    /// - `InvalidArgument` if `path` is not a regular file or has no file
    ///   name
    /// - `SizeMismatch` if the file changes length while being read
    /// - `Poisoned` if an earlier call left the stream incomplete
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_usable()?;
        let path = path.as_ref();
        let metadata = source_metadata(path)?;

        if metadata.is_dir() {
            return Err(ArchiveError::InvalidArgument(format!(
                "{} is a directory, use add_tree",
                path.display()
            )));
        }
        if !metadata.is_file() {
            return Err(ArchiveError::InvalidArgument(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        let name = base_name(path)?.ok_or_else(|| {
            ArchiveError::InvalidArgument(format!("{} has no file name", path.display()))
        })?;

        let file = File::open(path)?;
        let mut header = self.header_from_metadata(&metadata, EntryKind::File);
        self.append_exact(&mut header, name, metadata.len(), file)
    }

    /// Adds a directory and everything beneath it.
    ///
    /// The walk is sorted by file name, and each directory is written before
    /// its contents. Entries written before a failure stay in the stream.
    ///
    /// # Errors
    ///
    /// - `SourceNotFound` if `dir` does not exist
    /// - `InvalidArgument` if `dir` is not a directory
    /// - any error from reading a file or writing its entry
    pub fn add_tree(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        self.ensure_usable()?;
        let dir = dir.as_ref();
        let metadata = source_metadata(dir)?;

        if !metadata.is_dir() {
            return Err(ArchiveError::InvalidArgument(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let plan = walker::plan_tree(dir, self.config.follow_symlinks)?;
        debug!(root = %dir.display(), entries = plan.len(), "walked tree");

        for planned in plan {
            let mut header = self.header_from_metadata(&planned.metadata, planned.kind);
            match planned.kind {
                EntryKind::Directory => {
                    self.append_exact(&mut header, &planned.name, 0, io::empty())?;
                }
                EntryKind::File => {
                    let file = File::open(&planned.path)?;
                    let size = planned.metadata.len();
                    self.append_exact(&mut header, &planned.name, size, file)?;
                }
            }
        }
        Ok(())
    }

    /// Adds an in-memory file under `name`.
    ///
    /// The name is used verbatim. The entry gets mode `0o666` and the
    /// current time as its modification time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty name or one the tar header
    /// cannot carry (absolute, or containing `..`).
    pub fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.add_reader(name, data.len() as u64, data)
    }

    /// Adds a file under `name` whose payload is streamed from `reader`.
    ///
    /// `reader` must yield exactly `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if `reader` yields fewer or more than `size`
    /// bytes, after which the writer is poisoned.
    pub fn add_reader<R: Read>(&mut self, name: &str, size: u64, reader: R) -> Result<()> {
        self.ensure_usable()?;
        if name.is_empty() {
            return Err(ArchiveError::InvalidArgument(
                "entry name must not be empty".to_string(),
            ));
        }

        let mtime = if self.config.deterministic {
            DETERMINISTIC_MTIME
        } else {
            unix_now()
        };

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(DEFAULT_FILE_MODE);
        header.set_mtime(mtime);
        header.set_size(size);
        self.append_exact(&mut header, name, size, reader)
    }

    /// Adds each path, as a tree if it is a directory and as a file
    /// otherwise.
    ///
    /// Every path is checked for existence before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` for the first missing path, or any error
    /// from `add_tree`/`add_file`.
    pub fn add_paths<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.ensure_usable()?;
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();

        let mut is_dir = Vec::with_capacity(paths.len());
        for path in &paths {
            is_dir.push(source_metadata(path)?.is_dir());
        }

        for (path, is_dir) in paths.iter().zip(is_dir) {
            if is_dir {
                self.add_tree(path)?;
            } else {
                self.add_file(path)?;
            }
        }
        Ok(())
    }

    /// Pushes buffered bytes through the compression filter and the sink.
    ///
    /// Block padding is written with each entry, so after `flush` every
    /// completed entry is readable from the sink.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if an earlier call left the stream incomplete, or
    /// the I/O error from flushing.
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_usable()?;
        self.builder.get_mut().flush()?;
        Ok(())
    }

    /// Writes the end-of-archive marker, finishes the compression filter and
    /// closes the sink.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if an earlier call left the stream incomplete.
    pub fn close(self) -> Result<()> {
        self.into_inner().map(drop)
    }

    /// Like [`close`](Self::close), but hands the sink back.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if an earlier call left the stream incomplete, or
    /// the I/O error from writing the footer or the codec trailer.
    pub fn into_inner(self) -> Result<W> {
        if let Some(reason) = self.poisoned {
            return Err(ArchiveError::Poisoned { reason });
        }

        let counting = self.builder.into_inner()?;
        let tar_bytes = counting.total_bytes();
        let mut sink = counting.into_inner().finish()?;
        sink.flush()?;

        debug!(
            entries = self.entries_written,
            bytes = tar_bytes,
            "archive finished"
        );
        Ok(sink)
    }

    /// Returns the number of entries written so far.
    #[must_use]
    pub const fn entries_written(&self) -> u64 {
        self.entries_written
    }

    /// Returns the number of uncompressed tar bytes emitted so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.builder.get_ref().total_bytes()
    }

    /// Returns the compression codec in use, if any.
    #[must_use]
    pub fn codec(&self) -> Option<CompressionCodec> {
        self.builder.get_ref().get_ref().codec()
    }

    /// Returns `true` once a failure has left the stream incomplete.
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    fn ensure_usable(&self) -> Result<()> {
        match &self.poisoned {
            Some(reason) => Err(ArchiveError::Poisoned {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn poison(&mut self, err: ArchiveError) -> ArchiveError {
        warn!(error = %err, "archive stream left incomplete");
        self.poisoned = Some(err.to_string());
        err
    }

    fn header_from_metadata(&self, metadata: &fs::Metadata, kind: EntryKind) -> Header {
        let mut header = Header::new_gnu();
        header.set_metadata_in_mode(metadata, header_mode(&self.config));
        match kind {
            EntryKind::File => {
                header.set_entry_type(EntryType::Regular);
                header.set_size(metadata.len());
            }
            EntryKind::Directory => {
                header.set_entry_type(EntryType::Directory);
                header.set_size(0);
            }
        }
        header
    }

    /// Appends one entry whose payload must be exactly `size` bytes.
    ///
    /// A failure that emitted no bytes leaves the stream intact; any other
    /// failure poisons the writer.
    fn append_exact<R: Read>(
        &mut self,
        header: &mut Header,
        name: &str,
        size: u64,
        source: R,
    ) -> Result<()> {
        let before = self.bytes_written();
        let mut exact = ExactReader::new(source, size);

        if let Err(err) = self.builder.append_data(header, name, &mut exact) {
            if exact.is_short() {
                let mismatch = ArchiveError::SizeMismatch {
                    name: name.to_string(),
                    declared: size,
                    detail: format!("source ended after {} bytes", exact.delivered()),
                };
                return Err(self.poison(mismatch));
            }
            if self.bytes_written() != before {
                return Err(self.poison(err.into()));
            }
            return Err(header_error(name, err));
        }

        if exact.has_trailing_data()? {
            let mismatch = ArchiveError::SizeMismatch {
                name: name.to_string(),
                declared: size,
                detail: "source has more bytes than declared".to_string(),
            };
            return Err(self.poison(mismatch));
        }

        self.entries_written += 1;
        debug!(name, size, "added entry");
        Ok(())
    }
}

impl ArchiveWriter<File> {
    /// Creates `path` and returns a writer that owns it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an invalid configuration, or an I/O
    /// error if the file cannot be created.
    pub fn create(path: impl AsRef<Path>, config: &WriterConfig) -> Result<Self> {
        config.validate()?;
        let file = File::create(path.as_ref())?;
        Self::with_config(file, config)
    }
}

fn header_mode(config: &WriterConfig) -> HeaderMode {
    if config.deterministic {
        HeaderMode::Deterministic
    } else {
        HeaderMode::Complete
    }
}

/// Stats a source path, following symlinks.
fn source_metadata(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ArchiveError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArchiveError::Io(e)
        }
    })
}

/// The header was rejected before anything reached the stream.
fn header_error(name: &str, err: io::Error) -> ArchiveError {
    if err.kind() == io::ErrorKind::Other || err.kind() == io::ErrorKind::InvalidInput {
        ArchiveError::InvalidArgument(format!("cannot store entry name {name:?}: {err}"))
    } else {
        ArchiveError::Io(err)
    }
}
