//! Archive reader.
//!
//! [`ArchiveReader`] is a forward-only cursor over a tar stream. Headers are
//! decoded block by block with `tar::Header`, so the reader can own its
//! source across calls and check every payload against its declared size.
//!
//! The cursor moves through four states:
//!
//! ```text
//! AtHeader --next_entry--> InPayload --(payload consumed)--> AtHeader
//!     \                                                       |
//!      +--zero block or EOF--> Exhausted      malformed --> Corrupt
//! ```
//!
//! `Corrupt` is terminal: once a header or payload fails to decode, every
//! later call reports the same corruption.

mod header;

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tar::Header;
use tracing::debug;
use tracing::warn;

use crate::ArchiveError;
use crate::CompressionCodec;
use crate::Entry;
use crate::EntryKind;
use crate::ExtractionReport;
use crate::PartialExtraction;
use crate::ReaderConfig;
use crate::Result;
use crate::compression::decoder::Decoder;
use crate::io::read_block;
use crate::path::resolve_destination;
use header::Extensions;
use header::Fields;
use header::MAX_EXTENSION_SIZE;
use header::padding;

/// Cap on the buffer reserved up front by [`ArchiveReader::next_as_bytes`].
const MAX_PREALLOC: u64 = 1 << 20;

#[derive(Debug)]
enum State {
    AtHeader,
    InPayload { remaining: u64, padding: u64 },
    Exhausted,
    Corrupt(String),
}

/// An entry materialized on disk by [`ArchiveReader::extract_next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// Destination path under the extraction root.
    pub path: PathBuf,

    /// Header of the extracted entry.
    pub entry: Entry,
}

impl ExtractedEntry {
    /// Returns `true` if a directory was extracted.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.entry.is_dir()
    }
}

/// Reads entries from a tar stream.
///
/// # Examples
///
/// ```no_run
/// use tarkit_core::ArchiveReader;
/// use tarkit_core::ReaderConfig;
///
/// let mut reader = ArchiveReader::open("backup.tar", &ReaderConfig::default())?;
/// while let Some(entry) = reader.next_entry()? {
///     println!("{} {} bytes", entry.name, entry.size);
/// }
/// # Ok::<(), tarkit_core::ArchiveError>(())
/// ```
pub struct ArchiveReader<R: Read> {
    source: Decoder<R>,
    config: ReaderConfig,
    state: State,
}

impl<R: Read> ArchiveReader<R> {
    /// Creates a reader over a plain tar stream.
    pub fn new(source: R) -> Self {
        Self {
            source: Decoder::Plain(BufReader::new(io::Cursor::new(Vec::new()).chain(source))),
            config: ReaderConfig::default(),
            state: State::AtHeader,
        }
    }

    /// Creates a reader with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `CorruptArchive` if a configured codec does not match the
    /// stream's leading bytes.
    pub fn with_config(source: R, config: &ReaderConfig) -> Result<Self> {
        let source = Decoder::new(source, config.compression, config.detect_compression)?;
        Ok(Self {
            source,
            config: config.clone(),
            state: State::AtHeader,
        })
    }

    /// Advances to the next entry.
    ///
    /// Any unread payload of the current entry is skipped first. Returns
    /// `Ok(None)` once the archive is exhausted, and keeps returning it.
    /// Entries other than regular files and directories are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns `CorruptArchive` for a bad checksum, an unparsable field, a
    /// short header or a truncated payload. The reader stays corrupt after
    /// that.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        match &self.state {
            State::Corrupt(reason) => return Err(ArchiveError::CorruptArchive(reason.clone())),
            State::Exhausted => return Ok(None),
            State::AtHeader | State::InPayload { .. } => {}
        }

        match self.advance() {
            Ok(entry) => Ok(entry),
            Err(err) => {
                let reason = err
                    .context()
                    .map_or_else(|| err.to_string(), str::to_string);
                self.state = State::Corrupt(reason);
                Err(err)
            }
        }
    }

    /// Advances and writes the entry under `dest`, or the current directory
    /// when `dest` is `None`.
    ///
    /// Directories are created with their ancestors and left alone if they
    /// already exist. Files get their parent directories created and are
    /// truncated if present.
    ///
    /// # Errors
    ///
    /// - `PathTraversal` if the entry name contains `..`
    /// - `NotADirectory` if a directory entry lands on an existing
    ///   non-directory
    /// - `InvalidArgument` if a file entry resolves to `dest` itself
    /// - any error from [`next_entry`](Self::next_entry) or the filesystem
    pub fn extract_next(&mut self, dest: Option<&Path>) -> Result<Option<ExtractedEntry>> {
        let Some(entry) = self.next_entry()? else {
            return Ok(None);
        };

        let root = dest.unwrap_or_else(|| Path::new(""));
        let (path, is_root) = resolve_destination(root, &entry.name)?;

        match entry.kind {
            EntryKind::Directory => ensure_directory(&path)?,
            EntryKind::File => {
                if is_root {
                    return Err(ArchiveError::InvalidArgument(format!(
                        "file entry {:?} resolves to the extraction root",
                        entry.name
                    )));
                }
                self.write_file(&path, &entry)?;
            }
        }

        debug!(name = %entry.name, path = %path.display(), "extracted entry");
        Ok(Some(ExtractedEntry { path, entry }))
    }

    /// Extracts every remaining entry under `dest`.
    ///
    /// # Errors
    ///
    /// Returns a [`PartialExtraction`] holding what was extracted before the
    /// first failure. Nothing already written is removed.
    pub fn extract_all(
        &mut self,
        dest: Option<&Path>,
    ) -> std::result::Result<ExtractionReport, PartialExtraction> {
        let start = Instant::now();
        let mut report = ExtractionReport::new();

        loop {
            match self.extract_next(dest) {
                Ok(Some(extracted)) => {
                    report.record(&extracted.path, extracted.is_dir(), extracted.entry.size);
                }
                Ok(None) => break,
                Err(error) => {
                    report.duration = start.elapsed();
                    return Err(PartialExtraction { report, error });
                }
            }
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Advances and reads the whole payload into memory.
    ///
    /// Directories come back with an empty buffer.
    ///
    /// # Errors
    ///
    /// Same as [`next_entry`](Self::next_entry).
    pub fn next_as_bytes(&mut self) -> Result<Option<(Entry, Vec<u8>)>> {
        let Some(entry) = self.next_entry()? else {
            return Ok(None);
        };

        let mut data = Vec::new();
        if entry.kind == EntryKind::File {
            let reserve = usize::try_from(entry.size.min(MAX_PREALLOC)).unwrap_or(0);
            data.reserve(reserve);
            self.read_to_end(&mut data).map_err(ArchiveError::from_read)?;
        }
        Ok(Some((entry, data)))
    }

    /// Returns the compression codec in use, if any.
    #[must_use]
    pub const fn codec(&self) -> Option<CompressionCodec> {
        self.source.codec()
    }

    /// Returns `true` once the archive has been read to its end.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    /// Drops the reader, closing the source if the reader owns it.
    pub fn close(self) {
        drop(self.source);
    }

    /// Unwraps the reader, returning the source.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    fn advance(&mut self) -> Result<Option<Entry>> {
        if let State::InPayload { remaining, padding } = self.state {
            // No overflow: padded_len was checked when the entry was read
            self.discard(remaining + padding)?;
            self.state = State::AtHeader;
        }

        let mut extensions = Extensions::default();
        loop {
            let mut header = Header::new_old();
            if !read_block(&mut self.source, header.as_mut_bytes())
                .map_err(ArchiveError::from_read)?
            {
                self.state = State::Exhausted;
                return Ok(None);
            }

            if header::is_zero_block(&header) {
                self.consume_second_zero_block()?;
                self.state = State::Exhausted;
                return Ok(None);
            }

            header::verify_checksum(&header)?;
            let fields = Fields::parse(&header)?;
            let entry_type = header.entry_type();

            if entry_type.is_gnu_longname() {
                extensions.long_name = Some(self.read_extension(fields.size)?);
                continue;
            }
            if entry_type.is_pax_local_extensions() {
                let data = self.read_extension(fields.size)?;
                extensions.apply_pax(&data)?;
                continue;
            }
            if entry_type.is_gnu_longlink() || entry_type.is_pax_global_extensions() {
                self.read_extension(fields.size)?;
                continue;
            }

            let size = extensions.pax_size.unwrap_or(fields.size);
            let occupied = header::padded_len(size)?;
            let name = header::entry_name(&extensions.name(&header))?;

            let kind = if entry_type.is_file() || entry_type.is_contiguous() {
                EntryKind::File
            } else if entry_type.is_dir() {
                EntryKind::Directory
            } else {
                warn!(
                    name = %name,
                    entry_type = ?entry_type,
                    "skipping entry that is neither a regular file nor a directory"
                );
                self.discard(occupied)?;
                extensions = Extensions::default();
                continue;
            };

            let entry = match kind {
                EntryKind::File => {
                    self.state = State::InPayload {
                        remaining: size,
                        padding: padding(size),
                    };
                    Entry {
                        name,
                        kind,
                        size,
                        mtime: fields.mtime,
                        mode: fields.mode,
                    }
                }
                EntryKind::Directory => {
                    self.discard(occupied)?;
                    self.state = State::AtHeader;
                    Entry {
                        name,
                        kind,
                        size: 0,
                        mtime: fields.mtime,
                        mode: fields.mode,
                    }
                }
            };
            return Ok(Some(entry));
        }
    }

    /// The end marker is two zero blocks; a stream cut after the first is
    /// still accepted.
    fn consume_second_zero_block(&mut self) -> Result<()> {
        let mut block = [0u8; 512];
        match read_block(&mut self.source, &mut block) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(()),
            Err(e) => Err(ArchiveError::from_read(e)),
        }
    }

    fn read_extension(&mut self, size: u64) -> Result<Vec<u8>> {
        if size > MAX_EXTENSION_SIZE {
            return Err(ArchiveError::CorruptArchive(format!(
                "extension record of {size} bytes exceeds the {MAX_EXTENSION_SIZE} byte limit"
            )));
        }
        let len = usize::try_from(size)
            .map_err(|_| ArchiveError::CorruptArchive("extension record too large".into()))?;

        let mut data = vec![0u8; len];
        self.source.read_exact(&mut data).map_err(ArchiveError::from_read)?;
        self.discard(padding(size))?;
        Ok(data)
    }

    fn discard(&mut self, len: u64) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.source).take(len), &mut io::sink())
            .map_err(ArchiveError::from_read)?;
        if skipped < len {
            return Err(ArchiveError::CorruptArchive(format!(
                "stream ended {} bytes short of the declared payload",
                len - skipped
            )));
        }
        Ok(())
    }

    fn write_file(&mut self, path: &Path, entry: &Entry) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        io::copy(self, &mut file).map_err(ArchiveError::from_read)?;

        if self.config.preserve_permissions {
            set_permissions(&file, entry.mode)?;
        }
        if self.config.preserve_mtime {
            let modified = entry.modified().ok_or_else(|| {
                ArchiveError::CorruptArchive(format!(
                    "mtime {} of {:?} is out of range",
                    entry.mtime, entry.name
                ))
            })?;
            file.set_modified(modified)?;
        }
        Ok(())
    }
}

impl ArchiveReader<File> {
    /// Opens the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` if `path` does not exist, or
    /// `CorruptArchive` if a configured codec does not match the file.
    pub fn open(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ArchiveError::SourceNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ArchiveError::Io(e)
            }
        })?;
        Self::with_config(file, config)
    }
}

/// Reads the current file entry's payload, never past its declared size.
///
/// Returns 0 between entries and for directories.
impl<R: Read> Read for ArchiveReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = match &mut self.state {
            State::InPayload { remaining, .. } if *remaining > 0 => remaining,
            State::Corrupt(reason) => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, reason.clone()));
            }
            _ => return Ok(0),
        };

        let max = usize::try_from(*remaining).map_or(buf.len(), |r| r.min(buf.len()));
        match self.source.read(&mut buf[..max]) {
            Ok(0) if max > 0 => {
                let reason = format!("payload truncated with {remaining} bytes outstanding");
                self.state = State::Corrupt(reason.clone());
                Err(io::Error::new(io::ErrorKind::UnexpectedEof, reason))
            }
            Ok(n) => {
                *remaining -= n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                self.state = State::Corrupt(e.to_string());
                Err(e)
            }
        }
    }
}

/// Creates `path` as a directory unless one is already there.
fn ensure_directory(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ArchiveError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn set_permissions(file: &File, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode & 0o7777))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_permissions(file: &File, mode: u32) -> Result<()> {
    let mut permissions = file.metadata()?.permissions();
    permissions.set_readonly(mode & 0o200 == 0);
    file.set_permissions(permissions)?;
    Ok(())
}
