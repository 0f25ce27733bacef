//! Archive entry metadata.

use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Permission bits used for entries synthesized without a backing file.
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// Kind of archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file followed by its payload.
    File,

    /// Directory marker, no payload.
    Directory,
}

impl EntryKind {
    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// One archive record.
///
/// `name` is archive-root relative, uses `/` separators and never carries a
/// trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Archive name of the entry.
    pub name: String,

    /// File or directory.
    pub kind: EntryKind,

    /// Payload length in bytes, 0 for directories.
    pub size: u64,

    /// Modification time in seconds since the Unix epoch.
    pub mtime: u64,

    /// Permission bits.
    pub mode: u32,
}

impl Entry {
    /// Returns `true` for directory entries.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns the modification time as a `SystemTime`.
    ///
    /// `None` when the stored seconds do not fit the platform's clock, which
    /// a base-256 header field can encode.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        UNIX_EPOCH.checked_add(Duration::from_secs(self.mtime))
    }
}

/// Seconds since the Unix epoch for `now`, clamped to zero.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
