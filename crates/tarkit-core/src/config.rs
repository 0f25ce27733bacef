//! Writer and reader configuration.

use crate::ArchiveError;
use crate::CompressionCodec;
use crate::Result;

/// Configuration for [`ArchiveWriter`](crate::ArchiveWriter).
///
/// # Examples
///
/// ```
/// use tarkit_core::CompressionCodec;
/// use tarkit_core::WriterConfig;
///
/// let config = WriterConfig::default()
///     .with_compression(Some(CompressionCodec::Gzip))
///     .with_compression_level(9)
///     .with_deterministic(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression filter wrapped around the tar stream.
    ///
    /// Default: `None` (plain tar).
    pub compression: Option<CompressionCodec>,

    /// Compression level (1-9), `None` for the codec default.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Normalize ownership and timestamps so identical trees produce
    /// identical archives.
    ///
    /// Default: `false`.
    pub deterministic: bool,

    /// Archive the targets of symlinks met during a tree walk.
    ///
    /// When `false`, symlinks are skipped with a warning since the entry
    /// model only carries files and directories.
    ///
    /// Default: `true`.
    pub follow_symlinks: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: None,
            compression_level: None,
            deterministic: false,
            follow_symlinks: true,
        }
    }
}

impl WriterConfig {
    /// Creates a new `WriterConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, codec: Option<CompressionCodec>) -> Self {
        self.compression = codec;
        self
    }

    /// Sets the compression level.
    ///
    /// Out-of-range levels are reported by [`validate`](Self::validate).
    #[must_use]
    pub const fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether headers are normalized for reproducible output.
    #[must_use]
    pub const fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Sets whether symlinks are followed during tree walks.
    #[must_use]
    pub const fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a compression level is set outside 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::InvalidArgument(format!(
                "compression level must be 1-9, got {level}"
            )));
        }
        Ok(())
    }
}

/// Configuration for [`ArchiveReader`](crate::ArchiveReader).
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Compression filter expected around the tar stream.
    ///
    /// Default: `None`.
    pub compression: Option<CompressionCodec>,

    /// Sniff the codec from the stream's magic bytes when `compression` is
    /// `None`.
    ///
    /// Default: `false`.
    pub detect_compression: bool,

    /// Apply the entry's permission bits to extracted files (Unix only).
    ///
    /// Default: `false`.
    pub preserve_permissions: bool,

    /// Apply the entry's modification time to extracted files.
    ///
    /// Default: `false`.
    pub preserve_mtime: bool,
}

impl ReaderConfig {
    /// Creates a new `ReaderConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, codec: Option<CompressionCodec>) -> Self {
        self.compression = codec;
        self
    }

    /// Sets whether the codec is detected from the stream.
    #[must_use]
    pub const fn with_detect_compression(mut self, detect: bool) -> Self {
        self.detect_compression = detect;
        self
    }

    /// Sets whether permission bits are applied on extraction.
    #[must_use]
    pub const fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets whether modification times are applied on extraction.
    #[must_use]
    pub const fn with_preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }
}
