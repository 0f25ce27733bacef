//! Compression filters layered beneath the tar container.
//!
//! The writer wraps its sink in an [`encoder::Encoder`] and the reader wraps
//! its source in a [`decoder::Decoder`]. Both are transparent: the container
//! codec only ever sees plain tar bytes.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz, .tgz)
//! - **Bzip2** (.tar.bz2, .tbz2)
//! - **Xz** (.tar.xz, .txz)
//! - **Zstd** (.tar.zst, .tzst)

pub mod decoder;
pub mod encoder;

use std::path::Path;

/// Gzip member header, RFC 1952.
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];

/// Compression codec applied around the archive stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip (deflate).
    Gzip,

    /// Bzip2 (Burrows-Wheeler).
    Bzip2,

    /// Xz (LZMA2).
    Xz,

    /// Zstandard.
    Zstd,
}

impl CompressionCodec {
    /// All supported codecs.
    pub const ALL: [Self; 4] = [Self::Gzip, Self::Bzip2, Self::Xz, Self::Zstd];

    /// Returns the typical file suffix for a tar archive using this codec.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarkit_core::CompressionCodec;
    ///
    /// assert_eq!(CompressionCodec::Gzip.suffix(), ".tar.gz");
    /// assert_eq!(CompressionCodec::Zstd.suffix(), ".tar.zst");
    /// ```
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Gzip => ".tar.gz",
            Self::Bzip2 => ".tar.bz2",
            Self::Xz => ".tar.xz",
            Self::Zstd => ".tar.zst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Returns the magic bytes every stream of this codec starts with.
    #[must_use]
    pub const fn magic(self) -> &'static [u8] {
        match self {
            Self::Gzip => GZIP_MAGIC,
            Self::Bzip2 => BZIP2_MAGIC,
            Self::Xz => XZ_MAGIC,
            Self::Zstd => ZSTD_MAGIC,
        }
    }

    /// Parses a codec name as accepted on the command line.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarkit_core::CompressionCodec;
    ///
    /// assert_eq!(CompressionCodec::from_name("gz"), Some(CompressionCodec::Gzip));
    /// assert_eq!(CompressionCodec::from_name("zstd"), Some(CompressionCodec::Zstd));
    /// assert_eq!(CompressionCodec::from_name("lz4"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gz" | "gzip" => Some(Self::Gzip),
            "bz2" | "bzip2" => Some(Self::Bzip2),
            "xz" => Some(Self::Xz),
            "zst" | "zstd" => Some(Self::Zstd),
            _ => None,
        }
    }

    /// Detects the codec from an archive file name.
    ///
    /// Returns `None` for plain `.tar` and for unknown extensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use tarkit_core::CompressionCodec;
    ///
    /// assert_eq!(
    ///     CompressionCodec::from_path(Path::new("backup.tar.gz")),
    ///     Some(CompressionCodec::Gzip)
    /// );
    /// assert_eq!(CompressionCodec::from_path(Path::new("backup.tar")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "gz" | "tgz" => Some(Self::Gzip),
            "bz2" | "tbz" | "tbz2" => Some(Self::Bzip2),
            "xz" | "txz" => Some(Self::Xz),
            "zst" | "tzst" => Some(Self::Zstd),
            _ => None,
        }
    }

    /// Detects the codec from the leading bytes of a stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarkit_core::CompressionCodec;
    ///
    /// assert_eq!(
    ///     CompressionCodec::from_magic(&[0x1f, 0x8b, 0x08]),
    ///     Some(CompressionCodec::Gzip)
    /// );
    /// assert_eq!(CompressionCodec::from_magic(b"file\0\0\0"), None);
    /// ```
    #[must_use]
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|codec| bytes.starts_with(codec.magic()))
    }

    /// Converts a user level (1-9) to a flate2 level.
    fn flate2_level(level: Option<u8>) -> flate2::Compression {
        match level {
            None | Some(6) => flate2::Compression::default(),
            Some(1..=3) => flate2::Compression::fast(),
            Some(7..=9) => flate2::Compression::best(),
            Some(n) => flate2::Compression::new(u32::from(n)),
        }
    }

    /// Converts a user level (1-9) to a bzip2 level.
    fn bzip2_level(level: Option<u8>) -> bzip2::Compression {
        match level {
            None | Some(6) => bzip2::Compression::default(),
            Some(1) => bzip2::Compression::fast(),
            Some(7..=9) => bzip2::Compression::best(),
            Some(n) => bzip2::Compression::new(u32::from(n.min(9))),
        }
    }

    /// Converts a user level (1-9) to an xz preset.
    fn xz_level(level: Option<u8>) -> u32 {
        level.map_or(6, |n| u32::from(n.min(9)))
    }

    /// Converts a user level (1-9) to a zstd level.
    ///
    /// Zstd spans 1-22; the top user levels map to the slow, strong end.
    #[allow(clippy::match_same_arms)]
    fn zstd_level(level: Option<u8>) -> i32 {
        match level {
            None | Some(6) => 3,
            Some(n @ 1..=2) => i32::from(n),
            Some(7) => 10,
            Some(8) => 15,
            Some(9) => 19,
            _ => 3,
        }
    }
}

impl std::fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            CompressionCodec::from_path(Path::new("a.tar.gz")),
            Some(CompressionCodec::Gzip)
        );
        assert_eq!(
            CompressionCodec::from_path(Path::new("a.TGZ")),
            Some(CompressionCodec::Gzip)
        );
        assert_eq!(
            CompressionCodec::from_path(Path::new("a.tbz2")),
            Some(CompressionCodec::Bzip2)
        );
        assert_eq!(
            CompressionCodec::from_path(Path::new("a.tar.xz")),
            Some(CompressionCodec::Xz)
        );
        assert_eq!(
            CompressionCodec::from_path(Path::new("a.tzst")),
            Some(CompressionCodec::Zstd)
        );
        assert_eq!(CompressionCodec::from_path(Path::new("a.tar")), None);
        assert_eq!(CompressionCodec::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_from_magic_every_codec() {
        for codec in CompressionCodec::ALL {
            let mut bytes = codec.magic().to_vec();
            bytes.extend_from_slice(b"payload");
            assert_eq!(CompressionCodec::from_magic(&bytes), Some(codec));
        }
        assert_eq!(CompressionCodec::from_magic(&[]), None);
        assert_eq!(CompressionCodec::from_magic(&[0x1f]), None);
    }

    #[test]
    fn test_suffix_round_trips_through_from_path() {
        for codec in CompressionCodec::ALL {
            let name = format!("archive{}", codec.suffix());
            assert_eq!(CompressionCodec::from_path(Path::new(&name)), Some(codec));
        }
    }

    #[test]
    fn test_flate2_level() {
        assert_eq!(
            CompressionCodec::flate2_level(None),
            flate2::Compression::default()
        );
        assert_eq!(
            CompressionCodec::flate2_level(Some(1)),
            flate2::Compression::fast()
        );
        assert_eq!(
            CompressionCodec::flate2_level(Some(9)),
            flate2::Compression::best()
        );
        assert_eq!(
            CompressionCodec::flate2_level(Some(5)),
            flate2::Compression::new(5)
        );
    }

    #[test]
    fn test_bzip2_level() {
        assert_eq!(
            CompressionCodec::bzip2_level(None),
            bzip2::Compression::default()
        );
        assert_eq!(
            CompressionCodec::bzip2_level(Some(4)),
            bzip2::Compression::new(4)
        );
    }

    #[test]
    fn test_xz_and_zstd_levels() {
        assert_eq!(CompressionCodec::xz_level(None), 6);
        assert_eq!(CompressionCodec::xz_level(Some(9)), 9);
        assert_eq!(CompressionCodec::zstd_level(None), 3);
        assert_eq!(CompressionCodec::zstd_level(Some(2)), 2);
        assert_eq!(CompressionCodec::zstd_level(Some(9)), 19);
    }

    #[test]
    fn test_display() {
        assert_eq!(CompressionCodec::Xz.to_string(), "xz");
    }
}
