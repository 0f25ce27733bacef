//! Write-side compression filter.

use std::io;
use std::io::Write;

use super::CompressionCodec;

/// Optional compression layered over an archive sink.
pub enum Encoder<W: Write> {
    /// No compression.
    Plain(W),
    /// Gzip member.
    Gzip(flate2::write::GzEncoder<W>),
    /// Bzip2 stream.
    Bzip2(bzip2::write::BzEncoder<W>),
    /// Xz stream.
    Xz(xz2::write::XzEncoder<W>),
    /// Zstd frame.
    Zstd(zstd::Encoder<'static, W>),
}

impl<W: Write> Encoder<W> {
    /// Wraps `sink` in the requested codec at a user level (1-9).
    ///
    /// # Errors
    ///
    /// Returns an error if the zstd context cannot be created.
    pub fn new(sink: W, codec: Option<CompressionCodec>, level: Option<u8>) -> io::Result<Self> {
        let encoder = match codec {
            None => Self::Plain(sink),
            Some(CompressionCodec::Gzip) => Self::Gzip(flate2::write::GzEncoder::new(
                sink,
                CompressionCodec::flate2_level(level),
            )),
            Some(CompressionCodec::Bzip2) => Self::Bzip2(bzip2::write::BzEncoder::new(
                sink,
                CompressionCodec::bzip2_level(level),
            )),
            Some(CompressionCodec::Xz) => Self::Xz(xz2::write::XzEncoder::new(
                sink,
                CompressionCodec::xz_level(level),
            )),
            Some(CompressionCodec::Zstd) => {
                let mut encoder = zstd::Encoder::new(sink, CompressionCodec::zstd_level(level))?;
                encoder.include_checksum(true)?;
                Self::Zstd(encoder)
            }
        };
        Ok(encoder)
    }

    /// Returns the codec in use, if any.
    #[must_use]
    pub const fn codec(&self) -> Option<CompressionCodec> {
        match self {
            Self::Plain(_) => None,
            Self::Gzip(_) => Some(CompressionCodec::Gzip),
            Self::Bzip2(_) => Some(CompressionCodec::Bzip2),
            Self::Xz(_) => Some(CompressionCodec::Xz),
            Self::Zstd(_) => Some(CompressionCodec::Zstd),
        }
    }

    /// Writes the codec trailer and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailer cannot be written.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Plain(sink) => Ok(sink),
            Self::Gzip(encoder) => encoder.finish(),
            Self::Bzip2(encoder) => encoder.finish(),
            Self::Xz(encoder) => encoder.finish(),
            Self::Zstd(encoder) => encoder.finish(),
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(sink) => sink.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
            Self::Bzip2(encoder) => encoder.write(buf),
            Self::Xz(encoder) => encoder.write(buf),
            Self::Zstd(encoder) => encoder.write(buf),
        }
    }

    /// Pushes buffered compressed bytes to the sink without ending the stream.
    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(sink) => sink.flush(),
            Self::Gzip(encoder) => encoder.flush(),
            Self::Bzip2(encoder) => encoder.flush(),
            Self::Xz(encoder) => encoder.flush(),
            Self::Zstd(encoder) => encoder.flush(),
        }
    }
}
