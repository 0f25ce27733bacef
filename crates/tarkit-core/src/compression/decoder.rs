//! Read-side compression filter.

use std::io;
use std::io::BufReader;
use std::io::Chain;
use std::io::Cursor;
use std::io::Read;

use super::CompressionCodec;
use crate::ArchiveError;
use crate::Result;

/// Bytes needed to tell the codecs apart; the xz magic is the longest.
const PEEK_LEN: u64 = 6;

/// The caller's source with the peeked magic bytes put back in front.
pub type Source<R> = BufReader<Chain<Cursor<Vec<u8>>, R>>;

/// Optional decompression layered over an archive source.
pub enum Decoder<R: Read> {
    /// No compression.
    Plain(Source<R>),
    /// One or more concatenated gzip members.
    Gzip(flate2::bufread::MultiGzDecoder<Source<R>>),
    /// Bzip2 stream.
    Bzip2(bzip2::bufread::BzDecoder<Source<R>>),
    /// Xz stream.
    Xz(xz2::bufread::XzDecoder<Source<R>>),
    /// Zstd frames.
    Zstd(zstd::Decoder<'static, Source<R>>),
}

impl<R: Read> Decoder<R> {
    /// Wraps `source` in the requested codec.
    ///
    /// An explicit codec is checked against the stream's magic bytes up front,
    /// so a wrong or damaged stream fails here rather than on the first entry.
    /// With no codec and `detect` set, the codec is sniffed from the magic
    /// bytes and plain tar is assumed when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns `CorruptArchive` if the stream does not start with the codec's
    /// magic bytes, or an I/O error if the source cannot be read.
    pub fn new(mut source: R, codec: Option<CompressionCodec>, detect: bool) -> Result<Self> {
        let head = if codec.is_some() || detect {
            peek_magic(&mut source).map_err(ArchiveError::from_read)?
        } else {
            Vec::new()
        };

        let codec = match codec {
            Some(codec) => {
                if !head.starts_with(codec.magic()) {
                    return Err(ArchiveError::CorruptArchive(format!(
                        "stream does not start with a {codec} header"
                    )));
                }
                Some(codec)
            }
            None if detect => CompressionCodec::from_magic(&head),
            None => None,
        };

        let buffered = BufReader::new(Cursor::new(head).chain(source));
        let decoder = match codec {
            None => Self::Plain(buffered),
            Some(CompressionCodec::Gzip) => {
                Self::Gzip(flate2::bufread::MultiGzDecoder::new(buffered))
            }
            Some(CompressionCodec::Bzip2) => Self::Bzip2(bzip2::bufread::BzDecoder::new(buffered)),
            Some(CompressionCodec::Xz) => Self::Xz(xz2::bufread::XzDecoder::new(buffered)),
            Some(CompressionCodec::Zstd) => Self::Zstd(
                zstd::Decoder::with_buffer(buffered).map_err(ArchiveError::from_read)?,
            ),
        };
        Ok(decoder)
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

    /// Unwraps the decoder, returning the source.
    ///
    /// Bytes already buffered or peeked by the decoder are discarded.
    pub fn into_inner(self) -> R {
        let buffered = match self {
            Self::Plain(buffered) => buffered,
            Self::Gzip(decoder) => decoder.into_inner(),
            Self::Bzip2(decoder) => decoder.into_inner(),
            Self::Xz(decoder) => decoder.into_inner(),
            Self::Zstd(decoder) => decoder.finish(),
        };
        buffered.into_inner().into_inner().1
    }
}

/// Reads up to [`PEEK_LEN`] bytes, across as many short reads as it takes.
fn peek_magic<R: Read>(source: &mut R) -> io::Result<Vec<u8>> {
    let mut head = Vec::new();
    source.by_ref().take(PEEK_LEN).read_to_end(&mut head)?;
    Ok(head)
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(source) => source.read(buf),
            Self::Gzip(decoder) => decoder.read(buf),
            Self::Bzip2(decoder) => decoder.read(buf),
            Self::Xz(decoder) => decoder.read(buf),
            Self::Zstd(decoder) => decoder.read(buf),
        }
    }
}
