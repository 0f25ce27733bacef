//! Exact-length payload copying.

use std::io;
use std::io::ErrorKind;
use std::io::Read;

/// Reader that yields exactly `declared` bytes from its source.
///
/// A source that ends early turns into an `UnexpectedEof` error rather than
/// a short payload; [`has_trailing_data`](Self::has_trailing_data) reports a
/// source that had more to give.
pub(crate) struct ExactReader<R> {
    inner: R,
    declared: u64,
    remaining: u64,
    short: bool,
}

impl<R: Read> ExactReader<R> {
    pub(crate) const fn new(inner: R, declared: u64) -> Self {
        Self {
            inner,
            declared,
            remaining: declared,
            short: false,
        }
    }

    /// Bytes delivered so far.
    pub(crate) const fn delivered(&self) -> u64 {
        self.declared - self.remaining
    }

    /// `true` once the source has ended before `declared` bytes.
    pub(crate) const fn is_short(&self) -> bool {
        self.short
    }

    /// Probes the source for one more byte after the declared length.
    pub(crate) fn has_trailing_data(&mut self) -> io::Result<bool> {
        let mut probe = [0u8; 1];
        loop {
            match self.inner.read(&mut probe) {
                Ok(n) => return Ok(n > 0),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Read for ExactReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let max = usize::try_from(self.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = self.inner.read(&mut buf[..max])?;
        if n == 0 {
            self.short = true;
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("source ended after {} bytes", self.delivered()),
            ));
        }

        self.remaining -= n as u64;
        Ok(n)
    }
}

/// Fills `block` from `source`.
///
/// Returns `Ok(false)` on a clean end of stream before the first byte, and
/// `UnexpectedEof` if the stream ends part way through the block.
pub(crate) fn read_block<R: Read>(source: &mut R, block: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < block.len() {
        match source.read(&mut block[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("stream ended {filled} bytes into a {} byte block", block.len()),
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}
