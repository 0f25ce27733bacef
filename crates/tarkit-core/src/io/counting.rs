//! Byte-counting writer.

use std::io::Write;

/// Writer that counts the bytes accepted by the wrapped sink.
///
/// The archive writer keeps one above its compression filter so it can tell
/// how many tar bytes were emitted, and whether a failed call emitted any.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use tarkit_core::io::CountingWriter;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(b"Hello World")?;
/// assert_eq!(writer.total_bytes(), 11);
/// assert_eq!(writer.into_inner(), b"Hello World");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Wraps `inner` with a zeroed counter.
    #[must_use]
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Returns the number of bytes accepted so far.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Returns a reference to the wrapped sink.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the wrapped sink.
    ///
    /// Bytes written through it bypass the counter.
    pub const fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwraps the writer, returning the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
