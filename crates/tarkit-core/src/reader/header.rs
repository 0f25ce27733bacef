//! Header block decoding.

use std::borrow::Cow;

use tar::Header;

use crate::ArchiveError;
use crate::Result;

/// Tar block size.
pub(crate) const BLOCK_SIZE: u64 = 512;

/// Byte range of the checksum field inside a header block.
const CKSUM_RANGE: std::ops::Range<usize> = 148..156;

/// Upper bound on GNU long-name and PAX extension payloads.
pub(crate) const MAX_EXTENSION_SIZE: u64 = 1 << 20;

/// Returns the zero padding that follows a payload of `size` bytes.
pub(crate) const fn padding(size: u64) -> u64 {
    (BLOCK_SIZE - size % BLOCK_SIZE) % BLOCK_SIZE
}

/// Returns `size` plus its padding, the bytes a payload occupies.
///
/// Base-256 and PAX sizes can come close enough to `u64::MAX` for the sum to
/// overflow; such a size is corrupt.
pub(crate) fn padded_len(size: u64) -> Result<u64> {
    size.checked_add(padding(size)).ok_or_else(|| {
        ArchiveError::CorruptArchive(format!("declared size {size} overflows the stream"))
    })
}

/// Returns `true` for an all-zero block, the end-of-archive marker.
pub(crate) fn is_zero_block(header: &Header) -> bool {
    header.as_bytes().iter().all(|&b| b == 0)
}

/// Checks the stored checksum against the block contents.
///
/// The checksum field itself counts as eight spaces.
pub(crate) fn verify_checksum(header: &Header) -> Result<()> {
    let stored = header
        .cksum()
        .map_err(|e| ArchiveError::CorruptArchive(format!("unreadable header checksum: {e}")))?;

    let computed: u32 = header
        .as_bytes()
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if CKSUM_RANGE.contains(&i) {
                u32::from(b' ')
            } else {
                u32::from(b)
            }
        })
        .sum();

    if stored != computed {
        return Err(ArchiveError::CorruptArchive(format!(
            "header checksum mismatch: stored {stored}, computed {computed}"
        )));
    }
    Ok(())
}

/// Numeric header fields, each parsed or reported as corruption.
pub(crate) struct Fields {
    pub size: u64,
    pub mtime: u64,
    pub mode: u32,
}

impl Fields {
    pub(crate) fn parse(header: &Header) -> Result<Self> {
        let size = header.entry_size().map_err(|e| field_error("size", &e))?;
        let mtime = header.mtime().map_err(|e| field_error("mtime", &e))?;
        let mode = header.mode().map_err(|e| field_error("mode", &e))?;
        Ok(Self { size, mtime, mode })
    }
}

fn field_error(field: &str, err: &std::io::Error) -> ArchiveError {
    ArchiveError::CorruptArchive(format!("invalid {field} field: {err}"))
}

/// Turns raw name bytes into an entry name.
///
/// Trailing NULs (GNU long names) and trailing slashes (directory markers)
/// are dropped. Names must be UTF-8, as on the write side.
pub(crate) fn entry_name(raw: &[u8]) -> Result<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let name = std::str::from_utf8(&raw[..end]).map_err(|_| {
        ArchiveError::CorruptArchive(format!(
            "entry name is not valid UTF-8: {}",
            String::from_utf8_lossy(&raw[..end])
        ))
    })?;
    let name = name.trim_end_matches('/');

    if name.is_empty() {
        return Err(ArchiveError::CorruptArchive(
            "entry has an empty name".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Overrides collected from PAX and GNU extension records for the next
/// header.
#[derive(Debug, Default)]
pub(crate) struct Extensions {
    pub long_name: Option<Vec<u8>>,
    pub pax_path: Option<Vec<u8>>,
    pub pax_size: Option<u64>,
}

impl Extensions {
    /// Applies the keys of one PAX extended header block.
    pub(crate) fn apply_pax(&mut self, data: &[u8]) -> Result<()> {
        for extension in tar::PaxExtensions::new(data) {
            let extension = extension
                .map_err(|e| ArchiveError::CorruptArchive(format!("malformed PAX record: {e}")))?;
            match extension.key() {
                Ok("path") => self.pax_path = Some(extension.value_bytes().to_vec()),
                Ok("size") => {
                    let size = extension
                        .value()
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .ok_or_else(|| {
                            ArchiveError::CorruptArchive("invalid PAX size record".to_string())
                        })?;
                    self.pax_size = Some(size);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Name bytes for the header they precede; PAX wins over GNU.
    pub(crate) fn name<'a>(&'a self, header: &'a Header) -> Cow<'a, [u8]> {
        self.pax_path
            .as_deref()
            .or(self.long_name.as_deref())
            .map_or_else(|| header.path_bytes(), Cow::Borrowed)
    }
}
