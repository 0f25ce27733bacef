//! Raw tar builders for reader tests.
//!
//! These write headers directly with the `tar` crate so tests can produce
//! entry types and names the archive writer never emits.

#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::new_without_default
)]

/// Builder for hand-made tar streams.
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0o644.
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1_700_000_000);
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory, keeping any trailing slash in `path`.
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink entry.
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        self.builder.append_link(&mut header, path, target).unwrap();
        self
    }

    /// Adds a file whose name is copied into the header unchecked, so names
    /// with `..`, a leading `/` or invalid UTF-8 can be produced.
    pub fn add_file_raw_name(mut self, name: impl AsRef<[u8]>, data: &[u8]) -> Self {
        let name = name.as_ref();
        let mut header = tar::Header::new_old();
        let field = &mut header.as_old_mut().name;
        field[..name.len()].copy_from_slice(name);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Appends `header` as given, followed by `data` and its padding.
    ///
    /// The declared size is not checked against `data`, so headers can claim
    /// sizes and timestamps no real file has.
    pub fn add_raw_header(mut self, header: &tar::Header, data: &[u8]) -> Self {
        self.builder.append(header, data).unwrap();
        self
    }

    /// Finishes the stream with the two zero blocks.
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

/// Flips a byte inside the first header's name field without fixing the
/// checksum.
pub fn corrupt_first_header(mut tar: Vec<u8>) -> Vec<u8> {
    tar[0] ^= 0x20;
    tar
}
