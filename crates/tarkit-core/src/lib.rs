//! Streaming tar archive writer and reader with optional compression.
//!
//! `tarkit-core` packs files and directory trees into a single sequential
//! tar stream and unpacks such a stream back onto a filesystem. Gzip, bzip2,
//! xz and zstd filters can be layered underneath the container.
//!
//! The two halves are independent:
//!
//! - [`ArchiveWriter`] appends files, trees and in-memory blobs to any
//!   `Write` sink.
//! - [`ArchiveReader`] walks entries of any `Read` source, streaming each
//!   payload to the caller, to memory or to disk.
//!
//! Entry names always use `/` separators, whatever the host.
//!
//! # Examples
//!
//! ```no_run
//! use tarkit_core::ArchiveWriter;
//! use tarkit_core::ArchiveReader;
//! use tarkit_core::CompressionCodec;
//! use tarkit_core::ReaderConfig;
//! use tarkit_core::WriterConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WriterConfig::default().with_compression(Some(CompressionCodec::Gzip));
//! let mut writer = ArchiveWriter::create("project.tar.gz", &config)?;
//! writer.add_tree("src")?;
//! writer.add_bytes("VERSION", b"1.0.0\n")?;
//! writer.close()?;
//!
//! let config = ReaderConfig::default().with_detect_compression(true);
//! let mut reader = ArchiveReader::open("project.tar.gz", &config)?;
//! let report = reader.extract_all(Some("restore".as_ref()))?;
//! println!("restored {} entries", report.total_items());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod compression;
pub mod config;
pub mod entry;
pub mod error;
pub mod io;
pub mod path;
pub mod reader;
pub mod report;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::TAR_GZ_SUFFIX;
pub use api::TAR_SUFFIX;
pub use api::pack;
pub use api::pack_gz;
pub use api::pack_with;
pub use api::unpack;
pub use api::unpack_gz;
pub use api::unpack_with;
pub use compression::CompressionCodec;
pub use config::ReaderConfig;
pub use config::WriterConfig;
pub use entry::Entry;
pub use entry::EntryKind;
pub use error::ArchiveError;
pub use error::PartialExtraction;
pub use error::Result;
pub use reader::ArchiveReader;
pub use reader::ExtractedEntry;
pub use report::ExtractionReport;
pub use report::PackReport;
pub use writer::ArchiveWriter;
