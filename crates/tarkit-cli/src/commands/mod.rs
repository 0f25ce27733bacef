//! Subcommand implementations.

pub mod list;
pub mod pack;
pub mod unpack;

use crate::cli::ListArgs;
use crate::cli::UnpackArgs;
use tarkit_core::CompressionCodec;
use tarkit_core::ReaderConfig;

/// Builds the read-side configuration shared by `unpack` and `list`.
///
/// Without an explicit codec the stream is sniffed for magic bytes.
fn reader_config(compression: Option<CompressionCodec>) -> ReaderConfig {
    ReaderConfig::default()
        .with_compression(compression)
        .with_detect_compression(compression.is_none())
}

impl UnpackArgs {
    pub(crate) fn reader_config(&self) -> ReaderConfig {
        reader_config(self.compression)
            .with_preserve_permissions(self.preserve_permissions)
            .with_preserve_mtime(self.preserve_mtime)
    }
}

impl ListArgs {
    pub(crate) fn reader_config(&self) -> ReaderConfig {
        reader_config(self.compression)
    }
}
