//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use tarkit_core::CompressionCodec;
use tarkit_core::WriterConfig;
use tarkit_core::pack_with;
use tracing::debug;

pub fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = writer_config(args);
    debug!(
        output = %args.output.display(),
        codec = ?config.compression,
        sources = args.sources.len(),
        "packing"
    );

    let report = add_archive_context(pack_with(&args.output, &args.sources, &config), &args.output)?;

    formatter.format_pack_result(&args.output, &report)?;

    Ok(())
}

/// An explicit `--compression` wins; otherwise the output extension decides.
fn writer_config(args: &PackArgs) -> WriterConfig {
    let codec = args
        .compression
        .or_else(|| CompressionCodec::from_path(&args.output));

    let mut config = WriterConfig::default()
        .with_compression(codec)
        .with_deterministic(args.deterministic)
        .with_follow_symlinks(!args.no_follow_symlinks);
    if let Some(level) = args.level {
        config = config.with_compression_level(level);
    }
    config
}
