//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;
use tarkit_core::CompressionCodec;

#[derive(Parser)]
#[command(name = "tarkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files and directories into an archive
    Pack(PackArgs),
    /// Unpack an archive into a directory
    Unpack(UnpackArgs),
    /// List archive entries without extracting them
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Compression filter: gzip, bzip2, xz or zstd (default: from extension)
    #[arg(short, long, value_name = "CODEC", value_parser = parse_codec)]
    pub compression: Option<CompressionCodec>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub level: Option<u8>,

    /// Zero timestamps and ownership for reproducible output
    #[arg(long)]
    pub deterministic: bool,

    /// Skip symbolic links inside directory trees instead of following them
    #[arg(long)]
    pub no_follow_symlinks: bool,
}

#[derive(clap::Args)]
pub struct UnpackArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Compression filter: gzip, bzip2, xz or zstd (default: detected)
    #[arg(short, long, value_name = "CODEC", value_parser = parse_codec)]
    pub compression: Option<CompressionCodec>,

    /// Apply file modes recorded in the archive
    #[arg(long)]
    pub preserve_permissions: bool,

    /// Apply modification times recorded in the archive
    #[arg(long)]
    pub preserve_mtime: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Compression filter: gzip, bzip2, xz or zstd (default: detected)
    #[arg(short, long, value_name = "CODEC", value_parser = parse_codec)]
    pub compression: Option<CompressionCodec>,

    /// Show kind, mode and size of each entry
    #[arg(short, long)]
    pub long: bool,
}

fn parse_codec(s: &str) -> Result<CompressionCodec, String> {
    CompressionCodec::from_name(s.trim())
        .ok_or_else(|| format!("unknown compression '{s}' (expected gzip, bzip2, xz or zstd)"))
}
