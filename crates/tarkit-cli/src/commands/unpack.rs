//! Unpack command implementation.

use crate::cli::UnpackArgs;
use crate::error::add_archive_context;
use crate::error::convert_archive_error;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use std::env;
use tarkit_core::ArchiveReader;

pub fn execute(args: &UnpackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let mut reader = add_archive_context(
        ArchiveReader::open(&args.archive, &args.reader_config()),
        &args.archive,
    )?;

    let report = match reader.extract_all(Some(&output_dir)) {
        Ok(report) => report,
        Err(partial) => {
            if partial.report.total_items() > 0 {
                formatter.format_warning(&format!(
                    "{} entries were extracted into '{}' before the failure",
                    partial.report.total_items(),
                    output_dir.display()
                ));
            }
            return Err(convert_archive_error(partial.error, &args.archive));
        }
    };
    reader.close();

    formatter.format_unpack_result(&output_dir, &report)?;

    Ok(())
}
