//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use tarkit_core::ArchiveReader;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut reader = add_archive_context(
        ArchiveReader::open(&args.archive, &args.reader_config()),
        &args.archive,
    )?;

    // Payloads are skipped, never buffered
    let mut entries = Vec::new();
    while let Some(entry) = add_archive_context(reader.next_entry(), &args.archive)? {
        entries.push(entry);
    }

    formatter.format_list(&entries, args.long)?;

    Ok(())
}
