//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use tarkit_core::Entry;
use tarkit_core::ExtractionReport;
use tarkit_core::PackReport;

pub struct JsonFormatter;

#[derive(Serialize)]
struct PackOutput {
    output_path: String,
    entries: u64,
    bytes_written: u64,
    duration_ms: u128,
}

#[derive(Serialize)]
struct UnpackOutput {
    output_dir: String,
    files: usize,
    directories: usize,
    bytes_written: u64,
    duration_ms: u128,
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    name: &'a str,
    kind: &'static str,
    size: u64,
    mode: u32,
    mtime: u64,
}

#[derive(Serialize)]
struct ListOutput<'a> {
    total_entries: usize,
    total_size: u64,
    entries: Vec<EntryOutput<'a>>,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn list_output(entries: &[Entry]) -> ListOutput<'_> {
        ListOutput {
            total_entries: entries.len(),
            total_size: entries.iter().map(|e| e.size).sum(),
            entries: entries
                .iter()
                .map(|e| EntryOutput {
                    name: &e.name,
                    kind: e.kind.as_str(),
                    size: e.size,
                    mode: e.mode,
                    mtime: e.mtime,
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(&self, output_path: &Path, report: &PackReport) -> Result<()> {
        let data = PackOutput {
            output_path: output_path.display().to_string(),
            entries: report.entries,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };
        Self::output(&JsonOutput::success("pack", data))
    }

    fn format_unpack_result(&self, output_dir: &Path, report: &ExtractionReport) -> Result<()> {
        let data = UnpackOutput {
            output_dir: output_dir.display().to_string(),
            files: report.files.len(),
            directories: report.directories.len(),
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };
        Self::output(&JsonOutput::success("unpack", data))
    }

    fn format_list(&self, entries: &[Entry], _long: bool) -> Result<()> {
        Self::output(&JsonOutput::success("list", Self::list_output(entries)))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        let _ = Self::output(&output);
    }
}
