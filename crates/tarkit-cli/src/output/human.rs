//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use tarkit_core::Entry;
use tarkit_core::EntryKind;
use tarkit_core::ExtractionReport;
use tarkit_core::PackReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn headline(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn kind_char(kind: EntryKind) -> char {
        match kind {
            EntryKind::File => '-',
            EntryKind::Directory => 'd',
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pack_result(&self, output_path: &Path, report: &PackReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Archive created: {}", output_path.display()));
        let _ = self.term.write_line(&format!(
            "  Entries:      {}",
            Self::format_number(report.entries)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:     {:?}", report.duration));
        }

        Ok(())
    }

    fn format_unpack_result(&self, output_dir: &Path, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Unpacked into {}", output_dir.display()));
        let _ = self
            .term
            .write_line(&format!("  Files:        {}", report.files.len()));
        let _ = self
            .term
            .write_line(&format!("  Directories:  {}", report.directories.len()));
        let _ = self.term.write_line(&format!(
            "  Total size:   {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:     {:?}", report.duration));
            for file in &report.files {
                let _ = self.term.write_line(&format!("    {}", file.display()));
            }
        }

        Ok(())
    }

    fn format_list(&self, entries: &[Entry], long: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if !long {
            for entry in entries {
                let _ = self.term.write_line(&entry.name);
            }
            return Ok(());
        }

        let mut total_size = 0;
        for entry in entries {
            total_size += entry.size;
            let _ = self.term.write_line(&format!(
                "{}{:<6o} {:>10}  {}",
                Self::kind_char(entry.kind),
                entry.mode,
                entry.size,
                entry.name
            ));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {}",
            Self::format_number(entries.len() as u64),
            Self::format_size(total_size)
        ));

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(512), "512 B");
        assert_eq!(HumanFormatter::format_size(2048), "2.0 KB");
        assert_eq!(HumanFormatter::format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_kind_char() {
        assert_eq!(HumanFormatter::kind_char(EntryKind::File), '-');
        assert_eq!(HumanFormatter::kind_char(EntryKind::Directory), 'd');
    }
}
