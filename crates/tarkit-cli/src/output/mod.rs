//! Result rendering for the `tarkit` subcommands.
//!
//! Each subcommand hands its report to an [`OutputFormatter`]; `--json`
//! selects the machine-readable one, anything else gets terminal text.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;

/// Picks the formatter for the global `--json`, `--verbose` and `--quiet`
/// flags. Quiet only silences the human formatter; JSON is always printed.
pub fn create_formatter(json: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        return Box::new(JsonFormatter);
    }
    Box::new(HumanFormatter::new(verbose, quiet))
}
