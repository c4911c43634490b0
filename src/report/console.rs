//! Terminal reporter with `Warning:` / `Success:` prefixes.

use std::io::{self, Write};

use colored::Colorize;

use super::{Level, Reporter};

/// How much the console reporter prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Nothing; errors are printed by the caller.
    Quiet,
    /// Log, warning and success lines.
    #[default]
    Normal,
    /// Normal output plus debug lines.
    Verbose,
}

/// Writes log and success lines to stdout, warnings and debug lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    verbosity: Verbosity,
}

impl ConsoleReporter {
    /// Reporter printing at `verbosity`.
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Render a line without writing it. Exposed for the error path in the binary.
    #[must_use]
    pub fn format_line(level: Level, message: &str) -> String {
        match level {
            Level::Log => message.to_string(),
            Level::Warning => format!("{} {message}", "Warning:".yellow().bold()),
            Level::Success => format!("{} {message}", "Success:".green().bold()),
            Level::Debug => format!("{} {message}", "Debug:".dimmed()),
        }
    }

    const fn shows(&self, level: Level) -> bool {
        match self.verbosity {
            Verbosity::Quiet => false,
            Verbosity::Normal => !matches!(level, Level::Debug),
            Verbosity::Verbose => true,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn emit(&mut self, level: Level, message: &str) {
        if !self.shows(level) {
            return;
        }
        let line = Self::format_line(level, message);
        // A closed pipe must not abort a deletion that already happened.
        let _ = match level {
            Level::Log | Level::Success => writeln!(io::stdout().lock(), "{line}"),
            Level::Warning | Level::Debug => writeln!(io::stderr().lock(), "{line}"),
        };
    }
}

/// Print an error line to stderr in the same style.
pub fn print_error(message: &str) {
    let _ = writeln!(io::stderr().lock(), "{} {message}", "Error:".red().bold());
}
