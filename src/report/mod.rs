//! Status-line sinks for a cleaning run.
//!
//! The cleaner never prints directly; it talks to a [`Reporter`], so the same
//! run can drive a terminal, a JSON wrapper, or a test.

#[cfg(feature = "cli")]
pub mod console;

use serde::Serialize;

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Log,
    Warning,
    Success,
}

/// Receives the human-readable progress of a run.
pub trait Reporter {
    /// Emit one line at `level`.
    fn emit(&mut self, level: Level, message: &str);

    /// Plain progress line.
    fn log(&mut self, message: &str) {
        self.emit(Level::Log, message);
    }

    /// Something the operator should notice; not a failure.
    fn warning(&mut self, message: &str) {
        self.emit(Level::Warning, message);
    }

    /// A step finished as intended.
    fn success(&mut self, message: &str) {
        self.emit(Level::Success, message);
    }

    /// Diagnostic detail, usually hidden.
    fn debug(&mut self, message: &str) {
        self.emit(Level::Debug, message);
    }
}

/// Discards everything; used when the outcome is emitted as JSON instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn emit(&mut self, _level: Level, _message: &str) {}
}

/// Keeps every line in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Vec<(Level, String)>,
}

impl MemoryReporter {
    /// Empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines.
    #[must_use]
    pub fn lines(&self) -> &[(Level, String)] {
        &self.lines
    }

    /// Messages recorded at `level`.
    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn emit(&mut self, level: Level, message: &str) {
        self.lines.push((level, message.to_string()));
    }
}
