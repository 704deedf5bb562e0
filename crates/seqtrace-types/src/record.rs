use serde::{Deserialize, Serialize};
use std::fmt;

/// Logcat severity level, ordered from least to most severe.
///
/// Serializes to the single-letter logcat codes (`V`, `D`, `I`, `W`, `E`,
/// `F`). Unknown codes are mapped to `Info` rather than rejected, since log
/// producers occasionally emit nonstandard levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "V")]
    Verbose,
    #[serde(rename = "D")]
    Debug,
    #[serde(rename = "I")]
    Info,
    #[serde(rename = "W")]
    Warning,
    #[serde(rename = "E")]
    Error,
    #[serde(rename = "F")]
    Fatal,
}

impl Severity {
    /// Parse a logcat level code. Unknown codes default to `Info`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "V" => Severity::Verbose,
            "D" => Severity::Debug,
            "I" => Severity::Info,
            "W" => Severity::Warning,
            "E" => Severity::Error,
            "F" => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Severity::Verbose => "V",
            Severity::Debug => "D",
            Severity::Info => "I",
            Severity::Warning => "W",
            Severity::Error => "E",
            Severity::Fatal => "F",
        }
    }

    /// Whether this level indicates a failure (error or fatal).
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One structured log line.
///
/// The `timestamp` keeps the source format (`MM-DD HH:MM:SS.mmm`). Because
/// that format is fixed-width and zero-padded, lexicographic order equals
/// chronological order within a single year; logs spanning a year boundary
/// sort incorrectly, which is a documented limitation of the source format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub severity: Severity,
    pub tag: String,
    pub message: String,
    /// 1-based line number in the source file, kept for traceability.
    pub line_number: u32,
    /// The original line, preserved verbatim for evidence reports.
    pub raw: String,
}
