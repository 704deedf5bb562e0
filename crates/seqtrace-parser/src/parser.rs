use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use seqtrace_types::{LogRecord, Severity};

/// Default Android logcat line pattern:
/// `MM-DD HH:MM:SS.mmm LEVEL TAG: message`.
pub const DEFAULT_LINE_PATTERN: &str =
    r"^(\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}\.\d{3})\s+(\w+)\s+(\w+):\s*(.*)$";

/// A line that opens with a logcat timestamp starts a new record; anything
/// else is a candidate continuation of the previous record.
static TIMESTAMP_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}\.\d{3}").unwrap());

/// Parsing statistics reported alongside the records.
#[derive(Debug, Clone, Serialize)]
pub struct ParseStats {
    pub total_lines: usize,
    pub parsed: usize,
    pub unparsed: usize,
    pub success_rate: f64,
    pub severity_distribution: BTreeMap<String, usize>,
}

/// Result of one parsing pass.
#[derive(Debug)]
pub struct ParseOutcome {
    pub records: Vec<LogRecord>,
    /// Lines that matched nothing and were not continuations.
    pub unparsed: Vec<String>,
}

impl ParseOutcome {
    pub fn stats(&self) -> ParseStats {
        let total = self.records.len() + self.unparsed.len();
        let mut severity_distribution = BTreeMap::new();
        for record in &self.records {
            *severity_distribution
                .entry(record.severity.code().to_string())
                .or_insert(0) += 1;
        }

        ParseStats {
            total_lines: total,
            parsed: self.records.len(),
            unparsed: self.unparsed.len(),
            success_rate: if total == 0 {
                0.0
            } else {
                self.records.len() as f64 / total as f64 * 100.0
            },
            severity_distribution,
        }
    }
}

/// Line-oriented logcat parser.
///
/// The pattern is replaceable at runtime (e.g. for non-Android formats) but
/// must capture timestamp, level, tag, and message as groups 1-4.
pub struct LogLineParser {
    pattern: Regex,
}

impl LogLineParser {
    pub fn new() -> Self {
        Self {
            // The default pattern is a constant; compilation cannot fail.
            pattern: Regex::new(DEFAULT_LINE_PATTERN).unwrap(),
        }
    }

    /// Build a parser with a custom line pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Swap the active line pattern, validating the new one first.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<()> {
        self.pattern = Regex::new(pattern)?;
        Ok(())
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Parse raw lines into structured records.
    ///
    /// Lines that do not match the pattern and do not open with a timestamp
    /// are folded into the previous record's message (multi-line log
    /// payloads such as stack traces); everything else lands in `unparsed`.
    pub fn parse(&self, lines: &[String]) -> ParseOutcome {
        let mut records: Vec<LogRecord> = Vec::new();
        let mut unparsed = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(captures) = self.pattern.captures(line) {
                let group = |n: usize| {
                    captures
                        .get(n)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default()
                };

                records.push(LogRecord {
                    timestamp: group(1),
                    severity: Severity::from_code(&group(2)),
                    tag: group(3),
                    message: group(4),
                    line_number: (index + 1) as u32,
                    raw: line.to_string(),
                });
            } else if is_continuation(line) {
                if let Some(previous) = records.last_mut() {
                    previous.message.push(' ');
                    previous.message.push_str(line);
                    previous.raw.push('\n');
                    previous.raw.push_str(line);
                } else {
                    unparsed.push(line.to_string());
                }
            } else {
                unparsed.push(line.to_string());
            }
        }

        ParseOutcome { records, unparsed }
    }
}

impl Default for LogLineParser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_continuation(line: &str) -> bool {
    !TIMESTAMP_PREFIX.is_match(line)
}
