use seqtrace_types::{LogRecord, Severity};

/// Search criteria applied to parsed records with AND logic.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against the message.
    pub keyword: Option<String>,
    /// Exact (case-sensitive) tag match.
    pub tag: Option<String>,
    /// Keep records at this severity or above.
    pub min_severity: Option<Severity>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.tag.is_none() && self.min_severity.is_none()
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(keyword) = &self.keyword {
            if !record
                .message
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if &record.tag != tag {
                return false;
            }
        }

        if let Some(min) = self.min_severity {
            if record.severity < min {
                return false;
            }
        }

        true
    }

    /// Apply the criteria. Empty criteria keep everything.
    pub fn apply(&self, records: Vec<LogRecord>) -> Vec<LogRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
