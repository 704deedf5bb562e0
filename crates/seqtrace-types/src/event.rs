use serde::{Deserialize, Serialize};

use crate::record::{LogRecord, Severity};

/// Metadata attached to every generated sequence event.
///
/// `sequence_number` and `time_since_previous_seconds` are populated by the
/// enrichment pass that runs once after the batch is sorted; before that
/// pass (and for the first event, or around unparseable timestamps) they
/// are absent. Absence is the signal — they are never serialized as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub template_name: String,
    pub template_priority: i64,
    pub log_level: Severity,
    pub log_tag: String,
    /// Ordered captured groups of the matching pattern. Groups that did not
    /// participate in the match are carried as empty strings.
    pub matched_groups: Vec<String>,
    /// 1-based position in the final sorted output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
    /// Seconds since the previous event in final order. May be negative
    /// across clock anomalies or a year rollover; never clamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_since_previous_seconds: Option<f64>,
}

/// An abstract participant-to-participant message derived from one log line
/// and one matching template.
///
/// Events are immutable: enrichment constructs new events instead of
/// mutating the generated ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceEvent {
    /// Copied verbatim from the triggering log record.
    pub timestamp: String,
    pub from_entity: String,
    pub to_entity: String,
    pub message: String,
    /// Name of the template that produced this event.
    pub event_type: String,
    pub metadata: EventMetadata,
    /// The originating log record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<LogRecord>,
}

impl SequenceEvent {
    /// Return a copy carrying the given enrichment fields.
    pub fn enriched(&self, sequence_number: u64, time_since_previous: Option<f64>) -> Self {
        let mut event = self.clone();
        event.metadata.sequence_number = Some(sequence_number);
        event.metadata.time_since_previous_seconds = time_since_previous;
        event
    }
}
