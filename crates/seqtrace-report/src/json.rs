use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;

use seqtrace_engine::EventStatistics;
use seqtrace_types::{LogRecord, SequenceEvent, Template};

use crate::error::Result;

const EXPORT_VERSION: &str = "1.0";
const GENERATOR_NAME: &str = "seqtrace";

#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    pub export_timestamp: String,
    pub event_count: usize,
    pub version: String,
    pub format: String,
    pub generator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_record_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LogBreakdown {
    pub total_count: usize,
    pub level_distribution: BTreeMap<String, usize>,
    pub tag_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct TemplateBreakdown {
    pub total_count: usize,
    pub priority_distribution: BTreeMap<i64, usize>,
    pub template_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportStatistics {
    pub sequence_events: EventStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_records: Option<LogBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<TemplateBreakdown>,
}

/// The full JSON export document: metadata header, the enriched event
/// sequence, optional source records and templates, and aggregate
/// statistics.
#[derive(Debug, Serialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub sequence_events: Vec<SequenceEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_records: Option<Vec<LogRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_used: Option<Vec<Template>>,
    pub statistics: ExportStatistics,
}

impl ExportDocument {
    /// Assemble an export document. `records` and `templates` are optional
    /// context; when supplied they are embedded along with their own
    /// breakdowns.
    pub fn new(
        events: Vec<SequenceEvent>,
        records: Option<Vec<LogRecord>>,
        templates: Option<Vec<Template>>,
    ) -> Self {
        let statistics = ExportStatistics {
            sequence_events: EventStatistics::from_events(&events),
            log_records: records.as_deref().map(log_breakdown),
            templates: templates.as_deref().map(template_breakdown),
        };

        let metadata = ExportMetadata {
            export_timestamp: Local::now().to_rfc3339(),
            event_count: events.len(),
            version: EXPORT_VERSION.to_string(),
            format: "sequence_events".to_string(),
            generator: GENERATOR_NAME.to_string(),
            log_record_count: records.as_ref().map(Vec::len),
            template_count: templates.as_ref().map(Vec::len),
        };

        Self {
            metadata,
            sequence_events: events,
            log_records: records,
            templates_used: templates,
            statistics,
        }
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn log_breakdown(records: &[LogRecord]) -> LogBreakdown {
    let mut level_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut tag_distribution: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        *level_distribution
            .entry(record.severity.code().to_string())
            .or_insert(0) += 1;
        *tag_distribution.entry(record.tag.clone()).or_insert(0) += 1;
    }

    LogBreakdown {
        total_count: records.len(),
        level_distribution,
        tag_distribution,
    }
}

fn template_breakdown(templates: &[Template]) -> TemplateBreakdown {
    let mut priority_distribution: BTreeMap<i64, usize> = BTreeMap::new();
    for template in templates {
        *priority_distribution.entry(template.priority).or_insert(0) += 1;
    }

    TemplateBreakdown {
        total_count: templates.len(),
        priority_distribution,
        template_names: templates.iter().map(|t| t.name.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqtrace_types::{EventMetadata, SequenceMapping, Severity};

    fn event() -> SequenceEvent {
        SequenceEvent {
            timestamp: "09-17 10:30:15.000".to_string(),
            from_entity: "System".to_string(),
            to_entity: "CameraService".to_string(),
            message: "Start".to_string(),
            event_type: "Start".to_string(),
            metadata: EventMetadata {
                template_name: "Start".to_string(),
                template_priority: 1,
                log_level: Severity::Info,
                log_tag: "CameraService".to_string(),
                matched_groups: Vec::new(),
                sequence_number: Some(1),
                time_since_previous_seconds: None,
            },
            source: None,
        }
    }

    fn record(severity: Severity, tag: &str) -> LogRecord {
        LogRecord {
            timestamp: "09-17 10:30:15.000".to_string(),
            severity,
            tag: tag.to_string(),
            message: "msg".to_string(),
            line_number: 1,
            raw: "raw".to_string(),
        }
    }

    #[test]
    fn document_without_context_omits_optional_sections() {
        let doc = ExportDocument::new(vec![event()], None, None);
        let json = doc.to_pretty_string().unwrap();

        assert!(json.contains("\"sequence_events\""));
        assert!(json.contains("\"event_count\": 1"));
        assert!(!json.contains("\"log_records\""));
        assert!(!json.contains("\"templates_used\""));
    }

    #[test]
    fn embedded_records_produce_distributions() {
        let records = vec![
            record(Severity::Info, "CameraService"),
            record(Severity::Error, "CameraService"),
            record(Severity::Info, "CameraHAL"),
        ];
        let doc = ExportDocument::new(vec![event()], Some(records), None);

        let breakdown = doc.statistics.log_records.as_ref().unwrap();
        assert_eq!(breakdown.total_count, 3);
        assert_eq!(breakdown.level_distribution["I"], 2);
        assert_eq!(breakdown.level_distribution["E"], 1);
        assert_eq!(breakdown.tag_distribution["CameraService"], 2);
        assert_eq!(doc.metadata.log_record_count, Some(3));
    }

    #[test]
    fn embedded_templates_produce_breakdown() {
        let mapping = SequenceMapping {
            from: "A".to_string(),
            to: "B".to_string(),
            message: "m".to_string(),
        };
        let templates = vec![
            Template::new("One", "x", mapping.clone(), 1),
            Template::new("Two", "y", mapping, 1),
        ];
        let doc = ExportDocument::new(Vec::new(), None, Some(templates));

        let breakdown = doc.statistics.templates.as_ref().unwrap();
        assert_eq!(breakdown.priority_distribution[&1], 2);
        assert_eq!(breakdown.template_names, vec!["One", "Two"]);
        assert_eq!(doc.metadata.template_count, Some(2));
    }

    #[test]
    fn document_serializes_to_valid_json() {
        let doc = ExportDocument::new(vec![event()], None, None);
        let json = doc.to_pretty_string().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["metadata"]["format"], "sequence_events");
        assert_eq!(parsed["statistics"]["sequence_events"]["total_events"], 1);
    }
}
