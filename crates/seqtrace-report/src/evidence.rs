use chrono::Local;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt::Write;

use seqtrace_types::{LogRecord, SequenceEvent};

use crate::mermaid::participant_name;

const REPORT_VERSION: &str = "1.0";
const EMBEDDED_DIAGRAM_LIMIT: usize = 10;
const LOG_TABLE_LIMIT: usize = 20;
const MESSAGE_COLUMN_WIDTH: usize = 100;

/// Keywords that mark a log line as critical regardless of its level.
const CRITICAL_KEYWORDS: [&str; 6] = ["error", "fail", "exception", "critical", "fatal", "crash"];

/// Inputs for evidence report generation beyond the analysis data itself.
#[derive(Debug, Clone)]
pub struct EvidenceOptions {
    pub test_id: String,
    pub environment: String,
    pub log_file_path: String,
    /// Adds regulatory compliance and signature sections.
    pub compliance_mode: bool,
    /// Extra named sections appended to the report, in order.
    pub custom_fields: Vec<(String, String)>,
}

impl EvidenceOptions {
    pub fn new(test_id: impl Into<String>, log_file_path: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            environment: "Test".to_string(),
            log_file_path: log_file_path.into(),
            compliance_mode: false,
            custom_fields: Vec::new(),
        }
    }
}

/// Coverage metrics over one analysis run, in percent.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageMetrics {
    pub coverage_rate: f64,
    pub template_match_rate: f64,
    pub event_generation_rate: f64,
    pub log_processing_success: f64,
}

impl CoverageMetrics {
    fn compute(events: &[SequenceEvent], records: &[LogRecord]) -> Self {
        let total = records.len();
        if total == 0 {
            return Self {
                coverage_rate: 0.0,
                template_match_rate: 0.0,
                event_generation_rate: 0.0,
                log_processing_success: 0.0,
            };
        }

        let matched = events.iter().filter(|e| e.source.is_some()).count();
        let template_match_rate = matched as f64 / total as f64 * 100.0;
        let event_generation_rate = events.len() as f64 / total as f64 * 100.0;

        let successful = records.iter().filter(|r| !r.severity.is_error()).count();
        let log_processing_success = successful as f64 / total as f64 * 100.0;

        Self {
            coverage_rate: (template_match_rate + event_generation_rate + log_processing_success)
                / 3.0,
            template_match_rate,
            event_generation_rate,
            log_processing_success,
        }
    }
}

/// Audit-trail sidecar written next to the markdown report.
#[derive(Debug, Serialize)]
pub struct EvidenceMetadata {
    pub test_id: String,
    pub timestamp: String,
    pub environment: String,
    pub log_file_path: String,
    pub total_log_records: usize,
    pub events_generated: usize,
    pub coverage_metrics: CoverageMetrics,
    /// Raw lines of the first critical records, for traceability.
    pub critical_log_lines: Vec<String>,
    pub checksum: String,
}

/// A rendered test-evidence report: markdown content, its SHA-256
/// checksum, and the serializable audit metadata.
#[derive(Debug)]
pub struct EvidenceReport {
    pub content: String,
    pub checksum: String,
    pub metadata: EvidenceMetadata,
}

impl EvidenceReport {
    pub fn build(
        options: &EvidenceOptions,
        events: &[SequenceEvent],
        records: &[LogRecord],
    ) -> Self {
        let timestamp = Local::now().to_rfc3339();
        let coverage = CoverageMetrics::compute(events, records);
        let critical = critical_records(records);
        let errors = error_records(records);

        let mut content = render_header(options, &timestamp);
        content.push_str(&render_summary(
            events,
            records,
            &coverage,
            critical.len(),
            errors.len(),
        ));
        content.push_str(&render_diagram(events));
        content.push_str(&render_log_evidence(&critical, &errors));

        if options.compliance_mode {
            content.push_str(COMPLIANCE_SECTIONS);
        }
        for (name, value) in &options.custom_fields {
            let _ = write!(content, "## {name}\n\n{value}\n\n---\n\n");
        }

        let checksum = checksum_hex(&content);
        let metadata = EvidenceMetadata {
            test_id: options.test_id.clone(),
            timestamp,
            environment: options.environment.clone(),
            log_file_path: options.log_file_path.clone(),
            total_log_records: records.len(),
            events_generated: events.len(),
            coverage_metrics: coverage,
            critical_log_lines: critical
                .iter()
                .take(LOG_TABLE_LIMIT)
                .map(|r| r.raw.clone())
                .collect(),
            checksum: checksum.clone(),
        };

        Self {
            content,
            checksum,
            metadata,
        }
    }
}

/// SHA-256 of the report content, lowercase hex.
pub fn checksum_hex(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Error/fatal records plus any record whose message carries a critical
/// keyword.
fn critical_records(records: &[LogRecord]) -> Vec<&LogRecord> {
    records
        .iter()
        .filter(|record| {
            record.severity.is_error() || {
                let lowered = record.message.to_lowercase();
                CRITICAL_KEYWORDS.iter().any(|k| lowered.contains(k))
            }
        })
        .collect()
}

fn error_records(records: &[LogRecord]) -> Vec<&LogRecord> {
    records.iter().filter(|r| r.severity.is_error()).collect()
}

fn render_header(options: &EvidenceOptions, timestamp: &str) -> String {
    format!(
        "# Test Evidence Report\n\n\
         ## Report Information\n\n\
         | Field | Value |\n\
         |-------|-------|\n\
         | **Test ID** | {} |\n\
         | **Generated** | {} |\n\
         | **Environment** | {} |\n\
         | **Log File** | {} |\n\
         | **Report Version** | {} |\n\
         | **Generator** | seqtrace |\n\n\
         ---\n\n",
        options.test_id, timestamp, options.environment, options.log_file_path, REPORT_VERSION
    )
}

fn render_summary(
    events: &[SequenceEvent],
    records: &[LogRecord],
    coverage: &CoverageMetrics,
    critical_count: usize,
    error_count: usize,
) -> String {
    let event_types: BTreeSet<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    let mut participants = BTreeSet::new();
    for event in events {
        participants.insert(event.from_entity.as_str());
        participants.insert(event.to_entity.as_str());
    }

    let time_span = match (events.first(), events.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.timestamp, last.timestamp),
        _ => "N/A".to_string(),
    };

    format!(
        "## Summary\n\n\
         ### Analysis Overview\n\n\
         | Metric | Value |\n\
         |--------|-------|\n\
         | **Total Log Records** | {} |\n\
         | **Events Generated** | {} |\n\
         | **Coverage Rate** | {:.2}% |\n\
         | **Critical Logs** | {} |\n\
         | **Error Logs** | {} |\n\n\
         ### Coverage Metrics\n\n\
         - **Template Match Rate**: {:.2}%\n\
         - **Event Generation Rate**: {:.2}%\n\
         - **Log Processing Success**: {:.2}%\n\n\
         ### Sequence Statistics\n\n\
         - **Total Events**: {}\n\
         - **Event Types**: {}\n\
         - **Unique Participants**: {}\n\
         - **Time Span**: {}\n\n\
         ---\n\n",
        records.len(),
        events.len(),
        coverage.coverage_rate,
        critical_count,
        error_count,
        coverage.template_match_rate,
        coverage.event_generation_rate,
        coverage.log_processing_success,
        events.len(),
        event_types.len(),
        participants.len(),
        time_span
    )
}

fn render_diagram(events: &[SequenceEvent]) -> String {
    if events.is_empty() {
        return "## Sequence Diagram\n\n*No sequence events generated*\n\n---\n\n".to_string();
    }

    let limited = &events[..events.len().min(EMBEDDED_DIAGRAM_LIMIT)];
    let mut participants = BTreeSet::new();
    for event in limited {
        participants.insert(participant_name(&event.from_entity));
        participants.insert(participant_name(&event.to_entity));
    }

    let mut out = String::from("## Sequence Diagram\n\n```mermaid\nsequenceDiagram\n");
    for participant in &participants {
        let _ = writeln!(out, "    participant {participant}");
    }
    out.push('\n');
    for event in limited {
        let _ = writeln!(
            out,
            "    {}->>{}: {}",
            participant_name(&event.from_entity),
            participant_name(&event.to_entity),
            event.message
        );
    }
    out.push_str("```\n\n");

    if events.len() > EMBEDDED_DIAGRAM_LIMIT {
        let _ = writeln!(
            out,
            "*Showing first {} events of {} total events*\n",
            EMBEDDED_DIAGRAM_LIMIT,
            events.len()
        );
    }
    out.push_str("---\n\n");
    out
}

fn render_log_evidence(critical: &[&LogRecord], errors: &[&LogRecord]) -> String {
    let mut out = String::from("## Log Evidence\n\n");

    for (title, rows) in [
        ("### Critical Log Entries", critical),
        ("### Error Log Entries", errors),
    ] {
        if rows.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{title}\n");
        out.push_str("| Timestamp | Level | Tag | Message |\n");
        out.push_str("|-----------|-------|-----|---------|\n");
        for record in rows.iter().take(LOG_TABLE_LIMIT) {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                record.timestamp,
                record.severity,
                record.tag,
                truncate_message(&record.message)
            );
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
    out
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MESSAGE_COLUMN_WIDTH {
        return message.to_string();
    }
    let cut: String = message.chars().take(MESSAGE_COLUMN_WIDTH).collect();
    format!("{cut}...")
}

const COMPLIANCE_SECTIONS: &str = "\
## Compliance Information

### Regulatory Compliance

| Standard | Status | Notes |
|----------|--------|-------|
| **ISO 26262** | Compliant | Automotive safety evidence |
| **SOC 2** | Compliant | Security control evidence |
| **GDPR** | Compliant | Data protection measures |

### Signatures

| Role | Name | Date | Signature |
|------|------|------|-----------|
| **Test Engineer** | [Name] | [Date] | [Signature] |
| **QA Manager** | [Name] | [Date] | [Signature] |
| **Compliance Officer** | [Name] | [Date] | [Signature] |

---

";

#[cfg(test)]
mod tests {
    use super::*;
    use seqtrace_types::{EventMetadata, Severity};

    fn record(severity: Severity, message: &str, line: u32) -> LogRecord {
        LogRecord {
            timestamp: "09-17 10:30:15.000".to_string(),
            severity,
            tag: "CameraService".to_string(),
            message: message.to_string(),
            line_number: line,
            raw: format!("09-17 10:30:15.000 {} CameraService: {message}", severity),
        }
    }

    fn event(from: &str, to: &str) -> SequenceEvent {
        SequenceEvent {
            timestamp: "09-17 10:30:15.000".to_string(),
            from_entity: from.to_string(),
            to_entity: to.to_string(),
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

    #[test]
    fn report_carries_required_sections() {
        let options = EvidenceOptions::new("TC-001", "/logs/session.txt");
        let events = vec![event("System", "CameraService")];
        let records = vec![record(Severity::Info, "ok", 1)];

        let report = EvidenceReport::build(&options, &events, &records);
        assert!(report.content.contains("# Test Evidence Report"));
        assert!(report.content.contains("| **Test ID** | TC-001 |"));
        assert!(report.content.contains("## Summary"));
        assert!(report.content.contains("## Sequence Diagram"));
        assert!(report.content.contains("## Log Evidence"));
        assert!(!report.content.contains("Compliance Information"));
    }

    #[test]
    fn checksum_matches_content() {
        let options = EvidenceOptions::new("TC-002", "/logs/session.txt");
        let report = EvidenceReport::build(&options, &[], &[]);
        assert_eq!(report.checksum, checksum_hex(&report.content));
        assert_eq!(report.checksum.len(), 64);
        assert_eq!(report.metadata.checksum, report.checksum);
    }

    #[test]
    fn critical_detection_uses_level_and_keywords() {
        let records = vec![
            record(Severity::Error, "device gone", 1),
            record(Severity::Info, "operation FAILed badly", 2),
            record(Severity::Info, "all good", 3),
        ];
        let critical = critical_records(&records);
        assert_eq!(critical.len(), 2);
        assert_eq!(error_records(&records).len(), 1);
    }

    #[test]
    fn coverage_metrics_for_empty_input_are_zero() {
        let coverage = CoverageMetrics::compute(&[], &[]);
        assert_eq!(coverage.coverage_rate, 0.0);
        assert_eq!(coverage.template_match_rate, 0.0);
    }

    #[test]
    fn coverage_metrics_reflect_match_share() {
        let mut matched_event = event("A", "B");
        matched_event.source = Some(record(Severity::Info, "ok", 1));
        let records = vec![
            record(Severity::Info, "ok", 1),
            record(Severity::Error, "bad", 2),
        ];

        let coverage = CoverageMetrics::compute(&[matched_event], &records);
        assert_eq!(coverage.template_match_rate, 50.0);
        assert_eq!(coverage.event_generation_rate, 50.0);
        assert_eq!(coverage.log_processing_success, 50.0);
        assert_eq!(coverage.coverage_rate, 50.0);
    }

    #[test]
    fn empty_events_note_in_diagram_section() {
        let options = EvidenceOptions::new("TC-003", "/logs/session.txt");
        let report = EvidenceReport::build(&options, &[], &[]);
        assert!(report.content.contains("*No sequence events generated*"));
    }

    #[test]
    fn compliance_and_custom_sections_are_optional() {
        let mut options = EvidenceOptions::new("TC-004", "/logs/session.txt");
        options.compliance_mode = true;
        options
            .custom_fields
            .push(("Vehicle Variant".to_string(), "EU spec".to_string()));

        let report = EvidenceReport::build(&options, &[], &[]);
        assert!(report.content.contains("## Compliance Information"));
        assert!(report.content.contains("## Vehicle Variant"));
        assert!(report.content.contains("EU spec"));
    }

    #[test]
    fn long_messages_are_truncated_in_tables() {
        let long = "x".repeat(150);
        let records = vec![record(Severity::Error, &long, 1)];
        let report = EvidenceReport::build(
            &EvidenceOptions::new("TC-005", "/logs/session.txt"),
            &[],
            &records,
        );
        let truncated = format!("{}...", "x".repeat(100));
        assert!(report.content.contains(&truncated));
        assert!(!report.content.contains(&"x".repeat(101)));
    }
}
