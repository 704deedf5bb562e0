use seqtrace_types::{EventMetadata, LogRecord, SequenceEvent, Template};

use crate::mapper::resolve_slot;
use crate::matcher::PatternMatcher;
use crate::timestamp::{delta_seconds, parse_log_timestamp};

/// Result of one generation pass: the enriched event sequence plus the line
/// numbers of records that matched no template.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    pub events: Vec<SequenceEvent>,
    pub unmatched: Vec<u32>,
}

impl GenerationOutcome {
    pub fn matched(&self) -> usize {
        self.events.len()
    }

    /// Fraction of records that produced an event, in 0.0..=1.0.
    pub fn match_rate(&self) -> f64 {
        let total = self.events.len() + self.unmatched.len();
        if total == 0 {
            return 0.0;
        }
        self.events.len() as f64 / total as f64
    }
}

/// Generate the ordered sequence-event stream for a batch of records.
///
/// Records are matched in input order against the priority-sorted template
/// collection; each match yields one event with its three mapping slots
/// resolved against the captured groups. The accumulated events are then
/// stably sorted by timestamp string, which equals chronological order for
/// the fixed-width source format, and enriched with sequence numbers and
/// inter-event deltas.
///
/// Pure function of its inputs: no I/O, no shared state, and it never
/// fails. Unmatched records are tallied, and a timestamp that does not
/// parse simply leaves the adjacent deltas absent.
pub fn generate_sequence_events(
    records: &[LogRecord],
    templates: &[Template],
) -> GenerationOutcome {
    let matcher = PatternMatcher::new(templates);
    let mut events = Vec::new();
    let mut unmatched = Vec::new();

    for record in records {
        let Some(found) = matcher.find_match(&record.message) else {
            unmatched.push(record.line_number);
            continue;
        };

        let template = found.template;
        events.push(SequenceEvent {
            timestamp: record.timestamp.clone(),
            from_entity: resolve_slot(&template.mapping.from, &found.groups),
            to_entity: resolve_slot(&template.mapping.to, &found.groups),
            message: resolve_slot(&template.mapping.message, &found.groups),
            event_type: template.name.clone(),
            metadata: EventMetadata {
                template_name: template.name.clone(),
                template_priority: template.priority,
                log_level: record.severity,
                log_tag: record.tag.clone(),
                matched_groups: found.groups,
                sequence_number: None,
                time_since_previous_seconds: None,
            },
            source: Some(record.clone()),
        });
    }

    // Stable, so equal timestamps keep their input order.
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    GenerationOutcome {
        events: enrich(&events),
        unmatched,
    }
}

/// Assign 1-based sequence numbers and seconds-since-previous deltas. The
/// delta is omitted for the first event and whenever either adjacent
/// timestamp fails to parse; it is never clamped at zero.
fn enrich(events: &[SequenceEvent]) -> Vec<SequenceEvent> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let delta = index.checked_sub(1).and_then(|prev| {
                let previous = parse_log_timestamp(&events[prev].timestamp)?;
                let current = parse_log_timestamp(&event.timestamp)?;
                Some(delta_seconds(previous, current))
            });
            event.enriched(index as u64 + 1, delta)
        })
        .collect()
}
