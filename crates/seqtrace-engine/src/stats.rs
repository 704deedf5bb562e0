use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use seqtrace_types::SequenceEvent;

use crate::timestamp::{delta_seconds, parse_log_timestamp};

/// Interval statistics over consecutive events whose timestamps parse.
#[derive(Debug, Clone, Serialize)]
pub struct TimingStats {
    pub min_interval_seconds: f64,
    pub max_interval_seconds: f64,
    pub avg_interval_seconds: f64,
}

/// Aggregate view over a generated event sequence, computed in one pass.
/// Maps are ordered so serialized output is deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct EventStatistics {
    pub total_events: usize,
    pub event_types: BTreeMap<String, usize>,
    /// Every distinct from/to entity, sorted.
    pub participants: Vec<String>,
    /// How often each entity appears as sender or receiver.
    pub participant_counts: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<String>,
    /// Seconds between first and last event, when both timestamps parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_seconds: Option<f64>,
    /// Absent when fewer than two adjacent timestamps parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingStats>,
}

impl EventStatistics {
    pub fn from_events(events: &[SequenceEvent]) -> Self {
        let mut event_types: BTreeMap<String, usize> = BTreeMap::new();
        let mut participants: BTreeSet<String> = BTreeSet::new();
        let mut participant_counts: BTreeMap<String, usize> = BTreeMap::new();

        for event in events {
            *event_types.entry(event.event_type.clone()).or_insert(0) += 1;
            participants.insert(event.from_entity.clone());
            participants.insert(event.to_entity.clone());
            *participant_counts
                .entry(event.from_entity.clone())
                .or_insert(0) += 1;
            *participant_counts
                .entry(event.to_entity.clone())
                .or_insert(0) += 1;
        }

        let first_event = events.first().map(|e| e.timestamp.clone());
        let last_event = events.last().map(|e| e.timestamp.clone());

        let total_duration_seconds = match (&first_event, &last_event) {
            (Some(first), Some(last)) => {
                let start = parse_log_timestamp(first);
                let end = parse_log_timestamp(last);
                match (start, end) {
                    (Some(start), Some(end)) => Some(delta_seconds(start, end)),
                    _ => None,
                }
            }
            _ => None,
        };

        Self {
            total_events: events.len(),
            event_types,
            participants: participants.into_iter().collect(),
            participant_counts,
            first_event,
            last_event,
            total_duration_seconds,
            timing: timing_stats(events),
        }
    }
}

fn timing_stats(events: &[SequenceEvent]) -> Option<TimingStats> {
    let mut intervals = Vec::new();
    for pair in events.windows(2) {
        let (Some(previous), Some(current)) = (
            parse_log_timestamp(&pair[0].timestamp),
            parse_log_timestamp(&pair[1].timestamp),
        ) else {
            continue;
        };
        intervals.push(delta_seconds(previous, current));
    }

    if intervals.is_empty() {
        return None;
    }

    let min = intervals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = intervals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = intervals.iter().sum::<f64>() / intervals.len() as f64;

    Some(TimingStats {
        min_interval_seconds: min,
        max_interval_seconds: max,
        avg_interval_seconds: avg,
    })
}
