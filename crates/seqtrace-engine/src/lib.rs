//! Sequence-event generation engine.
//!
//! Takes parsed log records and a prioritized template collection and
//! produces a chronologically ordered, enriched stream of sequence events.
//! The pipeline has two phases: a per-record matching pass (priority-ordered
//! first-match-wins), then a whole-batch sort and enrichment pass that
//! assigns sequence numbers and inter-event timing deltas.
//!
//! Generation never fails: unmatched records are tallied and skipped, and
//! per-record mapping problems drop that record's event without aborting
//! the batch.

pub mod generator;
pub mod mapper;
pub mod matcher;
pub mod stats;
pub mod timestamp;

pub use generator::{generate_sequence_events, GenerationOutcome};
pub use matcher::{PatternMatcher, TemplateMatch};
pub use stats::{EventStatistics, TimingStats};
