//! Rendering of analysis artifacts: Mermaid sequence diagrams, JSON
//! exports, and markdown test-evidence reports.
//!
//! Everything here is a pure string pipeline over the event sequence the
//! engine produced. File placement and naming are the caller's concern.

pub mod error;
pub mod evidence;
pub mod json;
pub mod mermaid;

pub use error::{Error, Result};
pub use evidence::{EvidenceOptions, EvidenceReport};
pub use json::ExportDocument;
pub use mermaid::DiagramConfig;
