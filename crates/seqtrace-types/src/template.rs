use serde::{Deserialize, Serialize};

/// The three entity slots a template maps a matching log line onto.
///
/// Each slot holds a placeholder string; `{groupN}` references the N-th
/// captured group of the template's pattern, and the legacy aliases
/// `{timestamp}`, `{level}`, `{tag}`, `{message}` are bound to groups 1-4.
/// Resolution and sanitization happen in seqtrace-engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceMapping {
    pub from: String,
    pub to: String,
    pub message: String,
}

/// A named, prioritized pattern rule: how to turn a matching log message
/// into a sequence event.
///
/// Lower `priority` wins when several patterns match the same message; ties
/// are broken by the original template order (the engine sorts stably).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    /// Regex source. Compilability is validated by the template loader, not
    /// re-checked by the engine.
    pub pattern: String,
    pub mapping: SequenceMapping,
    pub priority: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Template {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        mapping: SequenceMapping,
        priority: i64,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            mapping,
            priority,
            description: String::new(),
        }
    }
}
