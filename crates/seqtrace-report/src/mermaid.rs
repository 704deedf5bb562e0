use seqtrace_types::SequenceEvent;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Rendering limits for the two diagram flavors.
#[derive(Debug, Clone)]
pub struct DiagramConfig {
    /// How many events the overview diagram shows.
    pub overview_event_limit: usize,
    /// Detailed diagrams beyond this size are split into pages.
    pub max_events_per_diagram: usize,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            overview_event_limit: 20,
            max_events_per_diagram: 1000,
        }
    }
}

/// Mermaid identifier for an entity. Entity names are already sanitized by
/// the mapping step; Mermaid additionally requires the identifier to start
/// with a letter.
pub fn participant_name(entity: &str) -> String {
    if entity.is_empty() {
        return "Unknown".to_string();
    }
    match entity.chars().next() {
        Some(c) if c.is_alphabetic() => entity.to_string(),
        _ => format!("P_{entity}"),
    }
}

/// Distinct participant identifiers across the events, sorted.
fn participants(events: &[SequenceEvent]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for event in events {
        names.insert(participant_name(&event.from_entity));
        names.insert(participant_name(&event.to_entity));
    }
    names.into_iter().collect()
}

fn arrow_line(event: &SequenceEvent) -> String {
    format!(
        "    {}->>{}: {}\n",
        participant_name(&event.from_entity),
        participant_name(&event.to_entity),
        event.message
    )
}

/// Overview diagram: the first `overview_event_limit` events, message
/// arrows only.
pub fn overview_diagram(events: &[SequenceEvent], config: &DiagramConfig) -> String {
    let limited = &events[..events.len().min(config.overview_event_limit)];
    let mut out = String::from("# Sequence Overview\n\n```mermaid\nsequenceDiagram\n");

    for participant in participants(limited) {
        let _ = writeln!(out, "    participant {participant}");
    }
    out.push('\n');

    for event in limited {
        out.push_str(&arrow_line(event));
    }

    out.push_str("```\n\n");
    let _ = writeln!(
        out,
        "*Overview showing first {} events of {} total*",
        limited.len(),
        events.len()
    );
    out
}

/// Detailed diagram: every event, with a timestamp note every tenth event
/// and an error note after events triggered by error or fatal log lines.
/// Event counts over the configured maximum are split into pages.
pub fn detailed_diagram(events: &[SequenceEvent], config: &DiagramConfig) -> String {
    if events.len() > config.max_events_per_diagram {
        return paginated_diagrams(events, config);
    }

    let mut out = String::from("# Detailed Sequence Diagram\n\n");
    out.push_str(&detailed_body(events));
    let _ = writeln!(
        out,
        "*Detailed view showing all {} events with timestamps*",
        events.len()
    );
    out
}

fn detailed_body(events: &[SequenceEvent]) -> String {
    let participants = participants(events);
    let mut out = String::from("```mermaid\nsequenceDiagram\n");

    for participant in &participants {
        let _ = writeln!(out, "    participant {participant}");
    }
    out.push('\n');

    for (index, event) in events.iter().enumerate() {
        if index % 10 == 0 {
            if let (Some(first), Some(last)) = (participants.first(), participants.last()) {
                let _ = writeln!(out, "    Note over {first},{last}: {}", event.timestamp);
            }
        }

        out.push_str(&arrow_line(event));

        if event.metadata.log_level.is_error() {
            let _ = writeln!(
                out,
                "    Note over {}: Error Event",
                participant_name(&event.to_entity)
            );
        }
    }

    out.push_str("```\n\n");
    out
}

fn paginated_diagrams(events: &[SequenceEvent], config: &DiagramConfig) -> String {
    let mut out = String::from("# Detailed Sequence Diagram (Paginated)\n\n");
    let chunks: Vec<_> = events.chunks(config.max_events_per_diagram).collect();
    let total_pages = chunks.len();

    for (page, chunk) in chunks.into_iter().enumerate() {
        let _ = writeln!(out, "## Page {} of {}\n", page + 1, total_pages);
        out.push_str(&detailed_body(chunk));
        let _ = writeln!(out, "*Page showing {} events*\n", chunk.len());
    }

    out
}

/// Flowchart view of a template collection: one node per template with its
/// priority, truncated pattern, and entity mapping, plus a detail section.
pub fn template_diagram(templates: &[seqtrace_types::Template]) -> String {
    let mut out = String::from(
        "# Template Configuration Diagram\n\n```mermaid\ngraph TD\n    A[Template System] --> B[Loaded Templates]\n\n",
    );

    for (index, template) in templates.iter().enumerate() {
        let node = index + 1;
        let pattern = truncate_pattern(&template.pattern);
        let _ = writeln!(out, "    B --> T{node}[{}]", template.name);
        let _ = writeln!(
            out,
            "    T{node} --> |Priority: {}| P{node}[{pattern}]",
            template.priority
        );
        let _ = writeln!(
            out,
            "    T{node} --> |Mapping| M{node}[{} to {}]",
            template.mapping.from, template.mapping.to
        );
    }

    out.push_str("```\n\n## Template Details\n\n");
    for template in templates {
        let _ = writeln!(out, "### {}\n", template.name);
        if !template.description.is_empty() {
            let _ = writeln!(out, "{}\n", template.description);
        }
        let _ = writeln!(out, "- **Priority**: {}", template.priority);
        let _ = writeln!(out, "- **Pattern**: `{}`", template.pattern);
        let _ = writeln!(
            out,
            "- **Mapping**: {} -> {} ({})\n",
            template.mapping.from, template.mapping.to, template.mapping.message
        );
    }

    out
}

fn truncate_pattern(pattern: &str) -> String {
    const LIMIT: usize = 50;
    if pattern.chars().count() <= LIMIT {
        return pattern.to_string();
    }
    let cut: String = pattern.chars().take(LIMIT).collect();
    format!("{cut}...")
}

/// Check that rendered output carries the structural Mermaid elements.
/// Returns the list of missing elements, empty when the diagram is sound.
pub fn validate_syntax(content: &str) -> Vec<String> {
    ["sequenceDiagram", "participant", "->>"]
        .iter()
        .filter(|element| !content.contains(**element))
        .map(|element| format!("missing {element}"))
        .collect()
}
