use anyhow::{Context, Result};
use chrono::Local;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use seqtrace_engine::generate_sequence_events;
use seqtrace_parser::{read_log_lines, FilterCriteria, LogLineParser};
use seqtrace_report::{
    mermaid, DiagramConfig, EvidenceOptions, EvidenceReport, ExportDocument,
};
use seqtrace_templates::{TemplateSet, TemplateSource};
use seqtrace_types::Severity;

use crate::args::AnalyzeArgs;
use crate::config::Config;

pub fn handle(config: &Config, args: AnalyzeArgs) -> Result<()> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    // Read and parse
    let lines = read_log_lines(&args.log_file)
        .with_context(|| format!("Failed to read {}", args.log_file.display()))?;
    let outcome = LogLineParser::new().parse(&lines);
    let stats = outcome.stats();

    // Filter
    let criteria = build_criteria(&args)?;
    let records = criteria.apply(outcome.records);

    // Templates
    let template_path = args
        .template_file
        .as_deref()
        .or(config.template_file.as_deref());
    let set = TemplateSet::load(template_path);
    if let Some(path) = template_path {
        if set.source == TemplateSource::Defaults {
            eprintln!(
                "Warning: could not load templates from {}, using built-in templates",
                path.display()
            );
        }
    }
    for warning in &set.warnings {
        eprintln!("Warning: skipped template {}", warning);
    }

    // Generate
    let generation = generate_sequence_events(&records, &set.templates);

    // Diagrams
    let diagram_config = DiagramConfig {
        overview_event_limit: config.overview_event_limit,
        max_events_per_diagram: config.max_events_per_diagram,
    };
    let overview = mermaid::overview_diagram(&generation.events, &diagram_config);
    let detailed = mermaid::detailed_diagram(&generation.events, &diagram_config);
    for (name, content) in [("overview", &overview), ("detailed", &detailed)] {
        let problems = mermaid::validate_syntax(content);
        if !generation.events.is_empty() && !problems.is_empty() {
            eprintln!("Warning: {} diagram: {}", name, problems.join(", "));
        }
    }
    write_artifact(&output_dir, "overview_seq.md", &overview)?;
    write_artifact(&output_dir, "detail_seq.md", &detailed)?;

    // JSON export
    let document = ExportDocument::new(
        generation.events.clone(),
        Some(records.clone()),
        Some(set.templates.clone()),
    );
    write_artifact(&output_dir, "sequence_events.json", &document.to_pretty_string()?)?;

    // Evidence report, only when a test id was supplied
    let mut evidence_path = None;
    if let Some(test_id) = &args.test_id {
        let mut options = EvidenceOptions::new(test_id, args.log_file.display().to_string());
        options.environment = args.environment.clone();
        options.compliance_mode = args.compliance;

        let report = EvidenceReport::build(&options, &generation.events, &records);
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let report_name = format!("test_evidence_{test_id}_{stamp}.md");
        write_artifact(&output_dir, &report_name, &report.content)?;

        let metadata_name = format!("evidence_metadata_{test_id}.json");
        write_artifact(
            &output_dir,
            &metadata_name,
            &serde_json::to_string_pretty(&report.metadata)?,
        )?;
        evidence_path = Some(output_dir.join(report_name));
    }

    print_summary(
        stats.total_lines,
        records.len(),
        generation.events.len(),
        generation.unmatched.len(),
        &output_dir,
        evidence_path.as_deref(),
    );

    Ok(())
}

fn build_criteria(args: &AnalyzeArgs) -> Result<FilterCriteria> {
    let min_severity = match args.level.as_deref() {
        None => None,
        Some(code) => {
            let upper = code.to_uppercase();
            match upper.as_str() {
                "V" | "D" | "I" | "W" | "E" | "F" => Some(Severity::from_code(&upper)),
                _ => anyhow::bail!("Unknown log level: {} (expected V, D, I, W, E, or F)", code),
            }
        }
    };

    Ok(FilterCriteria {
        keyword: args.keyword.clone(),
        tag: args.tag.clone(),
        min_severity,
    })
}

fn write_artifact(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn print_summary(
    total_lines: usize,
    records: usize,
    events: usize,
    unmatched: usize,
    output_dir: &Path,
    evidence_path: Option<&Path>,
) {
    let colored = std::io::stdout().is_terminal();

    if colored {
        println!("{}", "Analysis complete".green().bold());
    } else {
        println!("Analysis complete");
    }
    println!("  Lines read:       {}", total_lines);
    println!("  Records kept:     {}", records);
    if colored && events == 0 && records > 0 {
        println!("  Events generated: {}", events.to_string().yellow());
    } else {
        println!("  Events generated: {}", events);
    }
    println!("  Unmatched:        {}", unmatched);
    println!();
    println!("Artifacts written to {}", output_dir.display());
    if let Some(path) = evidence_path {
        println!("Evidence report: {}", path.display());
    }
}
