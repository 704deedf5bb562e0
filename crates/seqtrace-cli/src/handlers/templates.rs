use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use seqtrace_templates::{TemplateSet, TemplateSource};

use crate::config::Config;

pub fn list(config: &Config, template_file: Option<PathBuf>) -> Result<()> {
    let path = template_file.or_else(|| config.template_file.clone());
    let set = TemplateSet::load(path.as_deref());

    match set.source {
        TemplateSource::File => println!("Templates loaded from file\n"),
        TemplateSource::Defaults => println!("Using built-in templates\n"),
    }

    println!("{:<10} {:<30} Pattern", "Priority", "Name");
    for template in &set.templates {
        println!(
            "{:<10} {:<30} {}",
            template.priority, template.name, template.pattern
        );
    }
    println!("\n{} templates active", set.templates.len());

    Ok(())
}

pub fn diagram(
    config: &Config,
    template_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = template_file.or_else(|| config.template_file.clone());
    let set = TemplateSet::load(path.as_deref());
    let content = seqtrace_report::mermaid::template_diagram(&set.templates);

    match output {
        Some(path) => {
            std::fs::write(&path, content)?;
            println!("Template diagram written to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}

pub fn validate(template_file: &Path) -> Result<()> {
    let set = TemplateSet::load_from_file(template_file)?;
    let issues = set.validate();
    let colored = std::io::stdout().is_terminal();

    for warning in &set.warnings {
        println!("Skipped: {}", warning);
    }
    for issue in &issues {
        println!("Problem: {}", issue);
    }

    if set.warnings.is_empty() && issues.is_empty() {
        if colored {
            println!("{} ({} templates)", "Valid".green(), set.templates.len());
        } else {
            println!("Valid ({} templates)", set.templates.len());
        }
        Ok(())
    } else {
        anyhow::bail!(
            "Validation found {} problem(s)",
            set.warnings.len() + issues.len()
        )
    }
}
