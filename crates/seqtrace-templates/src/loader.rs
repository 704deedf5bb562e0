use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::defaults::default_templates;
use crate::error::{Error, Result};
use seqtrace_types::Template;

/// Valid priority range (1 = highest, 999 = lowest).
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i64> = 1..=999;

/// Where a template set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    /// Loaded from a configuration file.
    File,
    /// Built-in defaults (file missing or unreadable).
    Defaults,
}

/// A problem found while loading or validating templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub template: String,
    pub problem: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.template, self.problem)
    }
}

#[derive(Deserialize)]
struct TemplateDocument {
    templates: Vec<serde_json::Value>,
}

/// A loaded, priority-sorted template collection.
///
/// Loading never fails outright: a missing or unreadable file falls back to
/// the built-in defaults, and individually invalid entries are skipped with
/// a recorded warning. Strict validation is available via [`validate`].
///
/// [`validate`]: TemplateSet::validate
#[derive(Debug)]
pub struct TemplateSet {
    pub templates: Vec<Template>,
    pub source: TemplateSource,
    /// Per-entry problems encountered while loading (skipped entries).
    pub warnings: Vec<ValidationIssue>,
}

impl TemplateSet {
    /// Load templates from `path`, falling back to defaults if the file is
    /// missing or cannot be parsed. `None` loads the defaults directly.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::defaults();
        };

        if !path.is_file() {
            return Self::defaults();
        }

        match Self::load_from_file(path) {
            Ok(set) => set,
            Err(_) => Self::defaults(),
        }
    }

    /// Strict load: IO and document-level JSON errors propagate; entry-level
    /// problems are skipped and recorded as warnings.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: TemplateDocument = serde_json::from_str(&content).map_err(|err| {
            if err.is_data() {
                Error::InvalidDocument("missing 'templates' array".to_string())
            } else {
                Error::Json(err)
            }
        })?;

        let mut templates = Vec::new();
        let mut warnings = Vec::new();

        for entry in document.templates {
            let label = entry
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string();

            let template: Template = match serde_json::from_value(entry) {
                Ok(t) => t,
                Err(err) => {
                    warnings.push(ValidationIssue {
                        template: label,
                        problem: format!("missing or malformed field: {}", err),
                    });
                    continue;
                }
            };

            if regex::Regex::new(&template.pattern).is_err() {
                warnings.push(ValidationIssue {
                    template: template.name,
                    problem: "pattern does not compile".to_string(),
                });
                continue;
            }

            if !PRIORITY_RANGE.contains(&template.priority) {
                warnings.push(ValidationIssue {
                    template: template.name,
                    problem: format!("priority {} outside 1..=999", template.priority),
                });
                continue;
            }

            templates.push(template);
        }

        let mut set = Self {
            templates,
            source: TemplateSource::File,
            warnings,
        };
        set.sort_by_priority();
        Ok(set)
    }

    pub fn defaults() -> Self {
        let mut set = Self {
            templates: default_templates(),
            source: TemplateSource::Defaults,
            warnings: Vec::new(),
        };
        set.sort_by_priority();
        set
    }

    /// Stable sort, preserving input order among equal priorities. The
    /// engine relies on this order for its tie-break rule.
    fn sort_by_priority(&mut self) {
        self.templates.sort_by_key(|t| t.priority);
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Cross-template checks: duplicate names, priority range, pattern
    /// compilability. Loader-skipped entries never reach this point, so
    /// issues here indicate templates constructed programmatically.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let mut seen = BTreeSet::new();
        for template in &self.templates {
            if !seen.insert(template.name.as_str()) {
                issues.push(ValidationIssue {
                    template: template.name.clone(),
                    problem: "duplicate template name".to_string(),
                });
            }

            if !PRIORITY_RANGE.contains(&template.priority) {
                issues.push(ValidationIssue {
                    template: template.name.clone(),
                    problem: format!("priority {} outside 1..=999", template.priority),
                });
            }

            if regex::Regex::new(&template.pattern).is_err() {
                issues.push(ValidationIssue {
                    template: template.name.clone(),
                    problem: "pattern does not compile".to_string(),
                });
            }
        }

        issues
    }
}
