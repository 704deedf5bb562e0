use regex::Regex;
use seqtrace_types::Template;

/// A template paired with its compiled pattern.
struct CompiledTemplate {
    template: Template,
    regex: Regex,
}

/// The outcome of matching one record against the template collection:
/// the winning template and its captured groups, in pattern order.
#[derive(Debug)]
pub struct TemplateMatch<'a> {
    pub template: &'a Template,
    /// Groups that did not participate in the match are carried as empty
    /// strings so positional placeholder indices stay aligned.
    pub groups: Vec<String>,
}

/// Priority-ordered first-match-wins matcher.
///
/// Templates are sorted by ascending priority at construction with a stable
/// sort, so equal priorities keep their input order and the earlier template
/// wins ties. Patterns are compiled once; a pattern that fails to compile is
/// dropped from the matching set rather than failing the whole collection,
/// since pattern validity is the loader's contract.
pub struct PatternMatcher {
    compiled: Vec<CompiledTemplate>,
}

impl PatternMatcher {
    pub fn new(templates: &[Template]) -> Self {
        let mut ordered: Vec<Template> = templates.to_vec();
        ordered.sort_by_key(|t| t.priority);

        let compiled = ordered
            .into_iter()
            .filter_map(|template| {
                Regex::new(&template.pattern)
                    .ok()
                    .map(|regex| CompiledTemplate { template, regex })
            })
            .collect();

        Self { compiled }
    }

    /// Number of templates that compiled and participate in matching.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Test `message` against every pattern in priority order and return
    /// the first match, if any. This is an unanchored search, not a
    /// whole-string match.
    pub fn find_match(&self, message: &str) -> Option<TemplateMatch<'_>> {
        for entry in &self.compiled {
            if let Some(captures) = entry.regex.captures(message) {
                let groups = captures
                    .iter()
                    .skip(1)
                    .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                return Some(TemplateMatch {
                    template: &entry.template,
                    groups,
                });
            }
        }
        None
    }
}
