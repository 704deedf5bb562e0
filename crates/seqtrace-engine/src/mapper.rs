//! Placeholder resolution and identifier sanitization for template
//! mapping slots.

/// One `{...}` token recognized inside a mapping slot.
///
/// The legacy aliases are fixed bindings to the first four captured groups,
/// independent of what those groups actually capture for a given pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    /// `{groupN}`, 1-based index into the captured groups.
    Group(usize),
    /// `{timestamp}`, alias for group 1.
    Timestamp,
    /// `{level}`, alias for group 2.
    Level,
    /// `{tag}`, alias for group 3.
    Tag,
    /// `{message}`, alias for group 4.
    Message,
}

impl Placeholder {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "timestamp" => Some(Placeholder::Timestamp),
            "level" => Some(Placeholder::Level),
            "tag" => Some(Placeholder::Tag),
            "message" => Some(Placeholder::Message),
            _ => {
                let index: usize = token.strip_prefix("group")?.parse().ok()?;
                (index >= 1).then_some(Placeholder::Group(index))
            }
        }
    }

    /// Resolve against the captured groups. A `{groupN}` whose index is out
    /// of range resolves to `None`, which keeps the token literal; an alias
    /// whose group is missing resolves to the empty string.
    fn resolve<'a>(self, groups: &'a [String]) -> Option<&'a str> {
        match self {
            Placeholder::Group(n) => groups.get(n - 1).map(String::as_str),
            Placeholder::Timestamp => Some(groups.first().map_or("", String::as_str)),
            Placeholder::Level => Some(groups.get(1).map_or("", String::as_str)),
            Placeholder::Tag => Some(groups.get(2).map_or("", String::as_str)),
            Placeholder::Message => Some(groups.get(3).map_or("", String::as_str)),
        }
    }
}

/// Substitute every recognized placeholder in `slot` with its captured
/// value. Unrecognized `{...}` tokens and out-of-range `{groupN}` stay
/// literal.
pub fn substitute(slot: &str, groups: &[String]) -> String {
    let mut out = String::with_capacity(slot.len());
    let mut rest = slot;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match Placeholder::parse(token).and_then(|p| p.resolve(groups)) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(token);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // No closing brace, keep the remainder literal.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Reduce a resolved string to a safe identifier: keep alphanumerics,
/// underscore, whitespace and hyphen, trim, then collapse each whitespace
/// run into a single underscore. An empty result becomes `"Unknown"`.
pub fn sanitize(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let collapsed: String = kept
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    if collapsed.is_empty() {
        "Unknown".to_string()
    } else {
        collapsed
    }
}

/// Resolve one mapping slot: substitution followed by sanitization. An
/// empty slot skips substitution and yields `"Unknown"` directly.
pub fn resolve_slot(slot: &str, groups: &[String]) -> String {
    if slot.is_empty() {
        return "Unknown".to_string();
    }
    sanitize(&substitute(slot, groups))
}
