//! Item description parsing.
//!
//! Listing descriptions arrive as one string. The listing view splits it
//! into display sections on a delimiter and shows a leading bracketed tag
//! (`【リペア済】`, `[Repaired]`) as the section's label.

/// Delimiter used when the caller has no preference.
pub const DEFAULT_DELIMITER: char = '\n';

/// One display section of a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Leading bracketed tag, without the brackets.
    pub label: Option<String>,
    /// Remaining text, trimmed.
    pub body: String,
}

/// Split `description` into sections.
///
/// Fragments are trimmed and empty ones dropped, so an empty or
/// delimiter-only description yields no sections. A fragment that is only
/// a tag yields a section with an empty body.
pub fn parse_sections(description: &str, delimiter: char) -> Vec<Section> {
    description
        .split(delimiter)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(parse_fragment)
        .collect()
}

fn parse_fragment(fragment: &str) -> Section {
    for (open, close) in [('【', '】'), ('[', ']')] {
        if let Some(rest) = fragment.strip_prefix(open) {
            if let Some((label, body)) = rest.split_once(close) {
                let label = label.trim();
                if !label.is_empty() {
                    return Section {
                        label: Some(label.to_string()),
                        body: body.trim().to_string(),
                    };
                }
            }
        }
    }

    Section {
        label: None,
        body: fragment.to_string(),
    }
}
