//! Two-source synthesis: a deliberate blend of two knowledge-graph regions.

use knowledge_graph::{path_label, KnowledgeBroker};
use std::collections::HashSet;

use crate::documents::{SynthesisDirective, SynthesisMode};

/// Keywords taken from the first source.
pub const PRIMARY_KEYWORDS: usize = 3;

/// Keywords taken from the second source.
pub const SECONDARY_KEYWORDS: usize = 2;

/// Resolve a synthesis directive into style keywords.
///
/// The result opens with a statement naming both sources and the mode,
/// followed by keywords from each source and a mode-specific closing clause,
/// de-duplicated case-insensitively in first-seen order.
pub fn synthesize(broker: &KnowledgeBroker, directive: &SynthesisDirective) -> Vec<String> {
    let label_a = path_label(&directive.source_a);
    let label_b = path_label(&directive.source_b);

    let mut keywords = vec![format!(
        "{} converges with {} through {} synthesis",
        label_a,
        label_b,
        directive.mode.label().to_lowercase()
    )];
    keywords.extend(leading_keywords(broker, &directive.source_a, PRIMARY_KEYWORDS));
    keywords.extend(leading_keywords(broker, &directive.source_b, SECONDARY_KEYWORDS));

    match directive.mode {
        SynthesisMode::Aesthetic => {}
        SynthesisMode::Narrative => keywords.push(format!(
            "a single narrative throughline where {label_a} and {label_b} share one story"
        )),
        SynthesisMode::Symbolic => keywords.push(format!(
            "symbolic tension between {label_a} and {label_b}"
        )),
    }

    dedup_case_insensitive(keywords)
}

fn leading_keywords(broker: &KnowledgeBroker, path: &str, limit: usize) -> Vec<String> {
    broker
        .flatten_strings(path)
        .into_iter()
        .filter(|keyword| !keyword.trim().is_empty())
        .take(limit)
        .collect()
}

/// Drop later duplicates, comparing case-insensitively.
pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
