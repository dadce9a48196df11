//! Reasoning trace - the append-only audit log carried through every stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, append-only list of human-readable decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasoningTrace {
    entries: Vec<String>,
}

impl ReasoningTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    /// Append every entry of `other`, in order.
    pub fn extend_from(&mut self, other: &ReasoningTrace) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Whether any entry contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.contains(needle))
    }
}

impl fmt::Display for ReasoningTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{:>3}. {}", index + 1, entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_is_ordered() {
        let mut trace = ReasoningTrace::new();
        trace.push("first");
        trace.push(String::from("second"));

        assert_eq!(trace.entries(), &["first".to_string(), "second".to_string()]);
        assert_eq!(trace.last(), Some("second"));
        assert!(trace.mentions("sec"));
        assert!(!trace.mentions("third"));
    }

    #[test]
    fn test_extend_appends_after_existing() {
        let mut earlier = ReasoningTrace::new();
        earlier.push("compile");
        let mut later = ReasoningTrace::new();
        later.push("enrich");

        later.extend_from(&earlier);
        assert_eq!(later.iter().collect::<Vec<_>>(), vec!["enrich", "compile"]);
    }

    #[test]
    fn test_display_numbers_entries() {
        let mut trace = ReasoningTrace::new();
        trace.push("one");
        trace.push("two");
        assert_eq!(trace.to_string(), "  1. one\n  2. two\n");
    }
}
