//! Knowledge-gap filling.
//!
//! Paths the pipeline needs but the graph lacks are backfilled from an
//! external [`KnowledgeSource`]. Fetching is the collaborator's business
//! (timeouts and retries included); this module only decides what to ask for
//! and where the answer goes.

use chrono::{DateTime, Utc};
use knowledge_graph::{path_label, KnowledgeBroker};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::PipelineError;

/// One external article about a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// External knowledge, keyed by source name.
pub trait KnowledgeSource {
    fn gather(&self, topic: &str) -> Result<BTreeMap<String, SourceEntry>, PipelineError>;
}

/// A path the caller needs, with an optional search hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRequest {
    pub path: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl GapRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Search topic: the hint, else the path's last segment in words.
    pub fn topic(&self) -> String {
        match self.hint.as_deref().map(str::trim) {
            Some(hint) if !hint.is_empty() => hint.to_string(),
            _ => path_label(&self.path).replace('_', " "),
        }
    }
}

/// An entry that was written into the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapSuggestion {
    pub path: String,
    pub topic: String,
    pub sources: BTreeMap<String, SourceEntry>,
    pub generated_at: DateTime<Utc>,
}

impl GapSuggestion {
    /// The value injected at [`path`](Self::path).
    pub fn to_entry(&self) -> Value {
        let sources: Map<String, Value> = self
            .sources
            .iter()
            .map(|(name, entry)| {
                (
                    name.clone(),
                    json!({"title": entry.title, "summary": entry.summary, "url": entry.url}),
                )
            })
            .collect();
        json!({
            "auto_generated": true,
            "topic": self.topic,
            "sources": sources,
        })
    }
}

pub struct KnowledgeGapResolver<S> {
    broker: Arc<KnowledgeBroker>,
    source: S,
    generated: Vec<GapSuggestion>,
}

impl<S: KnowledgeSource> KnowledgeGapResolver<S> {
    pub fn new(broker: Arc<KnowledgeBroker>, source: S) -> Self {
        Self {
            broker,
            source,
            generated: Vec::new(),
        }
    }

    /// Backfill every unresolved path in `requests`.
    ///
    /// Paths that already resolve are left alone. Source failures, empty
    /// answers and failed injections are logged and skipped. Returns the
    /// suggestions injected by this call.
    pub fn ensure_paths(&mut self, requests: &[GapRequest]) -> Vec<GapSuggestion> {
        let mut applied = Vec::new();
        for request in requests {
            if request.path.trim().is_empty() || self.broker.exists(&request.path) {
                continue;
            }

            let topic = request.topic();
            let sources = match self.source.gather(&topic) {
                Ok(sources) if !sources.is_empty() => sources,
                Ok(_) => {
                    info!(path = %request.path, %topic, "no external knowledge found");
                    continue;
                }
                Err(err) => {
                    warn!(path = %request.path, %topic, error = %err, "knowledge source failed");
                    continue;
                }
            };

            let suggestion = GapSuggestion {
                path: request.path.clone(),
                topic,
                sources,
                generated_at: Utc::now(),
            };
            if let Err(err) = self.broker.inject(&suggestion.path, suggestion.to_entry()) {
                warn!(path = %suggestion.path, error = %err, "failed to inject knowledge entry");
                continue;
            }

            info!(
                path = %suggestion.path,
                topic = %suggestion.topic,
                sources = suggestion.sources.len(),
                "knowledge gap filled"
            );
            applied.push(suggestion.clone());
            self.generated.push(suggestion);
        }
        applied
    }

    /// Every suggestion injected over this resolver's lifetime.
    pub fn generated(&self) -> &[GapSuggestion] {
        &self.generated
    }
}
