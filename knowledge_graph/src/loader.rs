//! One-time bootstrap of the knowledge graph.
//!
//! Loading is the only fatal step in the system: a missing or corrupt graph is
//! reported with every location that was tried.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{value_kind, BrokerConfig, KnowledgeBroker, LoadError};

/// Parse a graph from JSON text. The root must be an object.
pub fn parse_graph(source: &str) -> Result<Value, LoadError> {
    let graph: Value = serde_json::from_str(source)?;
    if !graph.is_object() {
        return Err(LoadError::NotAnObject(value_kind(&graph)));
    }
    Ok(graph)
}

/// Read and parse a graph file. Errors carry the file's location.
pub fn load_graph_file(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph(&text).map_err(|err| match err {
        LoadError::Syntax(source) => LoadError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Tries an ordered list of candidate locations and loads the first that exists.
#[derive(Debug, Clone, Default)]
pub struct GraphLoader {
    candidates: Vec<PathBuf>,
    config: BrokerConfig,
}

impl GraphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate location. Candidates are tried in insertion order.
    pub fn with_candidate(mut self, path: impl Into<PathBuf>) -> Self {
        self.candidates.push(path.into());
        self
    }

    /// Use these heuristics for the broker built by [`load_broker`](Self::load_broker).
    pub fn with_config(mut self, config: BrokerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Load the first existing candidate, returning its location and graph.
    ///
    /// A candidate that exists but cannot be read or parsed is an error; it is
    /// not skipped in favour of later candidates.
    pub fn load(&self) -> Result<(PathBuf, Value), LoadError> {
        for candidate in &self.candidates {
            if !candidate.is_file() {
                debug!(path = %candidate.display(), "knowledge graph candidate missing");
                continue;
            }
            let graph = load_graph_file(candidate)?;
            info!(path = %candidate.display(), "knowledge graph loaded");
            return Ok((candidate.clone(), graph));
        }
        Err(LoadError::NotFound {
            attempted: self.candidates.clone(),
        })
    }

    /// Load the graph and wrap it in a broker.
    pub fn load_broker(&self) -> Result<KnowledgeBroker, LoadError> {
        let (_, graph) = self.load()?;
        Ok(KnowledgeBroker::with_config(graph, self.config.clone()))
    }
}
