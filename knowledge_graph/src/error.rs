//! Error types for the knowledge graph.
//!
//! Lookups never fail: an unresolved path is answered with `None`. Errors are
//! reserved for mutation and for the one-time bootstrap.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when mutating the graph.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("cannot inject a value at an empty path")]
    EmptyPath,

    #[error("cannot inject at '{path}': encountered a {found} where a map was expected")]
    NotAContainer { path: String, found: &'static str },

    #[error("cannot inject at '{path}': '{segment}' is not an index into a list of {len}")]
    BadIndex {
        path: String,
        segment: String,
        len: usize,
    },
}

/// Fatal errors raised while bootstrapping the graph.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("knowledge graph not found (attempted: {})", join_paths(.attempted))]
    NotFound { attempted: Vec<PathBuf> },

    #[error("failed to read knowledge graph at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("knowledge graph at {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("knowledge graph is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("knowledge graph root must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("invalid broker configuration: {0}")]
    Config(#[from] toml::de::Error),
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no locations configured".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
