//! Error types for the prompt pipeline.
//!
//! Nothing inside compile, enrich or render returns an error: failures there
//! are reported through the reasoning trace. These variants cover
//! configuration, graph mutation and the external collaborators.

use knowledge_graph::{BrokerError, LoadError};
use thiserror::Error;

use crate::collaborators::SessionId;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid pipeline configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("completion payload must be a JSON object, found {0}")]
    InvalidPayload(&'static str),

    #[error("field completion failed: {0}")]
    Completion(String),

    #[error("knowledge source failed for topic '{topic}': {message}")]
    KnowledgeSource { topic: String, message: String },

    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("session store failed: {0}")]
    Store(String),
}
