//! # Prompt Core (The Synthetica pipeline)
//!
//! The "brain" of Synthetica. This crate reads the knowledge graph through
//! `knowledge_graph`, compiles a creative intent into a technical document,
//! resolves it into a production plan and renders that plan for each output
//! target.
//!
//! ## Core Components
//!
//! - **operators**: Named intent transformations with an auditable trace
//! - **compiler**: Runs operator pipelines and derives the technical document
//! - **enrichment**: Resolves abstract directives against the knowledge graph
//! - **rhetoric**: Target-specific rendering policies
//! - **pipeline**: Compile, enrich and render in one call
//! - **collaborators**: Field completion, knowledge-gap filling, session storage
//!
//! ## Design Philosophy
//!
//! - **Trace over errors**: Domain failures inside a run become trace entries; a run always produces prompts
//! - **Knowledge-driven**: Every keyword and reference comes from the graph, located through `config::GraphLayout`
//! - **Extensible**: New operators and rendering policies are registered, not hard-wired

pub mod collaborators;
pub mod compiler;
pub mod config;
pub mod documents;
pub mod enrichment;
pub mod error;
pub mod operators;
pub mod pipeline;
pub mod rhetoric;

#[cfg(test)]
mod fixtures;

pub use collaborators::*;
pub use compiler::*;
pub use config::*;
pub use documents::*;
pub use enrichment::*;
pub use error::*;
pub use operators::*;
pub use pipeline::*;
pub use rhetoric::*;
