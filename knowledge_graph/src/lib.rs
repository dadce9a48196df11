//! # Knowledge Graph (The Codex)
//!
//! The "source of truth" crate for Synthetica. It owns the static reference
//! knowledge that the prompt pipeline consults and answers questions about it.
//! It contains no pipeline logic.
//!
//! ## Core Components
//!
//! - **broker**: Path resolution, flattening, validation and fuzzy matching
//! - **config**: Tunable heuristics for the broker
//! - **loader**: One-time bootstrap of the graph from JSON
//!
//! ## Design Philosophy
//!
//! - **Schema-less**: The graph is an irregular tree of maps, lists and scalars; keys may contain the path separator
//! - **Read-mostly**: Loaded once, shared between requests, mutated only to backfill gaps
//! - **Never throws on lookups**: An absent path is a normal answer, not an error

pub mod broker;
pub mod config;
pub mod error;
pub mod loader;

pub use broker::*;
pub use config::*;
pub use error::*;
pub use loader::*;
