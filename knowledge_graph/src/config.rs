//! Broker configuration.

use serde::{Deserialize, Serialize};

use crate::LoadError;

/// Tunable heuristics for the knowledge broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// A map is treated as an entity lexicon when the share of its direct
    /// values that are maps is strictly greater than this.
    pub lexicon_threshold: f64,

    /// Minimum similarity ratio (0.0-1.0) for a fuzzy match to be accepted.
    pub fuzzy_cutoff: f64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            lexicon_threshold: 0.8,
            fuzzy_cutoff: 0.6,
        }
    }
}

impl BrokerConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(source)?)
    }
}
