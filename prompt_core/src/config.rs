//! Pipeline configuration.
//!
//! Every well-known location in the knowledge graph and every fixed table the
//! enrichment and rhetoric stages consult lives here, so a differently shaped
//! graph only needs a different TOML file. Missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Top-level configuration for [`PromptPipeline`](crate::PromptPipeline).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: GraphLayout,
    pub technical: TechnicalConfig,
    pub cross_references: CrossReferenceTable,
    pub rhetoric: RhetoricConfig,
}

impl PipelineConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, PipelineError> {
        Ok(toml::from_str(source)?)
    }
}

/// Well-known paths into the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLayout {
    /// List of legal archetypal state labels.
    pub archetypal_states: String,

    /// Map keyed by archetypal state, each holding signifier sub-paths.
    pub translation_matrix: String,

    /// Key under each translation-matrix state that lists the signifiers.
    pub signifier_key: String,

    /// Signifier sub-paths containing this marker are routed to references.
    pub references_marker: String,

    /// Historical processes, each listing its physical artifacts.
    pub process_taxonomy: String,

    pub cameras: String,
    pub lenses: String,
    pub design_principles: String,

    /// Hybrid ontology entries, each optionally carrying `Variants`.
    pub hybrid_catalog: String,
}

impl Default for GraphLayout {
    fn default() -> Self {
        Self {
            archetypal_states: "2.0_Semiotics_and_Psychology_Database.2.8_Archetypal_Dynamics_Framework (Jungian).Parameters.Shadow_Integration_State.Values".to_string(),
            translation_matrix: "2.0_Semiotics_and_Psychology_Database.2.8_Archetypal_Dynamics_Framework (Jungian).Translation_Matrix".to_string(),
            signifier_key: "Aesthetic_Signifiers".to_string(),
            references_marker: "5.3_Art_and_Design_References".to_string(),
            process_taxonomy: "10.0_Technical_Execution_Ontology.10.8_Physical_Process_Artifact_Taxonomy".to_string(),
            cameras: "10.0_Technical_Execution_Ontology.10.1_Digital_Cinema_Cameras".to_string(),
            lenses: "10.0_Technical_Execution_Ontology.10.2_Lenses_and_Optics".to_string(),
            design_principles: "1.0_Ontology_and_Philosophy.Design_Principles".to_string(),
            hybrid_catalog: "2.0_Semiotics_and_Psychology_Database.2.7_Theriocephalic_Iconography".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalConfig {
    /// Device hint used when no camera query resolves.
    pub default_device: String,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            default_device: "High-fidelity digital render".to_string(),
        }
    }
}

/// A bonus reference added when the concept mentions one of `subjects`
/// together with one of `themes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossReferenceRule {
    pub subjects: Vec<String>,
    pub themes: Vec<String>,
    pub reference: String,
}

impl CrossReferenceRule {
    pub fn matches(&self, concept: &str) -> bool {
        self.subjects.iter().any(|s| concept.contains(s.as_str()))
            && self.themes.iter().any(|t| concept.contains(t.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossReferenceTable {
    pub rules: Vec<CrossReferenceRule>,
}

impl Default for CrossReferenceTable {
    fn default() -> Self {
        Self {
            rules: vec![CrossReferenceRule {
                subjects: vec!["Kinnari".to_string(), "Kamdhenu".to_string()],
                themes: vec![
                    "empowered female hybrid".to_string(),
                    "feminist critique".to_string(),
                ],
                reference: "Gogi_Saroj_Pal".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhetoricConfig {
    /// Tokens appended to the poetic-fragment policy's output.
    pub parameter_tokens: Vec<String>,
}

impl Default for RhetoricConfig {
    fn default() -> Self {
        Self {
            parameter_tokens: vec!["--ar 16:9".to_string(), "--v 6".to_string()],
        }
    }
}
