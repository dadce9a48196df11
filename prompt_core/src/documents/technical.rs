//! Intermediate technical document - the compiler's output.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::intent::fold_label;
use super::{IntentId, ReasoningTrace};

/// How two knowledge-graph regions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynthesisMode {
    Aesthetic,
    Narrative,
    Symbolic,
}

impl SynthesisMode {
    pub const ALL: [SynthesisMode; 3] = [
        SynthesisMode::Aesthetic,
        SynthesisMode::Narrative,
        SynthesisMode::Symbolic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SynthesisMode::Aesthetic => "Aesthetic",
            SynthesisMode::Narrative => "Narrative",
            SynthesisMode::Symbolic => "Symbolic",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = fold_label(label);
        Self::ALL
            .into_iter()
            .find(|mode| fold_label(mode.label()) == wanted)
    }
}

impl Default for SynthesisMode {
    fn default() -> Self {
        SynthesisMode::Aesthetic
    }
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Request to blend two knowledge-graph regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisDirective {
    pub source_a: String,
    pub source_b: String,
    pub mode: SynthesisMode,
}

/// Directives the compiler could not resolve on its own.
///
/// Each field is written at most once per operator run; a later write
/// replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractDirectives {
    pub synthesis: Option<SynthesisDirective>,
    pub archetypal_state: Option<String>,
    pub camera_query: Option<String>,
    pub lens_query: Option<String>,
    pub historical_process: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDocument {
    pub source_intent: IntentId,
    pub trace: ReasoningTrace,
    pub concept: String,
    pub composition: Option<String>,
    pub directives: AbstractDirectives,
}

impl TechnicalDocument {
    pub fn new(source_intent: IntentId) -> Self {
        Self {
            source_intent,
            trace: ReasoningTrace::new(),
            concept: String::new(),
            composition: None,
            directives: AbstractDirectives::default(),
        }
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = concept.into();
        self
    }
}
