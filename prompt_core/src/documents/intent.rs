//! Creative intent document - what the user wants produced.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for intent documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(pub Uuid);

impl IntentId {
    /// Create a new random intent ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IntentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something depicted in the work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub description: String,

    /// Knowledge-graph path of the hybrid ontology this subject embodies.
    pub hybrid_ref: Option<String>,

    /// Variant name under the ontology's `Variants` map.
    pub hybrid_variant: Option<String>,
}

impl Subject {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            hybrid_ref: None,
            hybrid_variant: None,
        }
    }

    pub fn with_hybrid(mut self, reference: impl Into<String>, variant: Option<String>) -> Self {
        self.hybrid_ref = Some(reference.into());
        self.hybrid_variant = variant;
        self
    }
}

/// How the eye travels through the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionFlow {
    pub path: String,
    pub focal_point: Option<String>,
}

impl CompositionFlow {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            focal_point: None,
        }
    }

    pub fn with_focal_point(mut self, focal_point: impl Into<String>) -> Self {
        self.focal_point = Some(focal_point.into());
        self
    }
}

/// Role of the trickster figure in the archetypal dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalystRole {
    #[serde(rename = "Internal_Catalyst")]
    InternalCatalyst,
    #[serde(rename = "External_Agent")]
    ExternalAgent,
}

impl CatalystRole {
    pub const ALL: [CatalystRole; 2] = [CatalystRole::InternalCatalyst, CatalystRole::ExternalAgent];

    pub fn label(&self) -> &'static str {
        match self {
            CatalystRole::InternalCatalyst => "Internal_Catalyst",
            CatalystRole::ExternalAgent => "External_Agent",
        }
    }

    /// Parse a label, ignoring case and `_`/space differences.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = fold_label(label);
        Self::ALL
            .into_iter()
            .find(|role| fold_label(role.label()) == wanted)
    }
}

impl fmt::Display for CatalystRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn fold_label(label: &str) -> String {
    label.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Jungian shadow-integration descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypalState {
    /// One of the legal states enumerated in the knowledge graph.
    pub state: String,
    pub manifestation: Option<String>,
    pub catalyst: Option<CatalystRole>,
}

impl ArchetypalState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            manifestation: None,
            catalyst: None,
        }
    }
}

/// The mutable input artifact of a creative request.
///
/// Operators mutate it in place during compilation; afterwards it is only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDocument {
    pub id: IntentId,
    pub narrative: Option<String>,
    pub subjects: Vec<Subject>,
    pub composition_flow: Option<CompositionFlow>,
    pub archetypal_state: Option<ArchetypalState>,
    pub historical_process: Option<String>,

    /// Names of operators that succeeded, in application order.
    pub applied_operators: Vec<String>,
}

impl IntentDocument {
    pub fn new() -> Self {
        Self {
            id: IntentId::new(),
            narrative: None,
            subjects: Vec::new(),
            composition_flow: None,
            archetypal_state: None,
            historical_process: None,
            applied_operators: Vec::new(),
        }
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn with_composition_flow(mut self, flow: CompositionFlow) -> Self {
        self.composition_flow = Some(flow);
        self
    }

    pub fn with_archetypal_state(mut self, state: ArchetypalState) -> Self {
        self.archetypal_state = Some(state);
        self
    }

    pub fn with_historical_process(mut self, process: impl Into<String>) -> Self {
        self.historical_process = Some(process.into());
        self
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn subject_mut(&mut self, id: &str) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.id == id)
    }
}

impl Default for IntentDocument {
    fn default() -> Self {
        Self::new()
    }
}
