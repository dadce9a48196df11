//! Operator Registry - name-keyed dispatch of intent transformations.
//!
//! An operator reads and mutates the intent document, may write directives
//! into the technical document, and reports success as a `bool`. Domain
//! failures never abort the pipeline: they are reported through the trace.
//!
//! Operator families:
//! - **Structural**: composition-flow hints (`ImposeSymmetry`, `SetCompositionFlow`)
//! - **Relational**: attach knowledge to a subject (`DefineHybridism`)
//! - **Directive-producing**: validated directives for enrichment
//!   (`CulturalSynthesis`, `SetArchetypalState`, `SetCameraPackage`)

mod builtins;
mod params;

pub use builtins::{
    CULTURAL_SYNTHESIS, DEFINE_HYBRIDISM, IMPOSE_SYMMETRY, SET_ARCHETYPAL_STATE,
    SET_CAMERA_PACKAGE, SET_COMPOSITION_FLOW,
};
pub use params::*;

use knowledge_graph::KnowledgeBroker;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::config::GraphLayout;
use crate::documents::{IntentDocument, TechnicalDocument};

/// Read-only services available to operators.
#[derive(Debug, Clone, Copy)]
pub struct OperatorContext<'a> {
    pub broker: &'a KnowledgeBroker,
    pub layout: &'a GraphLayout,
}

/// Signature shared by every operator.
pub type OperatorFn = fn(
    &OperatorContext<'_>,
    &mut IntentDocument,
    &mut TechnicalDocument,
    &OperatorParams,
) -> bool;

/// What happened when an operator was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorOutcome {
    Applied,
    Rejected,
    Unknown,
}

impl OperatorOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, OperatorOutcome::Applied)
    }
}

/// Lookup table from operator name to behavior, built once at startup.
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: BTreeMap<String, OperatorFn>,
}

impl OperatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in operator.
    pub fn with_builtins() -> Self {
        Self::new()
            .with_operator(IMPOSE_SYMMETRY, builtins::impose_symmetry)
            .with_operator(SET_COMPOSITION_FLOW, builtins::set_composition_flow)
            .with_operator(DEFINE_HYBRIDISM, builtins::define_hybridism)
            .with_operator(CULTURAL_SYNTHESIS, builtins::cultural_synthesis)
            .with_operator(SET_ARCHETYPAL_STATE, builtins::set_archetypal_state)
            .with_operator(SET_CAMERA_PACKAGE, builtins::set_camera_package)
    }

    pub fn with_operator(mut self, name: impl Into<String>, operator: OperatorFn) -> Self {
        self.register(name, operator);
        self
    }

    /// Register an operator, returning the one it replaced.
    pub fn register(&mut self, name: impl Into<String>, operator: OperatorFn) -> Option<OperatorFn> {
        self.operators.insert(name.into(), operator)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(canonical_name(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    /// Apply one operator call.
    ///
    /// Unknown names append a trace entry and change nothing else. On success
    /// the operator's name is appended to the intent's applied-operator log.
    pub fn apply(
        &self,
        ctx: &OperatorContext<'_>,
        call: &OperatorCall,
        intent: &mut IntentDocument,
        technical: &mut TechnicalDocument,
    ) -> OperatorOutcome {
        let name = canonical_name(&call.name);
        let Some(operator) = self.operators.get(name) else {
            warn!(operator = %call.name, "unknown operator");
            technical
                .trace
                .push(format!("Unknown operator '{}': skipped.", call.name));
            return OperatorOutcome::Unknown;
        };

        if operator(ctx, intent, technical, &call.params) {
            debug!(operator = name, "operator applied");
            intent.applied_operators.push(name.to_string());
            OperatorOutcome::Applied
        } else {
            debug!(operator = name, reason = technical.trace.last(), "operator rejected");
            OperatorOutcome::Rejected
        }
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.operators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Accept the legacy `Operator_` prefix on names.
fn canonical_name(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("Operator_").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{CatalystRole, Subject, SynthesisMode};
    use crate::fixtures::{sample_broker, IRIS_VAN_HERPEN, KINNARI, SOLARPUNK};
    use pretty_assertions::assert_eq;

    struct Harness {
        broker: KnowledgeBroker,
        layout: GraphLayout,
        registry: OperatorRegistry,
        intent: IntentDocument,
        technical: TechnicalDocument,
    }

    impl Harness {
        fn new() -> Self {
            let intent = IntentDocument::new()
                .with_subject(Subject::new("Hero", "Primary hybrid subject."));
            let technical = TechnicalDocument::new(intent.id);
            Self {
                broker: sample_broker(),
                layout: GraphLayout::default(),
                registry: OperatorRegistry::with_builtins(),
                intent,
                technical,
            }
        }

        fn apply(&mut self, call: OperatorCall) -> OperatorOutcome {
            let ctx = OperatorContext {
                broker: &self.broker,
                layout: &self.layout,
            };
            self.registry
                .apply(&ctx, &call, &mut self.intent, &mut self.technical)
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = OperatorRegistry::with_builtins();
        assert_eq!(registry.names().count(), 6);
        assert!(registry.contains("DefineHybridism"));
        assert!(registry.contains("Operator_ImposeSymmetry"));
        assert!(!registry.contains("Introspect"));
    }

    #[test]
    fn test_unknown_operator_is_traced_not_fatal() {
        let mut h = Harness::new();
        let outcome = h.apply(OperatorCall::new("Introspect"));

        assert_eq!(outcome, OperatorOutcome::Unknown);
        assert_eq!(h.technical.trace.len(), 1);
        assert!(h.technical.trace.mentions("Introspect"));
        assert!(h.intent.applied_operators.is_empty());
    }

    #[test]
    fn test_impose_symmetry_always_succeeds() {
        let mut h = Harness::new();
        let outcome = h.apply(OperatorCall::new("Operator_ImposeSymmetry"));

        assert!(outcome.is_applied());
        let flow = h.intent.composition_flow.as_ref().unwrap();
        assert_eq!(flow.path, "symmetrical_balance");
        assert_eq!(flow.focal_point.as_deref(), Some("center"));
        assert_eq!(h.intent.applied_operators, vec![IMPOSE_SYMMETRY.to_string()]);
    }

    #[test]
    fn test_set_composition_flow_requires_path() {
        let mut h = Harness::new();
        assert_eq!(
            h.apply(OperatorCall::new(SET_COMPOSITION_FLOW)),
            OperatorOutcome::Rejected
        );
        assert!(h.technical.trace.mentions("'path'"));

        let outcome = h.apply(
            OperatorCall::new(SET_COMPOSITION_FLOW)
                .with_param("path", "golden_spiral")
                .with_param("focal_point", "lower_left"),
        );
        assert!(outcome.is_applied());
        assert_eq!(h.intent.composition_flow.as_ref().unwrap().path, "golden_spiral");
    }

    #[test]
    fn test_define_hybridism_applies_subject_metadata() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new(DEFINE_HYBRIDISM)
                .with_param("subject", "Hero")
                .with_param("ref", KINNARI)
                .with_param("variant", "Pal_Subversive"),
        );

        assert!(outcome.is_applied());
        let subject = h.intent.subject("Hero").unwrap();
        assert_eq!(subject.hybrid_ref.as_deref(), Some(KINNARI));
        assert_eq!(subject.hybrid_variant.as_deref(), Some("Pal_Subversive"));
        assert_eq!(h.intent.applied_operators, vec![DEFINE_HYBRIDISM.to_string()]);
        assert!(h.technical.trace.mentions("Kinnari"));
    }

    #[test]
    fn test_define_hybridism_missing_subject_is_isolated() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new(DEFINE_HYBRIDISM)
                .with_param("subject", "Ghost")
                .with_param("ref", KINNARI),
        );

        assert_eq!(outcome, OperatorOutcome::Rejected);
        assert_eq!(h.technical.trace.len(), 1);
        assert!(h.technical.trace.mentions("'Ghost'"));
        assert!(h.intent.applied_operators.is_empty());
        assert!(h.intent.subject("Hero").unwrap().hybrid_ref.is_none());
    }

    #[test]
    fn test_cultural_synthesis_creates_directive() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new("Operator_CulturalSynthesis")
                .with_param("devouring_culture", SOLARPUNK)
                .with_param("devoured_element", IRIS_VAN_HERPEN)
                .with_param("synthesis_mode", "Narrative"),
        );

        assert!(outcome.is_applied());
        let directive = h.technical.directives.synthesis.as_ref().unwrap();
        assert!(directive.source_a.ends_with("Solarpunk"));
        assert!(directive.source_b.ends_with("Iris van Herpen"));
        assert_eq!(directive.mode, SynthesisMode::Narrative);
    }

    #[test]
    fn test_cultural_synthesis_requires_both_paths() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new(CULTURAL_SYNTHESIS)
                .with_param("source_a", SOLARPUNK)
                .with_param("source_b", "5.0_Masters_Lexicon.Nobody"),
        );

        assert_eq!(outcome, OperatorOutcome::Rejected);
        assert_eq!(h.technical.trace.len(), 1);
        assert!(h.technical.trace.mentions("Nobody"));
        assert!(h.technical.directives.synthesis.is_none());
    }

    #[test]
    fn test_cultural_synthesis_rejects_unknown_mode() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new(CULTURAL_SYNTHESIS)
                .with_param("source_a", SOLARPUNK)
                .with_param("source_b", IRIS_VAN_HERPEN)
                .with_param("mode", "Culinary"),
        );

        assert_eq!(outcome, OperatorOutcome::Rejected);
        assert!(h.technical.trace.mentions("Aesthetic, Narrative, Symbolic"));
    }

    #[test]
    fn test_rerunning_synthesis_overwrites_directive() {
        let mut h = Harness::new();
        h.apply(
            OperatorCall::new(CULTURAL_SYNTHESIS)
                .with_param("source_a", SOLARPUNK)
                .with_param("source_b", IRIS_VAN_HERPEN),
        );
        h.apply(
            OperatorCall::new(CULTURAL_SYNTHESIS)
                .with_param("source_a", IRIS_VAN_HERPEN)
                .with_param("source_b", SOLARPUNK)
                .with_param("mode", "Symbolic"),
        );

        let directive = h.technical.directives.synthesis.as_ref().unwrap();
        assert_eq!(directive.source_a, IRIS_VAN_HERPEN);
        assert_eq!(directive.mode, SynthesisMode::Symbolic);
        assert_eq!(h.intent.applied_operators.len(), 2);
    }

    #[test]
    fn test_set_archetypal_state_validates_state() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new(SET_ARCHETYPAL_STATE)
                .with_param("shadow_state", "Assimilating")
                .with_param("manifestation", "2.0_Semiotics_and_Psychology_Database.Shadow.Anima")
                .with_param("trickster", "Internal_Catalyst"),
        );

        assert!(outcome.is_applied());
        let state = h.intent.archetypal_state.as_ref().unwrap();
        assert_eq!(state.state, "Assimilating");
        assert_eq!(state.catalyst, Some(CatalystRole::InternalCatalyst));
        assert_eq!(
            h.technical.directives.archetypal_state.as_deref(),
            Some("Assimilating")
        );
    }

    #[test]
    fn test_invalid_archetypal_state_lists_legal_values() {
        let mut h = Harness::new();
        let outcome = h.apply(OperatorCall::new(SET_ARCHETYPAL_STATE).with_param("state", "Euphoric"));

        assert_eq!(outcome, OperatorOutcome::Rejected);
        assert_eq!(h.technical.trace.len(), 1);
        assert!(h
            .technical
            .trace
            .mentions("[Assimilating, Projected, Integrated]"));
        assert!(h.intent.archetypal_state.is_none());
        assert!(h.technical.directives.archetypal_state.is_none());
    }

    #[test]
    fn test_invalid_catalyst_rejects_before_mutation() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new(SET_ARCHETYPAL_STATE)
                .with_param("state", "projected")
                .with_param("catalyst", "Bystander"),
        );

        assert_eq!(outcome, OperatorOutcome::Rejected);
        assert!(h.technical.trace.mentions("Internal_Catalyst, External_Agent"));
        assert!(h.intent.archetypal_state.is_none());
    }

    #[test]
    fn test_set_camera_package_records_queries() {
        let mut h = Harness::new();
        let outcome = h.apply(
            OperatorCall::new(SET_CAMERA_PACKAGE)
                .with_param("camera", "Cannon R5")
                .with_param("lens", "Zeiss Supreme"),
        );

        assert!(outcome.is_applied());
        assert_eq!(h.technical.directives.camera_query.as_deref(), Some("Cannon R5"));
        assert_eq!(h.technical.directives.lens_query.as_deref(), Some("Zeiss Supreme"));
        assert!(h.technical.trace.mentions("not listed"));
    }

    #[test]
    fn test_custom_operator_can_be_registered() {
        fn tag_subjects(
            _ctx: &OperatorContext<'_>,
            intent: &mut IntentDocument,
            technical: &mut TechnicalDocument,
            _params: &OperatorParams,
        ) -> bool {
            for subject in &mut intent.subjects {
                subject.description.push_str(" (tagged)");
            }
            technical.trace.push("Tagged subjects.");
            true
        }

        let mut h = Harness::new();
        h.registry.register("TagSubjects", tag_subjects);
        assert!(h.apply(OperatorCall::new("TagSubjects")).is_applied());
        assert!(h.intent.subjects[0].description.ends_with("(tagged)"));
        assert_eq!(h.intent.applied_operators, vec!["TagSubjects".to_string()]);
    }
}
