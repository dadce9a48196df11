//! Reasoning Compiler - turns an intent document into a technical document.
//!
//! Compilation runs in two halves:
//! 1. **Operators**: each pipeline entry is applied in order; later operators
//!    observe what earlier ones changed
//! 2. **Derivation**: concept, composition, archetypal state and historical
//!    process are projected from the (now final) intent document
//!
//! Every derivation step appends exactly one trace entry.

use knowledge_graph::{path_label, KnowledgeBroker};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::GraphLayout;
use crate::documents::{CompositionFlow, IntentDocument, Subject, TechnicalDocument};
use crate::operators::{OperatorCall, OperatorContext, OperatorRegistry};

/// Runs operator pipelines and derives technical documents.
#[derive(Debug, Clone)]
pub struct ReasoningCompiler {
    broker: Arc<KnowledgeBroker>,
    registry: OperatorRegistry,
    layout: GraphLayout,
}

impl ReasoningCompiler {
    /// Create a compiler with the built-in operators and default layout.
    pub fn new(broker: Arc<KnowledgeBroker>) -> Self {
        Self {
            broker,
            registry: OperatorRegistry::with_builtins(),
            layout: GraphLayout::default(),
        }
    }

    pub fn with_registry(mut self, registry: OperatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_layout(mut self, layout: GraphLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Compile an intent document.
    ///
    /// The intent is taken by value and handed back after operators have run,
    /// so callers always see exactly what the compiler read.
    #[instrument(skip_all, fields(intent = %intent.id, operators = pipeline.len()))]
    pub fn compile(
        &self,
        mut intent: IntentDocument,
        pipeline: &[OperatorCall],
    ) -> (IntentDocument, TechnicalDocument) {
        let mut technical = TechnicalDocument::new(intent.id);

        if !pipeline.is_empty() {
            technical
                .trace
                .push(format!("Operator pipeline started ({} operators).", pipeline.len()));
            let ctx = OperatorContext {
                broker: &self.broker,
                layout: &self.layout,
            };
            for call in pipeline {
                self.registry.apply(&ctx, call, &mut intent, &mut technical);
            }
        }

        self.derive_concept(&intent, &mut technical);
        derive_composition(&intent, &mut technical);
        derive_archetypal_state(&intent, &mut technical);
        derive_historical_process(&intent, &mut technical);

        info!(
            applied = intent.applied_operators.len(),
            trace = technical.trace.len(),
            "intent compiled"
        );
        (intent, technical)
    }

    fn derive_concept(&self, intent: &IntentDocument, technical: &mut TechnicalDocument) {
        let mut notes = Vec::new();
        let descriptions: Vec<String> = intent
            .subjects
            .iter()
            .map(|subject| self.describe_subject(subject, &mut notes))
            .collect();
        let joined = descriptions.join(". ");

        technical.concept = match intent.narrative.as_deref().map(str::trim) {
            Some(narrative) if !narrative.is_empty() && joined.is_empty() => narrative.to_string(),
            Some(narrative) if !narrative.is_empty() => format!("{narrative} Featuring: {joined}"),
            _ => joined,
        };
        let mut entry = format!(
            "Concept derived from narrative and {} subject(s).",
            intent.subjects.len()
        );
        for note in notes {
            entry.push(' ');
            entry.push_str(&note);
        }
        technical.trace.push(entry);
    }

    /// A subject's description, extended with hybrid traits when it has a reference.
    /// Hybrid lookups leave a note for the concept trace entry.
    fn describe_subject(&self, subject: &Subject, notes: &mut Vec<String>) -> String {
        let Some(reference) = subject.hybrid_ref.as_deref() else {
            return subject.description.clone();
        };

        let (source, traits) = self.hybrid_traits(reference, subject.hybrid_variant.as_deref());
        if traits.is_empty() {
            notes.push(format!(
                "Hybridism: no traits found for {} under {}.",
                path_label(reference),
                reference
            ));
            return subject.description.clone();
        }

        notes.push(format!(
            "Hybridism: translated {} into {} trait keyword(s) from {}.",
            path_label(reference),
            traits.len(),
            source
        ));
        format!("{} (Hybrid Traits: {})", subject.description, traits.join(", "))
    }

    /// Variant keywords, falling back to the ontology's general properties.
    fn hybrid_traits(&self, reference: &str, variant: Option<&str>) -> (String, Vec<String>) {
        if let Some(variant) = variant {
            let path = format!("{reference}.Variants.{variant}.Keywords");
            let keywords = non_empty(self.broker.flatten_strings(&path));
            if !keywords.is_empty() {
                return (path, keywords);
            }
        }
        let path = format!("{reference}.Properties");
        let keywords = non_empty(self.broker.flatten_strings(&path));
        (path, keywords)
    }
}

fn non_empty(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|value| !value.is_empty()).collect()
}

fn composition_text(flow: &CompositionFlow) -> String {
    match flow.focal_point.as_deref() {
        Some(focal) => format!("Path: {}, Focal Point: {}", flow.path, focal),
        None => format!("Path: {}", flow.path),
    }
}

fn derive_composition(intent: &IntentDocument, technical: &mut TechnicalDocument) {
    if technical.composition.is_some() {
        return;
    }
    if let Some(flow) = &intent.composition_flow {
        technical.composition = Some(composition_text(flow));
        technical
            .trace
            .push(format!("Composition derived from flow '{}'.", flow.path));
    }
}

fn derive_archetypal_state(intent: &IntentDocument, technical: &mut TechnicalDocument) {
    if technical.directives.archetypal_state.is_some() {
        return;
    }
    if let Some(state) = &intent.archetypal_state {
        technical.directives.archetypal_state = Some(state.state.clone());
        technical.trace.push(format!(
            "Archetypal state '{}' carried over from intent document.",
            state.state
        ));
    }
}

fn derive_historical_process(intent: &IntentDocument, technical: &mut TechnicalDocument) {
    if let Some(process) = &intent.historical_process {
        technical.directives.historical_process = Some(process.clone());
        technical
            .trace
            .push(format!("Historical process directive added: {process}."));
    }
}
