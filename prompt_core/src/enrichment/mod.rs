//! Enrichment Resolver - resolves abstract directives against the knowledge graph.
//!
//! Resolution runs in a fixed order:
//! 1. **Synthesis**: two-source blend into style keywords
//! 2. **State**: translation-matrix signifiers into keywords and references
//! 3. **Cross-reference**: bonus references triggered by the concept text
//! 4. **Technical package**: process artifacts, device and lens
//!
//! Later steps may read what earlier steps wrote but never remove it. A
//! missing directive makes its step a no-op.

mod synthesis;

pub use synthesis::*;

use knowledge_graph::{path_label, KnowledgeBroker};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::documents::{PlanBuilder, ProductionPlan, SynthesisDirective, TechnicalDocument};

/// Turns technical documents into production plans.
#[derive(Debug, Clone)]
pub struct EnrichmentResolver {
    broker: Arc<KnowledgeBroker>,
    config: PipelineConfig,
}

impl EnrichmentResolver {
    pub fn new(broker: Arc<KnowledgeBroker>) -> Self {
        Self::with_config(broker, PipelineConfig::default())
    }

    pub fn with_config(broker: Arc<KnowledgeBroker>, config: PipelineConfig) -> Self {
        Self { broker, config }
    }

    #[instrument(skip_all, fields(intent = %technical.source_intent))]
    pub fn enrich(&self, technical: &TechnicalDocument) -> ProductionPlan {
        let mut plan = ProductionPlan::builder(technical.source_intent)
            .concept(technical.concept.clone())
            .composition(technical.composition.clone())
            .trace(technical.trace.clone());
        plan.record("Enrichment phase started.");

        let directives = &technical.directives;
        if let Some(directive) = &directives.synthesis {
            self.resolve_synthesis(directive, &mut plan);
        }
        if let Some(state) = directives.archetypal_state.as_deref() {
            self.resolve_state(state, &mut plan);
        }
        self.resolve_cross_references(&mut plan);
        if let Some(process) = directives.historical_process.as_deref() {
            self.resolve_process_artifacts(process, &mut plan);
        }
        self.resolve_device(directives.camera_query.as_deref(), &mut plan);
        if let Some(lens) = directives.lens_query.as_deref() {
            self.resolve_lens(lens, &mut plan);
        }

        let plan = plan.build();
        info!(
            references = plan.references().len(),
            keywords = plan.style_keywords().len(),
            "production plan assembled"
        );
        plan
    }

    fn resolve_synthesis(&self, directive: &SynthesisDirective, plan: &mut PlanBuilder) {
        let keywords = synthesize(&self.broker, directive);
        plan.record(format!(
            "Synthesis resolved ({} mode): {} keyword(s) from {} and {}.",
            directive.mode,
            keywords.len(),
            path_label(&directive.source_a),
            path_label(&directive.source_b)
        ));
        plan.extend_style_keywords(keywords);
    }

    /// Route each signifier to references or keywords by the region it lives in.
    fn resolve_state(&self, state: &str, plan: &mut PlanBuilder) {
        let layout = &self.config.layout;
        let path = format!("{}.{}.{}", layout.translation_matrix, state, layout.signifier_key);
        let signifiers = self.broker.flatten_strings(&path);
        if signifiers.is_empty() {
            plan.record(format!("Translation matrix has no signifiers for state '{state}'."));
            return;
        }

        let mut keywords = Vec::new();
        let mut references = 0;
        for signifier in &signifiers {
            let concept = path_label(signifier);
            if signifier.contains(layout.references_marker.as_str()) {
                if plan.add_reference(concept) {
                    references += 1;
                }
            } else {
                keywords.push(concept.to_string());
            }
        }

        plan.record(format!(
            "Translation matrix resolved for '{}': {} keyword(s), {} reference(s).",
            state,
            keywords.len(),
            references
        ));
        plan.extend_style_keywords(keywords);
    }

    fn resolve_cross_references(&self, plan: &mut PlanBuilder) {
        let concept = plan.current_concept().to_string();
        for rule in &self.config.cross_references.rules {
            if rule.matches(&concept) && plan.add_reference(rule.reference.clone()) {
                debug!(reference = %rule.reference, "cross-reference triggered");
                plan.record(format!("Cross-reference added: {}.", rule.reference));
            }
        }
    }

    /// Keep artifact phrases (strings with a space), not category labels.
    fn resolve_process_artifacts(&self, process: &str, plan: &mut PlanBuilder) {
        let path = format!("{}.{}", self.config.layout.process_taxonomy, process);
        if !self.broker.exists(&path) {
            plan.record(format!(
                "Historical process '{process}' not found in process taxonomy."
            ));
            return;
        }

        let artifacts: Vec<String> = self
            .broker
            .flatten_strings(&path)
            .into_iter()
            .filter(|artifact| artifact.contains(' '))
            .collect();
        plan.record(format!(
            "Historical process '{}' contributed {} artifact(s).",
            process,
            artifacts.len()
        ));
        plan.extend_process_artifacts(artifacts);
    }

    fn resolve_device(&self, query: Option<&str>, plan: &mut PlanBuilder) {
        let fallback = &self.config.technical.default_device;
        let Some(query) = query else {
            plan.set_device(fallback.clone());
            plan.record(format!("Technical package: default device '{fallback}'."));
            return;
        };

        match self.broker.nearest_match_default(&self.config.layout.cameras, query) {
            Some(camera) => {
                plan.record(format!("Camera '{query}' resolved to '{camera}'."));
                plan.set_device(camera);
            }
            None => {
                plan.record(format!(
                    "Camera '{query}' has no close match; using default device '{fallback}'."
                ));
                plan.set_device(fallback.clone());
            }
        }
    }

    fn resolve_lens(&self, query: &str, plan: &mut PlanBuilder) {
        match self.broker.nearest_match_default(&self.config.layout.lenses, query) {
            Some(lens) => {
                plan.record(format!("Lens '{query}' resolved to '{lens}'."));
                plan.set_lens(lens);
            }
            None => plan.record(format!("Lens '{query}' has no close match; omitted.")),
        }
    }
}
