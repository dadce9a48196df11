//! Prompt pipeline - compile, enrich and render in one call.
//!
//! The compiler and the enrichment resolver may read from different brokers
//! (a reasoning graph and an enrichment graph). Sharing one broker is the
//! common case and what [`PromptPipeline::new`] sets up.

use knowledge_graph::KnowledgeBroker;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::collaborators::{complete_intent, FieldCompleter};
use crate::compiler::ReasoningCompiler;
use crate::config::PipelineConfig;
use crate::documents::{IntentDocument, ProductionPlan, TechnicalDocument};
use crate::enrichment::EnrichmentResolver;
use crate::operators::{OperatorCall, OperatorRegistry};
use crate::rhetoric::{normalize_target, RenderedPrompt, RhetoricEngine};
use crate::PipelineError;

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// The intent as the compiler saw it, after operators ran.
    pub intent: IntentDocument,
    pub technical: TechnicalDocument,
    pub plan: ProductionPlan,

    /// One prompt per requested target, in request order.
    pub prompts: Vec<RenderedPrompt>,
}

impl PipelineOutput {
    /// Rendered text for `target`, matched by normalized key.
    pub fn prompt(&self, target: &str) -> Option<&str> {
        let key = normalize_target(target);
        self.prompts
            .iter()
            .find(|prompt| normalize_target(&prompt.target) == key)
            .map(|prompt| prompt.text.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct PromptPipeline {
    reasoning: Arc<KnowledgeBroker>,
    config: PipelineConfig,
    compiler: ReasoningCompiler,
    enrichment: EnrichmentResolver,
    rhetoric: RhetoricEngine,
}

impl PromptPipeline {
    /// Create a pipeline over a single shared broker with default configuration.
    pub fn new(broker: Arc<KnowledgeBroker>) -> Self {
        Self::with_brokers(Arc::clone(&broker), broker, PipelineConfig::default())
    }

    /// Create a pipeline with separate reasoning and enrichment brokers.
    pub fn with_brokers(
        reasoning: Arc<KnowledgeBroker>,
        enrichment: Arc<KnowledgeBroker>,
        config: PipelineConfig,
    ) -> Self {
        let compiler =
            ReasoningCompiler::new(Arc::clone(&reasoning)).with_layout(config.layout.clone());
        let enrichment = EnrichmentResolver::with_config(enrichment, config.clone());
        let rhetoric = RhetoricEngine::with_builtins(config.rhetoric.clone());
        Self {
            reasoning,
            config,
            compiler,
            enrichment,
            rhetoric,
        }
    }

    pub fn with_registry(mut self, registry: OperatorRegistry) -> Self {
        self.compiler = self.compiler.with_registry(registry);
        self
    }

    pub fn with_rhetoric(mut self, rhetoric: RhetoricEngine) -> Self {
        self.rhetoric = rhetoric;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn rhetoric(&self) -> &RhetoricEngine {
        &self.rhetoric
    }

    /// Compile `intent` through `operators`, enrich it and render every target.
    pub fn run<S: AsRef<str>>(
        &self,
        intent: IntentDocument,
        operators: &[OperatorCall],
        targets: &[S],
    ) -> PipelineOutput {
        let (intent, technical) = self.compiler.compile(intent, operators);
        let plan = self.enrichment.enrich(&technical);
        let prompts = self.rhetoric.render_all(&plan, targets);

        info!(
            intent = %intent.id,
            targets = prompts.len(),
            trace = plan.trace().len(),
            "pipeline run finished"
        );
        PipelineOutput {
            intent,
            technical,
            plan,
            prompts,
        }
    }

    /// Complete `brief` through `completer`, then [`run`](Self::run) the result.
    pub fn run_brief<C, S>(
        &self,
        completer: &C,
        brief: &str,
        targets: &[S],
    ) -> Result<PipelineOutput, PipelineError>
    where
        C: FieldCompleter + ?Sized,
        S: AsRef<str>,
    {
        let completed = complete_intent(completer, &self.reasoning, &self.config.layout, brief)?;
        Ok(self.run(completed.intent, &completed.pipeline, targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Subject;
    use crate::fixtures::{sample_broker, IRIS_VAN_HERPEN, KINNARI, SOLARPUNK};
    use crate::operators::{CULTURAL_SYNTHESIS, DEFINE_HYBRIDISM, IMPOSE_SYMMETRY};
    use serde_json::{json, Value};

    const TARGETS: [&str; 3] = ["DALL-E_3", "Midjourney_V6", "Stable_Diffusion_3"];

    fn kinnari_intent() -> (IntentDocument, Vec<OperatorCall>) {
        let intent = IntentDocument::new()
            .with_narrative("A celestial singer at the edge of dawn.")
            .with_subject(Subject::new("Kinnari_1", "A Kinnari mid-song"));
        let operators = vec![
            OperatorCall::new(DEFINE_HYBRIDISM)
                .with_param("subject", "Kinnari_1")
                .with_param("ref", KINNARI)
                .with_param("variant", "Pal_Subversive"),
            OperatorCall::new(CULTURAL_SYNTHESIS)
                .with_param("source_a", SOLARPUNK)
                .with_param("source_b", IRIS_VAN_HERPEN),
            OperatorCall::new(IMPOSE_SYMMETRY),
        ];
        (intent, operators)
    }

    #[test]
    fn test_run_renders_every_target_in_order() {
        let pipeline = PromptPipeline::new(Arc::new(sample_broker()));
        let (intent, operators) = kinnari_intent();

        let output = pipeline.run(intent, &operators, &TARGETS);

        let targets: Vec<&str> = output.prompts.iter().map(|p| p.target.as_str()).collect();
        assert_eq!(targets, TARGETS.to_vec());
        assert_eq!(output.intent.applied_operators.len(), 3);
        assert!(output.plan.concept().contains("Hybrid Traits:"));
        assert!(output
            .plan
            .style_keywords()
            .iter()
            .any(|k| k.contains("converges with")));

        let sd = output.prompt("stable-diffusion-3").unwrap();
        let mj = output.prompt("midjourney_v6").unwrap();
        assert!(sd.contains("Step 1: Concept"));
        assert!(!mj.contains("Step"));
        assert!(output.prompt("flux_1").is_none());
    }

    #[test]
    fn test_trace_spans_compile_and_enrich() {
        let pipeline = PromptPipeline::new(Arc::new(sample_broker()));
        let (intent, operators) = kinnari_intent();

        let output = pipeline.run(intent, &operators, &["flux_1"]);
        let entries = output.plan.trace().entries();

        assert!(entries[0].starts_with("Operator pipeline started"));
        let enrichment_start = entries
            .iter()
            .position(|e| e == "Enrichment phase started.")
            .unwrap();
        assert_eq!(enrichment_start, output.technical.trace.len());
    }

    #[test]
    fn test_separate_brokers_for_reasoning_and_enrichment() {
        let reasoning = Arc::new(sample_broker());
        let enrichment = Arc::new(KnowledgeBroker::new(json!({
            "10.0_Technical_Execution_Ontology": {
                "10.1_Digital_Cinema_Cameras": {"RED": ["RED V-Raptor"]}
            }
        })));
        let pipeline =
            PromptPipeline::with_brokers(reasoning, enrichment, PipelineConfig::default());
        let (intent, mut operators) = kinnari_intent();
        operators.push(OperatorCall::new("SetCameraPackage").with_param("camera", "RED Raptor"));

        let output = pipeline.run(intent, &operators, &["nano_banana"]);

        // Hybrid traits come from the reasoning graph.
        assert!(output.plan.concept().contains("Mythic defiance"));
        // Synthesis sources are absent from the enrichment graph.
        assert!(output
            .plan
            .style_keywords()
            .iter()
            .all(|k| !k.contains("Regenerative urban design")));
        assert_eq!(output.plan.technical().device.as_deref(), Some("RED V-Raptor"));
    }

    struct CannedCompleter(Value);

    impl FieldCompleter for CannedCompleter {
        fn complete(&self, _: &Value, _: &str, _: &str) -> Result<Value, PipelineError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_run_brief_uses_completed_fields() {
        let pipeline = PromptPipeline::new(Arc::new(sample_broker()));
        let completer = CannedCompleter(json!({
            "narrative_moment": "A guardian wakes.",
            "subjects": [{
                "id": "Guardian",
                "description": "A Kinnari guardian",
                "hybrid_ontology_ref": KINNARI,
                "hybrid_variant": "Pal_Subversive"
            }],
            "archetypal_dynamics": {"state": "assimilating"}
        }));

        let output = pipeline
            .run_brief(&completer, "a guardian spirit", &["dall_e_3"])
            .unwrap();

        assert_eq!(
            output.intent.archetypal_state.as_ref().map(|s| s.state.as_str()),
            Some("Assimilating")
        );
        assert_eq!(output.plan.references(), &["Roger_Deakins"]);
        assert!(output
            .prompt("dall_e_3")
            .unwrap()
            .starts_with("A detailed visualization depicting: A guardian wakes."));
    }

    #[test]
    fn test_run_brief_rejects_invalid_payload() {
        let pipeline = PromptPipeline::new(Arc::new(sample_broker()));
        let result = pipeline.run_brief(&CannedCompleter(json!("nope")), "brief", &["flux_1"]);
        assert!(matches!(result, Err(PipelineError::InvalidPayload("string"))));
    }
}
