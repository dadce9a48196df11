//! Final production plan - the read-only artifact handed to every render.

use serde::{Deserialize, Serialize};

use super::{IntentId, ReasoningTrace};

/// Capture device and optics for the render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalPackage {
    pub device: Option<String>,
    pub lens: Option<String>,
}

/// Fully resolved plan. Built once by enrichment, then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    source_intent: IntentId,
    concept: String,
    composition: Option<String>,
    trace: ReasoningTrace,
    references: Vec<String>,
    style_keywords: Vec<String>,
    technical: TechnicalPackage,
    process_artifacts: Vec<String>,
}

impl ProductionPlan {
    pub fn builder(source_intent: IntentId) -> PlanBuilder {
        PlanBuilder {
            plan: ProductionPlan {
                source_intent,
                concept: String::new(),
                composition: None,
                trace: ReasoningTrace::new(),
                references: Vec::new(),
                style_keywords: Vec::new(),
                technical: TechnicalPackage::default(),
                process_artifacts: Vec::new(),
            },
        }
    }

    pub fn source_intent(&self) -> IntentId {
        self.source_intent
    }

    pub fn concept(&self) -> &str {
        &self.concept
    }

    pub fn composition(&self) -> Option<&str> {
        self.composition.as_deref()
    }

    pub fn trace(&self) -> &ReasoningTrace {
        &self.trace
    }

    /// Named references, de-duplicated, in insertion order.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn style_keywords(&self) -> &[String] {
        &self.style_keywords
    }

    pub fn technical(&self) -> &TechnicalPackage {
        &self.technical
    }

    pub fn process_artifacts(&self) -> &[String] {
        &self.process_artifacts
    }
}

/// Accumulates a [`ProductionPlan`]. Resolvers may read what earlier resolvers
/// wrote but can only append.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    plan: ProductionPlan,
}

impl PlanBuilder {
    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.plan.concept = concept.into();
        self
    }

    pub fn composition(mut self, composition: Option<String>) -> Self {
        self.plan.composition = composition;
        self
    }

    pub fn trace(mut self, trace: ReasoningTrace) -> Self {
        self.plan.trace = trace;
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.add_reference(reference);
        self
    }

    pub fn style_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.plan.style_keywords.push(keyword.into());
        self
    }

    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.plan.technical.device = Some(device.into());
        self
    }

    pub fn lens(mut self, lens: impl Into<String>) -> Self {
        self.plan.technical.lens = Some(lens.into());
        self
    }

    pub fn process_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.plan.process_artifacts.push(artifact.into());
        self
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        self.plan.trace.push(entry);
    }

    /// Add a reference unless already present. Returns whether it was added.
    pub fn add_reference(&mut self, reference: impl Into<String>) -> bool {
        let reference = reference.into();
        if self.plan.references.contains(&reference) {
            return false;
        }
        self.plan.references.push(reference);
        true
    }

    pub fn extend_style_keywords<I>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.plan.style_keywords.extend(keywords);
    }

    pub fn extend_process_artifacts<I>(&mut self, artifacts: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.plan.process_artifacts.extend(artifacts);
    }

    pub fn set_device(&mut self, device: impl Into<String>) {
        self.plan.technical.device = Some(device.into());
    }

    pub fn set_lens(&mut self, lens: impl Into<String>) {
        self.plan.technical.lens = Some(lens.into());
    }

    pub fn current_concept(&self) -> &str {
        &self.plan.concept
    }

    pub fn current_references(&self) -> &[String] {
        &self.plan.references
    }

    pub fn current_style_keywords(&self) -> &[String] {
        &self.plan.style_keywords
    }

    pub fn build(self) -> ProductionPlan {
        self.plan
    }
}
