//! Rendering policies and their shared helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RhetoricConfig;
use crate::documents::ProductionPlan;

/// A rendering strategy. Each variant produces structurally different text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RhetoricPolicy {
    /// Comma-joined concept, style and technical summaries.
    Default,
    /// Flowing descriptive paragraph.
    NarrativeParagraph,
    /// Short fragments joined by `--`, then parameter tokens.
    PoeticFragment,
    /// Numbered steps, one per line.
    NumberedRecipe,
    /// Lettered modules, one per line.
    LetteredModules,
    /// Lower-case `key: value` lines.
    KeyValueSheet,
    /// Objective / visuals / cues / delivery brief.
    ObjectiveBrief,
}

impl RhetoricPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            RhetoricPolicy::Default => "default",
            RhetoricPolicy::NarrativeParagraph => "narrative_paragraph",
            RhetoricPolicy::PoeticFragment => "poetic_fragment",
            RhetoricPolicy::NumberedRecipe => "numbered_recipe",
            RhetoricPolicy::LetteredModules => "lettered_modules",
            RhetoricPolicy::KeyValueSheet => "key_value_sheet",
            RhetoricPolicy::ObjectiveBrief => "objective_brief",
        }
    }

    /// Produce the raw, un-normalized text for `plan`.
    pub fn compose(&self, plan: &ProductionPlan, config: &RhetoricConfig) -> String {
        let parts = Parts::from_plan(plan);
        match self {
            RhetoricPolicy::Default => default_policy(&parts),
            RhetoricPolicy::NarrativeParagraph => narrative_paragraph(&parts),
            RhetoricPolicy::PoeticFragment => poetic_fragment(&parts, config),
            RhetoricPolicy::NumberedRecipe => numbered_recipe(&parts),
            RhetoricPolicy::LetteredModules => lettered_modules(&parts),
            RhetoricPolicy::KeyValueSheet => key_value_sheet(&parts),
            RhetoricPolicy::ObjectiveBrief => objective_brief(&parts),
        }
    }
}

impl fmt::Display for RhetoricPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// References joined behind a connective phrase, then style keywords.
pub fn style_summary(plan: &ProductionPlan) -> String {
    let mut parts = Vec::new();
    if !plan.references().is_empty() {
        parts.push(format!("in the style of {}", plan.references().join(", ")));
    }
    if !plan.style_keywords().is_empty() {
        parts.push(plan.style_keywords().join(", "));
    }
    parts.join(", ")
}

/// Device hint (and lens), then process-artifact keywords.
pub fn technical_summary(plan: &ProductionPlan) -> String {
    let technical = plan.technical();
    let mut parts = Vec::new();
    match (technical.device.as_deref(), technical.lens.as_deref()) {
        (Some(device), Some(lens)) => parts.push(format!("shot on {device} with {lens}")),
        (Some(device), None) => parts.push(format!("shot on {device}")),
        (None, Some(lens)) => parts.push(format!("shot with {lens}")),
        (None, None) => {}
    }
    if !plan.process_artifacts().is_empty() {
        parts.push(plan.process_artifacts().join(", "));
    }
    parts.join(", ")
}

struct Parts<'a> {
    concept: &'a str,
    composition: &'a str,
    style: String,
    technical: String,
}

impl<'a> Parts<'a> {
    fn from_plan(plan: &'a ProductionPlan) -> Self {
        Self {
            concept: plan.concept(),
            composition: plan.composition().unwrap_or(""),
            style: style_summary(plan),
            technical: technical_summary(plan),
        }
    }
}

/// Join the non-empty `(prefix, value)` pairs with `separator`.
fn labelled(pairs: &[(&str, &str)], separator: &str) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(prefix, value)| format!("{prefix}{value}"))
        .collect::<Vec<_>>()
        .join(separator)
}

fn default_policy(parts: &Parts<'_>) -> String {
    labelled(
        &[
            ("", parts.concept),
            ("", parts.style.as_str()),
            ("", parts.technical.as_str()),
        ],
        ", ",
    )
}

fn narrative_paragraph(parts: &Parts<'_>) -> String {
    let mut text = format!("A detailed visualization depicting: {}. ", parts.concept);
    if !parts.style.is_empty() {
        text.push_str(&format!(
            "The aesthetic style, mood, and influences include: {}. ",
            parts.style
        ));
    }
    if !parts.composition.is_empty() {
        text.push_str(&format!("Composition guidelines: {}. ", parts.composition));
    }
    if !parts.technical.is_empty() {
        text.push_str(&format!("Visual characteristics: {}. ", parts.technical));
    }
    text
}

fn poetic_fragment(parts: &Parts<'_>, config: &RhetoricConfig) -> String {
    let fragments = labelled(
        &[
            ("imagine ", parts.concept),
            ("evoke ", parts.style.as_str()),
            ("compose with ", parts.composition),
            ("render with ", parts.technical.as_str()),
        ],
        " -- ",
    );
    if config.parameter_tokens.is_empty() {
        fragments
    } else {
        format!("{} {}", fragments, config.parameter_tokens.join(" "))
    }
}

fn numbered_recipe(parts: &Parts<'_>) -> String {
    let mut steps = vec![format!("Step 1: Concept - {}", parts.concept)];
    if !parts.style.is_empty() {
        steps.push(format!("Step 2: Aesthetic references - {}", parts.style));
    }
    if !parts.composition.is_empty() {
        steps.push(format!("Step 3: Composition plan - {}", parts.composition));
    }
    if !parts.technical.is_empty() {
        steps.push(format!("Step 4: Technical settings - {}", parts.technical));
    }
    steps.push("Step 5: Output - high fidelity render with balanced exposure.".to_string());
    steps.join("\n")
}

fn lettered_modules(parts: &Parts<'_>) -> String {
    let body = labelled(
        &[
            ("Module A - Scenario: ", parts.concept),
            ("Module B - Visual Language: ", parts.style.as_str()),
            ("Module C - Blocking: ", parts.composition),
            ("Module D - Capture Specs: ", parts.technical.as_str()),
        ],
        "\n",
    );
    format!("{body}\nModule E - Delivery: seamless motion-ready frames.")
}

fn key_value_sheet(parts: &Parts<'_>) -> String {
    let body = labelled(
        &[
            ("core: ", parts.concept),
            ("vibe: ", parts.style.as_str()),
            ("frame: ", parts.composition),
            ("gear: ", parts.technical.as_str()),
        ],
        "\n",
    );
    format!("{body}\nmood: bold, curious, joyful.")
}

fn objective_brief(parts: &Parts<'_>) -> String {
    let body = labelled(
        &[
            ("Objective: ", parts.concept),
            ("Key visuals: ", parts.style.as_str()),
            ("Composition cue: ", parts.composition),
            ("Execution notes: ", parts.technical.as_str()),
        ],
        "\n",
    );
    format!("{body}\nDelivery: cinematic, high-impact frames with crisp detailing.")
}
