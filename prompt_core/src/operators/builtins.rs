//! Built-in operators.
//!
//! Every operator checks all of its preconditions before touching either
//! document, and appends exactly one trace entry whether it succeeds or fails.

use knowledge_graph::path_label;
use tracing::warn;

use super::{OperatorContext, OperatorParams};
use crate::documents::{
    ArchetypalState, CatalystRole, CompositionFlow, IntentDocument, SynthesisDirective,
    SynthesisMode, TechnicalDocument,
};

pub const IMPOSE_SYMMETRY: &str = "ImposeSymmetry";
pub const SET_COMPOSITION_FLOW: &str = "SetCompositionFlow";
pub const DEFINE_HYBRIDISM: &str = "DefineHybridism";
pub const CULTURAL_SYNTHESIS: &str = "CulturalSynthesis";
pub const SET_ARCHETYPAL_STATE: &str = "SetArchetypalState";
pub const SET_CAMERA_PACKAGE: &str = "SetCameraPackage";

fn missing(technical: &mut TechnicalDocument, operator: &str, param: &str) -> bool {
    technical
        .trace
        .push(format!("{operator} failed: missing required parameter '{param}'."));
    false
}

fn labels<T>(items: &[T], label: fn(&T) -> &'static str) -> String {
    items.iter().map(label).collect::<Vec<_>>().join(", ")
}

// === Structural ===

pub(super) fn impose_symmetry(
    _ctx: &OperatorContext<'_>,
    intent: &mut IntentDocument,
    technical: &mut TechnicalDocument,
    _params: &OperatorParams,
) -> bool {
    intent.composition_flow =
        Some(CompositionFlow::new("symmetrical_balance").with_focal_point("center"));
    technical
        .trace
        .push("Structural: imposed symmetrical balance around a central focal point.");
    true
}

pub(super) fn set_composition_flow(
    _ctx: &OperatorContext<'_>,
    intent: &mut IntentDocument,
    technical: &mut TechnicalDocument,
    params: &OperatorParams,
) -> bool {
    let Some(path) = params.text(&["path"]) else {
        return missing(technical, SET_COMPOSITION_FLOW, "path");
    };

    let mut flow = CompositionFlow::new(path);
    if let Some(focal_point) = params.text(&["focal_point", "focal"]) {
        flow = flow.with_focal_point(focal_point);
    }
    technical.trace.push(format!(
        "Structural: composition flow set to '{}' (focal point: {}).",
        flow.path,
        flow.focal_point.as_deref().unwrap_or("unspecified")
    ));
    intent.composition_flow = Some(flow);
    true
}

// === Relational ===

pub(super) fn define_hybridism(
    ctx: &OperatorContext<'_>,
    intent: &mut IntentDocument,
    technical: &mut TechnicalDocument,
    params: &OperatorParams,
) -> bool {
    let Some(subject_id) = params.text(&["subject", "subject_id"]) else {
        return missing(technical, DEFINE_HYBRIDISM, "subject");
    };
    let Some(reference) = params.text(&["ref", "ontology_ref"]) else {
        return missing(technical, DEFINE_HYBRIDISM, "ref");
    };
    let variant = params.text(&["variant"]).map(str::to_owned);

    let Some(subject) = intent.subject_mut(subject_id) else {
        technical.trace.push(format!(
            "Hybridism failed: subject '{subject_id}' not found in intent document."
        ));
        return false;
    };

    if !ctx.broker.exists(reference) {
        warn!(reference, "hybrid reference is not present in the knowledge graph");
    }
    technical.trace.push(format!(
        "Hybridism: defined '{}' as '{}' (variant: {}).",
        subject_id,
        path_label(reference),
        variant.as_deref().unwrap_or("default")
    ));
    subject.hybrid_ref = Some(reference.to_string());
    subject.hybrid_variant = variant;
    true
}

// === Directive-producing ===

pub(super) fn cultural_synthesis(
    ctx: &OperatorContext<'_>,
    _intent: &mut IntentDocument,
    technical: &mut TechnicalDocument,
    params: &OperatorParams,
) -> bool {
    let Some(source_a) = params.text(&["source_a", "devouring_culture"]) else {
        return missing(technical, CULTURAL_SYNTHESIS, "source_a");
    };
    let Some(source_b) = params.text(&["source_b", "devoured_element"]) else {
        return missing(technical, CULTURAL_SYNTHESIS, "source_b");
    };

    let mode = match params.text(&["mode", "synthesis_mode"]) {
        None => SynthesisMode::default(),
        Some(label) => match SynthesisMode::from_label(label) {
            Some(mode) => mode,
            None => {
                technical.trace.push(format!(
                    "Synthesis failed: mode '{}' is not one of [{}].",
                    label,
                    labels(&SynthesisMode::ALL, SynthesisMode::label)
                ));
                return false;
            }
        },
    };

    for source in [source_a, source_b] {
        if !ctx.broker.exists(source) {
            technical.trace.push(format!(
                "Synthesis failed: '{source}' not found in knowledge graph."
            ));
            return false;
        }
    }

    technical.trace.push(format!(
        "Synthesis: directive created ({} with {}, {} mode).",
        path_label(source_a),
        path_label(source_b),
        mode
    ));
    technical.directives.synthesis = Some(SynthesisDirective {
        source_a: source_a.to_string(),
        source_b: source_b.to_string(),
        mode,
    });
    true
}

pub(super) fn set_archetypal_state(
    ctx: &OperatorContext<'_>,
    intent: &mut IntentDocument,
    technical: &mut TechnicalDocument,
    params: &OperatorParams,
) -> bool {
    let Some(requested) = params.text(&["state", "shadow_state"]) else {
        return missing(technical, SET_ARCHETYPAL_STATE, "state");
    };

    let legal = ctx.broker.flatten_strings(&ctx.layout.archetypal_states);
    let Some(state) = legal
        .iter()
        .find(|value| value.to_lowercase() == requested.to_lowercase())
        .cloned()
    else {
        technical.trace.push(format!(
            "Archetypal state '{}' rejected: legal values are [{}].",
            requested,
            legal.join(", ")
        ));
        return false;
    };

    let catalyst = match params.text(&["catalyst", "trickster"]) {
        None => None,
        Some(label) => match CatalystRole::from_label(label) {
            Some(role) => Some(role),
            None => {
                technical.trace.push(format!(
                    "Archetypal state '{}' rejected: catalyst '{}' is not one of [{}].",
                    state,
                    label,
                    labels(&CatalystRole::ALL, CatalystRole::label)
                ));
                return false;
            }
        },
    };

    technical.trace.push(match catalyst {
        Some(role) => format!("Archetypal dynamics: state set to '{state}' (catalyst: {role})."),
        None => format!("Archetypal dynamics: state set to '{state}'."),
    });
    technical.directives.archetypal_state = Some(state.clone());
    intent.archetypal_state = Some(ArchetypalState {
        state,
        manifestation: params.text(&["manifestation"]).map(str::to_owned),
        catalyst,
    });
    true
}

pub(super) fn set_camera_package(
    ctx: &OperatorContext<'_>,
    _intent: &mut IntentDocument,
    technical: &mut TechnicalDocument,
    params: &OperatorParams,
) -> bool {
    let Some(camera) = params.text(&["camera"]) else {
        return missing(technical, SET_CAMERA_PACKAGE, "camera");
    };
    let lens = params.text(&["lens"]);

    let listing = if ctx.broker.contains(&ctx.layout.cameras, camera) {
        "listed in camera ontology"
    } else {
        "not listed, will be matched during enrichment"
    };
    technical.trace.push(match lens {
        Some(lens) => format!("Camera package: '{camera}' with '{lens}' ({listing})."),
        None => format!("Camera package: '{camera}' ({listing})."),
    });
    technical.directives.camera_query = Some(camera.to_string());
    technical.directives.lens_query = lens.map(str::to_owned);
    true
}
