//! Field completion - turns a free-text brief into an intent document.
//!
//! A [`FieldCompleter`] (typically a generative-text client) receives the
//! expected payload shape, the brief and an excerpt of the knowledge graph,
//! and answers with a JSON payload. [`intent_from_payload`] converts that
//! payload into an [`IntentDocument`] plus the operator pipeline its fields
//! imply. Missing or malformed fields degrade to defaults.

use knowledge_graph::{scalar_to_string, value_kind, KnowledgeBroker};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::GraphLayout;
use crate::documents::{IntentDocument, Subject};
use crate::operators::{
    OperatorCall, OperatorParams, CULTURAL_SYNTHESIS, DEFINE_HYBRIDISM, SET_ARCHETYPAL_STATE,
};
use crate::PipelineError;

pub const DEFAULT_SUBJECT_DESCRIPTION: &str = "Creative subject";

/// Fills in the creative fields of a brief.
pub trait FieldCompleter {
    fn complete(&self, schema: &Value, brief: &str, context: &str) -> Result<Value, PipelineError>;
}

/// An intent document and the operators its payload asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedIntent {
    pub intent: IntentDocument,
    pub pipeline: Vec<OperatorCall>,
}

/// Shape of the payload a completer must return.
pub fn required_fields_schema() -> Value {
    json!({
        "narrative_moment": "string",
        "subjects": [{
            "id": "string",
            "description": "string",
            "hybrid_ontology_ref": "knowledge-graph path or null",
            "hybrid_variant": "string or null"
        }],
        "synthesis": {
            "source_a": "knowledge-graph path",
            "source_b": "knowledge-graph path",
            "mode": "Aesthetic | Narrative | Symbolic"
        },
        "archetypal_dynamics": {
            "state": "one of the listed shadow integration states",
            "manifestation": "knowledge-graph path or null",
            "catalyst": "Internal_Catalyst | External_Agent | null"
        },
        "historical_process": "process name or null"
    })
}

/// Knowledge-graph excerpt that guides the completer.
pub fn knowledge_context(broker: &KnowledgeBroker, layout: &GraphLayout) -> String {
    let mut lines = vec!["Design principles:".to_string()];
    lines.extend(
        broker
            .flatten_strings(&layout.design_principles)
            .into_iter()
            .map(|principle| format!("- {principle}")),
    );

    lines.push(String::new());
    lines.push("Hybrid ontology options:".to_string());
    if let Some(Value::Object(catalog)) = broker.resolve(&layout.hybrid_catalog) {
        for (name, node) in &catalog {
            let Value::Object(node) = node else {
                continue;
            };
            match node.get("Variants") {
                Some(Value::Object(variants)) if !variants.is_empty() => {
                    let names: Vec<&str> = variants.keys().map(String::as_str).collect();
                    lines.push(format!("- {} (variants: {})", name, names.join(", ")));
                }
                _ => lines.push(format!("- {name}")),
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Shadow integration states: {}",
        broker.flatten_strings(&layout.archetypal_states).join(", ")
    ));
    lines.join("\n")
}

/// Convert a completion payload into an intent and its operator pipeline.
pub fn intent_from_payload(payload: &Value) -> Result<CompletedIntent, PipelineError> {
    let Value::Object(fields) = payload else {
        return Err(PipelineError::InvalidPayload(value_kind(payload)));
    };

    let mut intent = IntentDocument::new();
    if let Some(narrative) = text_field(payload, "narrative_moment") {
        intent.narrative = Some(narrative);
    }
    if let Some(process) = text_field(payload, "historical_process") {
        intent.historical_process = Some(process);
    }

    let mut pipeline = Vec::new();
    let subjects = fields
        .get("subjects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for (index, entry) in subjects.iter().enumerate() {
        let id = text_field(entry, "id").unwrap_or_else(|| format!("Subject{}", index + 1));
        let description = text_field(entry, "description")
            .unwrap_or_else(|| DEFAULT_SUBJECT_DESCRIPTION.to_string());
        intent.subjects.push(Subject::new(id.clone(), description));

        if let Some(reference) = text_field(entry, "hybrid_ontology_ref") {
            let mut call = OperatorCall::new(DEFINE_HYBRIDISM)
                .with_param("subject", id)
                .with_param("ref", reference);
            if let Some(variant) = text_field(entry, "hybrid_variant") {
                call = call.with_param("variant", variant);
            }
            pipeline.push(call);
        }
    }

    if let Some(params) = block_params(payload, "synthesis") {
        let has_sources = params.text(&["source_a", "devouring_culture"]).is_some()
            && params.text(&["source_b", "devoured_element"]).is_some();
        if has_sources {
            pipeline.push(OperatorCall {
                name: CULTURAL_SYNTHESIS.to_string(),
                params,
            });
        } else {
            debug!("synthesis block without both sources ignored");
        }
    }

    if let Some(params) = block_params(payload, "archetypal_dynamics") {
        if params.text(&["state", "shadow_state"]).is_some() {
            pipeline.push(OperatorCall {
                name: SET_ARCHETYPAL_STATE.to_string(),
                params,
            });
        }
    }

    info!(
        subjects = intent.subjects.len(),
        operators = pipeline.len(),
        "completion payload converted"
    );
    Ok(CompletedIntent { intent, pipeline })
}

/// Ask `completer` for the creative fields of `brief` and convert the answer.
pub fn complete_intent<C: FieldCompleter + ?Sized>(
    completer: &C,
    broker: &KnowledgeBroker,
    layout: &GraphLayout,
    brief: &str,
) -> Result<CompletedIntent, PipelineError> {
    let context = knowledge_context(broker, layout);
    let payload = completer.complete(&required_fields_schema(), brief, &context)?;
    intent_from_payload(&payload)
}

/// Non-blank scalar field, as a string.
fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(scalar_to_string)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// A nested object's scalar fields, as operator parameters.
fn block_params(payload: &Value, key: &str) -> Option<OperatorParams> {
    let Some(Value::Object(block)) = payload.get(key) else {
        return None;
    };
    let params = block
        .iter()
        .filter_map(|(name, value)| scalar_to_string(value).map(|text| (name.clone(), Value::String(text))))
        .fold(OperatorParams::new(), |params, (name, value)| params.with(name, value));
    (!params.is_empty()).then_some(params)
}
