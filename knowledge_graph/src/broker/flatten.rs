//! Flattening of arbitrary subtrees into scalar lists.
//!
//! Some regions of the graph are organised as `{EntityName: {details...}}`
//! where the *names* are the useful values; others are plain nested categories
//! where only the leaves matter. The entity-lexicon heuristic tells the two
//! apart without a schema.

use serde_json::{Map, Value};

/// Decide whether a map is an entity lexicon.
///
/// True when the map is non-empty and the share of its direct values that are
/// themselves maps is strictly greater than `threshold`.
pub fn is_entity_lexicon(map: &Map<String, Value>, threshold: f64) -> bool {
    if map.is_empty() {
        return false;
    }
    let nested = map.values().filter(|value| value.is_object()).count();
    nested as f64 / map.len() as f64 > threshold
}

/// Render a lexicon key as a label (`Ganesh_Pyne` -> `Ganesh Pyne`).
pub fn lexicon_label(key: &str) -> String {
    key.replace('_', " ")
}

/// Flatten a value into the list of scalars it contains.
///
/// Lists are flattened element by element, lexicon maps contribute their
/// keys, other maps are descended value by value, `null` is dropped.
pub fn flatten_value(value: &Value, threshold: f64) -> Vec<Value> {
    let mut items = Vec::new();
    collect(value, threshold, &mut items);
    items
}

fn collect(value: &Value, threshold: f64, items: &mut Vec<Value>) {
    match value {
        Value::Array(elements) => {
            for element in elements {
                collect(element, threshold, items);
            }
        }
        Value::Object(map) if is_entity_lexicon(map, threshold) => {
            items.extend(map.keys().map(|key| Value::String(lexicon_label(key))));
        }
        Value::Object(map) => {
            for nested in map.values() {
                collect(nested, threshold, items);
            }
        }
        Value::Null => {}
        scalar => items.push(scalar.clone()),
    }
}

/// Stringify a scalar. Strings are returned unquoted; containers and `null` yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
