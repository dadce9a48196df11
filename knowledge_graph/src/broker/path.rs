//! Dotted-path algebra over the knowledge graph.
//!
//! Keys in the graph may themselves contain the separator (for example
//! `2.8_Archetypal_Dynamics_Framework (Jungian)`), so a path cannot be resolved
//! by splitting alone. At every map level the walk first tries the whole
//! remaining suffix as a literal key, then growing prefixes of the remaining
//! segments, and descends on the first key that matches. There is no
//! backtracking once a key has been chosen.

use serde_json::{Map, Value};

use crate::BrokerError;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Split a path into its raw segments. The empty path has no segments.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split(PATH_SEPARATOR).collect()
    }
}

/// The last segment of a path, used as a human-readable label.
pub fn path_label(path: &str) -> &str {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path)
}

/// Find the key at this level that matches a prefix of `segments`.
///
/// Returns the matched key and the number of segments it consumed.
pub fn match_key(map: &Map<String, Value>, segments: &[&str]) -> Option<(String, usize)> {
    if segments.is_empty() {
        return None;
    }

    let whole = segments.join(".");
    if map.contains_key(&whole) {
        return Some((whole, segments.len()));
    }

    (1..segments.len()).find_map(|taken| {
        let prefix = segments[..taken].join(".");
        map.contains_key(&prefix).then_some((prefix, taken))
    })
}

/// Resolve a path against a graph.
///
/// The empty path resolves to the root. `null` values count as absent.
/// List elements may be addressed by a numeric segment.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = split_path(path);
    let mut rest = segments.as_slice();
    let mut current = root;

    while !rest.is_empty() {
        let (next, consumed) = step(current, rest)?;
        current = next;
        rest = &rest[consumed..];
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn step<'a>(current: &'a Value, rest: &[&str]) -> Option<(&'a Value, usize)> {
    match current {
        Value::Object(map) => {
            let (key, consumed) = match_key(map, rest)?;
            map.get(&key).map(|next| (next, consumed))
        }
        Value::Array(items) => {
            let index = rest[0].parse::<usize>().ok()?;
            items.get(index).map(|next| (next, 1))
        }
        _ => None,
    }
}

/// Write `value` at `path`, creating intermediate maps as needed.
///
/// Existing keys are located with the same prefix-matching walk as
/// [`resolve_path`], including numeric segments that index into lists. An
/// indexed element may be replaced or descended into, but lists never grow.
/// Once no map key matches, the remaining segments become new nested maps.
/// `null` placeholders along the way are replaced with maps.
pub fn inject_path(root: &mut Value, path: &str, value: Value) -> Result<(), BrokerError> {
    let segments = split_path(path);
    if segments.is_empty() {
        return Err(BrokerError::EmptyPath);
    }

    let mut rest = segments.as_slice();
    let mut current = root;

    loop {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }

        match current {
            Value::Object(map) => match match_key(map, rest) {
                Some((key, consumed)) if consumed == rest.len() => {
                    map.insert(key, value);
                    return Ok(());
                }
                Some((key, consumed)) => {
                    rest = &rest[consumed..];
                    current = map.entry(key).or_insert(Value::Null);
                }
                None => {
                    let mut keys = new_keys(rest);
                    let head = keys.remove(0);
                    let nested = keys.into_iter().rev().fold(value, |inner, key| {
                        let mut wrapper = Map::new();
                        wrapper.insert(key, inner);
                        Value::Object(wrapper)
                    });
                    map.insert(head, nested);
                    return Ok(());
                }
            },
            Value::Array(items) => {
                let len = items.len();
                let slot = match rest[0].parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                    Some(slot) => slot,
                    None => {
                        return Err(BrokerError::BadIndex {
                            path: path.to_string(),
                            segment: rest[0].to_string(),
                            len,
                        })
                    }
                };
                if rest.len() == 1 {
                    *slot = value;
                    return Ok(());
                }
                rest = &rest[1..];
                current = slot;
            }
            other => {
                return Err(BrokerError::NotAContainer {
                    path: path.to_string(),
                    found: value_kind(other),
                })
            }
        }
    }
}

/// Group unmatched segments into the keys to create.
///
/// A purely numeric segment is a section number and stays attached to the
/// segment after it, so `2.7_Theriocephalic_Iconography` becomes one key.
fn new_keys(segments: &[&str]) -> Vec<String> {
    let mut keys = Vec::with_capacity(segments.len());
    let mut pending: Option<&str> = None;

    for segment in segments {
        match pending.take() {
            Some(number) => keys.push(format!("{}{}{}", number, PATH_SEPARATOR, segment)),
            None if is_section_number(segment) => pending = Some(*segment),
            None => keys.push((*segment).to_string()),
        }
    }
    if let Some(number) = pending {
        keys.push(number.to_string());
    }
    keys
}

fn is_section_number(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Short name of a JSON value's kind, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
