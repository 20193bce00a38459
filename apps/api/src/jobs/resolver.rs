//! Field Resolver — finds one display value in a schema-less provider record.
//!
//! Providers disagree on field names (`title` vs `jobTitle`, `company` as a
//! string vs `{"name": ...}`), so callers pass an ordered list of candidate
//! key-paths and the first usable value wins. Absence is ordinary control
//! flow and yields `None`; the record is only ever borrowed.

use serde_json::{Map, Value};

/// Sub-keys probed, in order, when a candidate resolves to an object.
/// `location` deliberately precedes `name`.
pub const SUB_KEY_PREFERENCE: [&str; 5] = ["location", "city", "name", "address", "formattedLocation"];

pub const DEFAULT_JOIN: &str = ", ";

/// Same as [`resolve_with`] using `", "` to join multi-value fields.
pub fn resolve(record: &Value, candidates: &[&str]) -> Option<String> {
    resolve_with(record, candidates, DEFAULT_JOIN)
}

/// Returns the first usable human-readable value among `candidates`.
///
/// A candidate like `"company.name"` walks nested objects. Per resolved value:
/// - array: each element becomes its preferred sub-key (objects) or its
///   string form, joined with `join_separator`; returned if non-empty.
/// - object: its preferred sub-key if present, otherwise all truthy values
///   joined with `", "`. That join is returned even when it is empty.
/// - string / number / bool: string form, trimmed, returned if non-empty.
pub fn resolve_with(record: &Value, candidates: &[&str], join_separator: &str) -> Option<String> {
    for candidate in candidates {
        let Some(value) = lookup_path(record, candidate) else {
            continue;
        };

        match value {
            Value::Array(items) => {
                if !items.is_empty() {
                    let parts: Vec<String> = items
                        .iter()
                        .map(|item| match item {
                            Value::Object(map) => {
                                preferred_sub_value(map).unwrap_or_else(|| to_display(item))
                            }
                            other => to_display(other),
                        })
                        .collect();
                    return Some(parts.join(join_separator));
                }
            }
            Value::Object(map) => {
                if let Some(sub) = preferred_sub_value(map) {
                    return Some(sub);
                }
                let joined = map
                    .values()
                    .filter(|v| is_truthy(v))
                    .map(to_display)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Some(joined);
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                let text = to_display(value);
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
            Value::Null => {}
        }
    }
    None
}

/// Walks a dotted key-path through nested objects. `null` counts as absent.
pub fn lookup_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

/// Substitutes `default` for absent or empty values.
pub fn display_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn preferred_sub_value(map: &Map<String, Value>) -> Option<String> {
    SUB_KEY_PREFERENCE
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| is_truthy(v))
        .map(to_display)
}

/// Whether a value carries content: not null, not `false`, not zero, and not
/// an empty string, array or object.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Strings render bare, everything else as compact JSON.
fn to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
