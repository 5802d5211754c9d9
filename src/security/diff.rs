use serde::Serialize;
use serde_json::{Map, Value};

use crate::security::configuration::SecurityConfiguration;

/// Keys assigned by GitHub; never part of a comparison at any depth.
const IGNORED_KEYS: [&str; 2] = ["id", "target_type"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// Present in both records with different values.
    Modified { path: String, old: Value, new: Value },
    /// Present only in the desired record.
    Added { path: String, new: Value },
    /// Desired holds a nested object where current holds something else.
    TypeChanged { path: String, old: Value, new: Value },
}

impl Change {
    pub fn path(&self) -> &str {
        match self {
            Change::Modified { path, .. }
            | Change::Added { path, .. }
            | Change::TypeChanged { path, .. } => path,
        }
    }
}

/// Compare the remote configuration against the desired one.
///
/// The comparison is driven by `desired`: fields only `current` has are
/// never reported. A missing `current` behaves like an empty record, so
/// every desired field shows up as an addition.
pub fn diff_configurations(
    current: Option<&SecurityConfiguration>,
    desired: &SecurityConfiguration,
) -> Vec<Change> {
    let current = current.map(to_object).unwrap_or_default();
    let desired = to_object(desired);
    diff_objects(&current, &desired)
}

fn to_object(config: &SecurityConfiguration) -> Map<String, Value> {
    match serde_json::to_value(config) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Desired-driven structural diff of two JSON objects.
pub fn diff_objects(current: &Map<String, Value>, desired: &Map<String, Value>) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_into(current, desired, "", &mut changes);
    changes
}

fn diff_into(
    current: &Map<String, Value>,
    desired: &Map<String, Value>,
    prefix: &str,
    changes: &mut Vec<Change>,
) {
    for (key, new) in desired {
        if IGNORED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        let Some(old) = current.get(key) else {
            changes.push(Change::Added {
                path,
                new: new.clone(),
            });
            continue;
        };

        match (old, new) {
            (Value::Object(old_map), Value::Object(new_map)) => {
                diff_into(old_map, new_map, &path, changes);
            }
            (_, Value::Object(_)) => changes.push(Change::TypeChanged {
                path,
                old: old.clone(),
                new: new.clone(),
            }),
            _ => {
                if !values_equal(old, new) {
                    changes.push(Change::Modified {
                        path,
                        old: old.clone(),
                        new: new.clone(),
                    });
                }
            }
        }
    }
}

/// Typed equality with textual fallback.
///
/// Same-kind values compare by kind (numbers numerically, lists element
/// by element). Mixed kinds fall back to comparing their rendered text,
/// so `true` and `"true"` are equal while `null` equals only `null`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => render_value(a) == render_value(b),
    }
}

/// Plain text form of a JSON value: strings unquoted, containers as JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
