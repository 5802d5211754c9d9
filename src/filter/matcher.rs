use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::api::models::CustomProperty;

/// What a property value is tested against. Values are held lowercased.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchCriterion {
    Single(String),
    AnyOf(BTreeSet<String>),
}

impl MatchCriterion {
    /// Build from the single `value` and an optional comma-separated list.
    ///
    /// A non-empty list wins over the single value, even if every entry
    /// in it is blank (nothing can match then).
    pub fn new(value: &str, values: Option<&str>) -> Self {
        match values.filter(|v| !v.is_empty()) {
            Some(list) => MatchCriterion::AnyOf(
                list.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_lowercase)
                    .collect(),
            ),
            None => MatchCriterion::Single(value.to_lowercase()),
        }
    }

    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            MatchCriterion::Single(target) => target == normalized,
            MatchCriterion::AnyOf(accepted) => accepted.contains(normalized),
        }
    }
}

impl fmt::Display for MatchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchCriterion::Single(target) => write!(f, "{}", target),
            MatchCriterion::AnyOf(accepted) => {
                let list: Vec<&str> = accepted.iter().map(String::as_str).collect();
                write!(f, "{}", list.join(","))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyMatch {
    /// The repository has no property with the target name.
    NotFound,
    /// The property exists; `value` is its lowercased text form.
    Found { value: String, matched: bool },
}

impl PropertyMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, PropertyMatch::Found { matched: true, .. })
    }
}

/// Look up `name` (case-sensitive, first occurrence only) and test its value.
pub fn match_property(
    properties: &[CustomProperty],
    name: &str,
    criterion: &MatchCriterion,
) -> PropertyMatch {
    match properties.iter().find(|p| p.property_name == name) {
        None => PropertyMatch::NotFound,
        Some(property) => {
            let value = property_value_string(&property.value).to_lowercase();
            let matched = criterion.matches(&value);
            PropertyMatch::Found { value, matched }
        }
    }
}

/// Text form of a custom property value.
pub fn property_value_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(property_value_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
