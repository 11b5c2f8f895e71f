//! Option keys, values and option sets.
//!
//! An [`OptionSet`] is owned either by the wrapper configuration or by the
//! dependency configuration. Values are typed by the catalog entry of their
//! key; see [`crate::core::catalog`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a toggle, unique within an option set.
pub type OptionKey = String;

/// The value of a single option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean toggle
    Bool(bool),
    /// Enumerated or free-form string
    Text(String),
    /// No explicit value; the receiving side keeps its own
    Inherit,
}

impl OptionValue {
    pub fn is_inherit(&self) -> bool {
        matches!(self, OptionValue::Inherit)
    }

    /// Get the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the string value, if this is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Inherit => f.write_str("<inherit>"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

/// Mapping from option key to value, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    values: BTreeMap<OptionKey, OptionValue>,
}

impl OptionSet {
    pub fn new() -> Self {
        OptionSet::default()
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<OptionKey>, value: impl Into<OptionValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`OptionSet::set`].
    pub fn with(mut self, key: impl Into<OptionKey>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Boolean value of `key`, or `default` when absent, inherited or not a boolean.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(OptionValue::as_bool).unwrap_or(default)
    }

    /// String value of `key`, if set.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of this set; inherited values in `other` do not override.
    pub fn merge(&mut self, other: &OptionSet) {
        for (key, value) in other.iter() {
            if !value.is_inherit() {
                self.set(key, value.clone());
            }
        }
    }
}

impl FromIterator<(OptionKey, OptionValue)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (OptionKey, OptionValue)>>(iter: I) -> Self {
        OptionSet {
            values: iter.into_iter().collect(),
        }
    }
}
