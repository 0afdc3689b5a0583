//! Typed intermediate representation for slot values.
//!
//! Every fragment a layer contributes, and every configuration object a
//! template merges, is a [`ConfigValue`]. Live source expressions travel as
//! [`ConfigValue::Raw`] and are emitted verbatim by
//! [`stringify`](super::stringify::stringify).
//!
//! At the file boundary (TOML/JSON) a raw expression is written as a
//! single-key table: `{ "$raw" = "expr" }`. [`ConfigValue::from_json`] and
//! [`ConfigValue::to_json`] are the only places that convention exists.

use serde_json::{Map, Number, Value};

/// Key of the single-key table that encodes [`ConfigValue::Raw`] in files.
pub const RAW_KEY: &str = "$raw";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ConfigValue>),
    /// Ordered key/value pairs. Key order is preserved through merge and render.
    Object(Vec<(String, ConfigValue)>),
    /// Source code emitted unquoted.
    Raw(String),
}

impl ConfigValue {
    /// Wrap a source expression so it is rendered unquoted.
    pub fn raw(expr: impl Into<String>) -> Self {
        Self::Raw(expr.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, ConfigValue)>) -> Self {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a key on an object value.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Falsy fragments are dropped when a slot joins its contributions.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null | Self::Bool(false) => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Convert from a parsed JSON/TOML value, decoding the raw-expression table.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from_json).collect()),
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(expr)) = map.get(RAW_KEY) {
                        return Self::Raw(expr.clone());
                    }
                }
                Self::Object(
                    map.into_iter()
                        .map(|(k, v)| (k, Self::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Convert to a JSON value, encoding raw expressions as `{ "$raw": .. }`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                Value::Object(map)
            }
            Self::Raw(expr) => {
                let mut map = Map::new();
                map.insert(RAW_KEY.to_string(), Value::String(expr.clone()));
                Value::Object(map)
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self::Array(items)
    }
}
