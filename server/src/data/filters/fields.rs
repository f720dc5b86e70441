//! Payload field allow-list
//!
//! Built from a level's declared `variable_schema`. Ingestion stores payload
//! keys upper-cased, so lookups are case-insensitive and resolve to the
//! upper-cased declared name.

use std::collections::HashMap;

use serde_json::Value;

/// Allow-list of filterable payload keys for one survey level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadFields {
    /// lowercase name -> payload key
    keys: HashMap<String, String>,
}

impl PayloadFields {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .map(|n| (n.to_lowercase(), n.to_uppercase()))
            .collect();
        Self { keys }
    }

    /// Build from a `variable_schema` JSON value.
    ///
    /// Accepts an array of `{"name": ..}` objects; bare strings are tolerated.
    /// Anything else yields an empty allow-list.
    pub fn from_variable_schema(schema: &Value) -> Self {
        let Some(items) = schema.as_array() else {
            return Self::default();
        };
        Self::new(items.iter().filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str),
            _ => None,
        }))
    }

    /// Resolve a client-supplied field name to the stored payload key
    pub fn resolve(&self, field: &str) -> Option<&str> {
        self.keys.get(&field.trim().to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
