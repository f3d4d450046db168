//! Formatting marks for the flat-mark model.

use crate::error::ConvertError;
use crate::model::nodes::{describe, Attrs};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A formatting annotation: type tag plus attributes.
///
/// Two marks are equal iff their tags match and their attribute maps are
/// structurally equal; attribute key order never matters. This equality is
/// what decides whether adjacent leaves may share a wrapper when the flat
/// model is re-nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl Mark {
    /// Create a mark with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Mark {
            tag: tag.into(),
            attrs: Attrs::new(),
        }
    }

    /// Attach a single attribute (builder style).
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Replace the whole attribute map (builder style).
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// String attribute lookup.
    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Decode a mark from its JSON value: `{"type": tag, "attrs"?: {...}}`.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        let object = value
            .as_object()
            .ok_or_else(|| ConvertError::InvalidNode(describe(value)))?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ConvertError::InvalidNode(describe(value)))?;
        let attrs = match object.get("attrs") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => Attrs::new(),
        };
        Ok(Mark {
            tag: tag.to_string(),
            attrs,
        })
    }

    /// Encode the mark as a JSON value.
    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("type".to_string(), Value::String(self.tag.clone()));
        if !self.attrs.is_empty() {
            object.insert(
                "attrs".to_string(),
                Value::Object(
                    self.attrs
                        .iter()
                        .map(|(key, value)| (key.clone(), value.clone()))
                        .collect(),
                ),
            );
        }
        Value::Object(object)
    }
}
