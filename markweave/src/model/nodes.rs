//! Node types for the nested-mark and flat-mark tree models.
//!
//! Both models are deliberately untyped at the catalogue level: a node is a
//! string type tag plus an attribute map, and the set of valid tags is
//! whatever the caller's handler set understands. The nested model expresses
//! inline formatting as wrapper containers (the shape Markdown parsers
//! produce); the flat model has no wrappers and instead stores an ordered
//! mark list on every node (the shape structured editors consume).

use crate::error::ConvertError;
use crate::model::marks::Mark;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute map attached to nodes and marks.
///
/// A `BTreeMap` keeps equality independent of insertion order, which the
/// mark-grouping algorithm relies on.
pub type Attrs = BTreeMap<String, Value>;

/// A node in the nested-mark model.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    pub attrs: Attrs,
    pub body: NodeBody,
}

/// Payload of a nested-model node: child nodes or literal text.
///
/// Void nodes (`break`, `thematicBreak`, ...) are containers with no
/// children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Children(Vec<Node>),
    Text(String),
}

impl Node {
    /// Create a container node.
    pub fn container(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            tag: tag.into(),
            attrs: Attrs::new(),
            body: NodeBody::Children(children),
        }
    }

    /// Create a text leaf.
    pub fn text(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Node {
            tag: tag.into(),
            attrs: Attrs::new(),
            body: NodeBody::Text(value.into()),
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

    /// Child nodes, or an empty slice for text leaves.
    pub fn children(&self) -> &[Node] {
        match &self.body {
            NodeBody::Children(children) => children,
            NodeBody::Text(_) => &[],
        }
    }

    /// Literal text value, if this is a text leaf.
    pub fn value(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Text(value) => Some(value),
            NodeBody::Children(_) => None,
        }
    }

    /// String attribute lookup.
    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Decode a node tree from a JSON value.
    ///
    /// Wire shape: `{"type": tag, "attrs"?: {...}, "children"?: [...]}` for
    /// containers and `{"type": tag, "value": "..."}` for text leaves.
    /// Anything that is not an object with a string `type` is rejected as
    /// [`ConvertError::InvalidNode`], including values nested inside a
    /// `children` array.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        let object = value
            .as_object()
            .ok_or_else(|| ConvertError::InvalidNode(describe(value)))?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ConvertError::InvalidNode(describe(value)))?;

        let attrs = decode_attrs(object.get("attrs"));

        let body = if let Some(text) = object.get("value").and_then(Value::as_str) {
            NodeBody::Text(text.to_string())
        } else {
            let children = match object.get("children") {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(Node::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
                Some(other) => return Err(ConvertError::InvalidNode(describe(other))),
                None => Vec::new(),
            };
            NodeBody::Children(children)
        };

        Ok(Node {
            tag: tag.to_string(),
            attrs,
            body,
        })
    }

    /// Encode the node tree as a JSON value (inverse of [`Node::from_value`]).
    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("type".to_string(), Value::String(self.tag.clone()));
        if !self.attrs.is_empty() {
            object.insert("attrs".to_string(), encode_attrs(&self.attrs));
        }
        match &self.body {
            NodeBody::Text(value) => {
                object.insert("value".to_string(), Value::String(value.clone()));
            }
            NodeBody::Children(children) => {
                object.insert(
                    "children".to_string(),
                    Value::Array(children.iter().map(Node::to_value).collect()),
                );
            }
        }
        Value::Object(object)
    }
}

/// A node in the flat-mark model.
///
/// The `marks` list is ordered outermost-first: the first mark is the one a
/// nested rendition would wrap around all the others.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatNode {
    pub tag: String,
    pub attrs: Attrs,
    pub marks: Vec<Mark>,
    pub body: FlatBody,
}

/// Payload of a flat-model node.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatBody {
    Children(Vec<FlatNode>),
    Text(String),
}

impl FlatNode {
    /// Create a container node.
    pub fn container(tag: impl Into<String>, children: Vec<FlatNode>) -> Self {
        FlatNode {
            tag: tag.into(),
            attrs: Attrs::new(),
            marks: Vec::new(),
            body: FlatBody::Children(children),
        }
    }

    /// Create a text leaf.
    pub fn text(tag: impl Into<String>, value: impl Into<String>) -> Self {
        FlatNode {
            tag: tag.into(),
            attrs: Attrs::new(),
            marks: Vec::new(),
            body: FlatBody::Text(value.into()),
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

    /// Replace the mark list (builder style).
    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = marks;
        self
    }

    /// Child nodes, or an empty slice for text leaves.
    pub fn children(&self) -> &[FlatNode] {
        match &self.body {
            FlatBody::Children(children) => children,
            FlatBody::Text(_) => &[],
        }
    }

    /// Literal text value, if this is a text leaf.
    pub fn value(&self) -> Option<&str> {
        match &self.body {
            FlatBody::Text(value) => Some(value),
            FlatBody::Children(_) => None,
        }
    }

    /// String attribute lookup.
    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Decode a flat tree from a JSON value.
    ///
    /// Wire shape follows editor conventions: `content` for children, `text`
    /// for leaf text, `marks` for the mark list.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        let object = value
            .as_object()
            .ok_or_else(|| ConvertError::InvalidNode(describe(value)))?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ConvertError::InvalidNode(describe(value)))?;

        let attrs = decode_attrs(object.get("attrs"));

        let marks = match object.get("marks") {
            Some(Value::Array(items)) => items
                .iter()
                .map(Mark::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(ConvertError::InvalidNode(describe(other))),
            None => Vec::new(),
        };

        let body = if let Some(text) = object.get("text").and_then(Value::as_str) {
            FlatBody::Text(text.to_string())
        } else {
            let children = match object.get("content") {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(FlatNode::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
                Some(other) => return Err(ConvertError::InvalidNode(describe(other))),
                None => Vec::new(),
            };
            FlatBody::Children(children)
        };

        Ok(FlatNode {
            tag: tag.to_string(),
            attrs,
            marks,
            body,
        })
    }

    /// Encode the flat tree as a JSON value (inverse of [`FlatNode::from_value`]).
    pub fn to_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("type".to_string(), Value::String(self.tag.clone()));
        if !self.attrs.is_empty() {
            object.insert("attrs".to_string(), encode_attrs(&self.attrs));
        }
        if !self.marks.is_empty() {
            object.insert(
                "marks".to_string(),
                Value::Array(self.marks.iter().map(Mark::to_value).collect()),
            );
        }
        match &self.body {
            FlatBody::Text(value) => {
                object.insert("text".to_string(), Value::String(value.clone()));
            }
            FlatBody::Children(children) => {
                if !children.is_empty() {
                    object.insert(
                        "content".to_string(),
                        Value::Array(children.iter().map(FlatNode::to_value).collect()),
                    );
                }
            }
        }
        Value::Object(object)
    }
}

fn decode_attrs(value: Option<&Value>) -> Attrs {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => Attrs::new(),
    }
}

fn encode_attrs(attrs: &Attrs) -> Value {
    Value::Object(
        attrs
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}

/// Short description of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{b}`"),
        Value::Number(n) => format!("number `{n}`"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object without a type tag".to_string(),
    }
}
