//! Embedded raw-markup bridge.
//!
//! Nested trees built from Markdown may carry `html` nodes whose value is a
//! fragment of raw markup. We use the `html5ever` + `markup5ever_rcdom`
//! ecosystem to parse the fragment, reduce it to a small element tree, and
//! re-dispatch the first element through a caller-supplied handler map keyed
//! by tag name.
//!
//! The policy here is graceful degradation rather than failure: raw markup
//! that does not parse to an element, or parses to one nobody handles, is
//! emitted as a literal text leaf. An embedded fragment can therefore never
//! abort a conversion.

use crate::common::flatten::FlattenState;
use crate::error::ConvertError;
use crate::model::{FlatNode, Node};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::{BTreeMap, HashMap};

/// A node of the small tree the embedded sub-parser yields.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Element(RawElement),
    Text(String),
}

/// An element of the embedded markup, with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<RawNode>,
}

impl RawElement {
    /// Attribute lookup by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(children: &[RawNode], out: &mut String) {
    for child in children {
        match child {
            RawNode::Text(text) => out.push_str(text),
            RawNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Handler for one embedded element tag.
pub type RawHandler = Box<
    dyn Fn(&RawElement, &mut FlattenState<'_>) -> Result<Vec<FlatNode>, ConvertError>
        + Send
        + Sync,
>;

/// Handler set for embedded raw markup, keyed by element tag name.
#[derive(Default)]
pub struct RawHandlers {
    elements: HashMap<String, RawHandler>,
}

impl RawHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an element tag (builder style).
    pub fn on<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&RawElement, &mut FlattenState<'_>) -> Result<Vec<FlatNode>, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        self.elements.insert(tag.into(), Box::new(handler));
        self
    }

    pub fn get(&self, tag: &str) -> Option<&RawHandler> {
        self.elements.get(tag)
    }
}

/// Default conversion for `html` nodes.
pub(crate) fn bridge(
    state: &mut FlattenState<'_>,
    node: &Node,
) -> Result<Vec<FlatNode>, ConvertError> {
    let value = node.value().unwrap_or_default();
    if let Some(element) = parse_embedded(value) {
        if let Some(handler) = state.raw_handler(&element.tag) {
            let result = handler(&element, state)?;
            if !result.is_empty() {
                return Ok(result);
            }
        }
    }
    if value.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![state.schema().text(value)])
    }
}

/// Parse a raw fragment and return the first element under `<body>`, if any.
fn parse_embedded(value: &str) -> Option<RawElement> {
    if value.trim().is_empty() {
        return None;
    }
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut value.as_bytes())
        .ok()?;
    let html = find_child_element(&dom.document, Some("html"))?;
    let body = find_child_element(&html, Some("body"))?;
    let element = find_child_element(&body, None)?;
    convert_element(&element)
}

/// First child element, optionally filtered by tag name.
fn find_child_element(handle: &Handle, name: Option<&str>) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| match &child.data {
            NodeData::Element { name: qual, .. } => name.map_or(true, |n| &*qual.local == n),
            _ => false,
        })
        .cloned()
}

fn convert_element(handle: &Handle) -> Option<RawElement> {
    let NodeData::Element { name, attrs, .. } = &handle.data else {
        return None;
    };
    let attrs = attrs
        .borrow()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect();
    let children = handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect();
    Some(RawElement {
        tag: name.local.to_string(),
        attrs,
        children,
    })
}

fn convert_node(handle: &Handle) -> Option<RawNode> {
    match &handle.data {
        NodeData::Element { .. } => convert_element(handle).map(RawNode::Element),
        NodeData::Text { contents } => Some(RawNode::Text(contents.borrow().to_string())),
        _ => None,
    }
}
