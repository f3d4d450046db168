//! Nested → flat conversion engine.
//!
//! # The High-Level Concept
//!
//! The nested model expresses formatting as wrapper nodes: an emphasized
//! phrase is an `emphasis` container holding the text it formats. The flat
//! model has no wrappers; each leaf carries the list of marks in effect for
//! it. Flattening is therefore a recursive descent that dissolves wrapper
//! nodes into mark annotations on whatever their subtrees convert to.
//!
//! # The Algorithm
//!
//! 1. **Pre-pass:** scan the source tree once and index every link and
//!    footnote definition, so indirect references can be resolved during the
//!    walk.
//! 2. **Dispatch:** for each node, a caller-registered handler wins; without
//!    one, the built-in defaults cover the root, text leaves, ignorable
//!    types, references and embedded raw markup. Any other tag is a hard
//!    error.
//! 3. **Mark accumulation:** wrapper handlers built with
//!    [`crate::registry::to_flat_mark`] convert their children first, then
//!    merge the wrapper's mark into every produced node. The merge
//!    deduplicates equal marks and keeps the schema's canonical order, so a
//!    leaf under `emphasis(strong(..))` and one under `strong(emphasis(..))`
//!    come out with identical mark lists.
//!
//! The reverse transform lives in [`crate::common::nest`]; the two engines
//! round-trip up to mark-order canonicalization.

use crate::common::definitions::{self, Definition};
use crate::common::links;
use crate::error::ConvertError;
use crate::html::{self, RawHandler, RawHandlers};
use crate::model::{FlatBody, FlatNode, Node, Schema};
use crate::registry::{FlattenHandlers, FlattenNodeHandler};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Everything a nested → flat conversion call needs besides the tree.
pub struct FlattenOptions<'a> {
    pub schema: &'a Schema,
    pub handlers: &'a FlattenHandlers,
    /// Handlers for elements embedded in raw `html` nodes.
    pub raw_handlers: Option<&'a RawHandlers>,
}

/// Convert a nested-mark tree into a flat-mark tree.
///
/// The input is read-only; the returned tree is freshly allocated. Fails if
/// a node's tag has neither a registered handler nor a built-in default, or
/// if the conversion does not produce exactly one root.
pub fn flatten<'a>(tree: &'a Node, options: FlattenOptions<'a>) -> Result<FlatNode, ConvertError> {
    let mut state = FlattenState::new(tree, options);
    let mut result = state.one(tree, None)?;
    if result.len() != 1 {
        return Err(ConvertError::StructuralAssertion(format!(
            "conversion produced {} top-level nodes, expected exactly one",
            result.len()
        )));
    }
    Ok(result.remove(0))
}

/// Per-call conversion state for the nested → flat direction.
///
/// Owns the definition tables and footnote usage bookkeeping for one call
/// and exposes the `one`/`all` traversal primitives to handlers. A state is
/// never shared between conversions.
pub struct FlattenState<'a> {
    schema: &'a Schema,
    handlers: &'a FlattenHandlers,
    raw_handlers: Option<&'a RawHandlers>,
    definitions: HashMap<String, Definition>,
    footnotes: HashMap<String, &'a Node>,
    footnote_counts: HashMap<String, usize>,
    footnote_order: Vec<String>,
}

impl<'a> FlattenState<'a> {
    fn new(tree: &'a Node, options: FlattenOptions<'a>) -> Self {
        let tables = definitions::scan(tree);
        FlattenState {
            schema: options.schema,
            handlers: options.handlers,
            raw_handlers: options.raw_handlers,
            definitions: tables.definitions,
            footnotes: tables.footnotes,
            footnote_counts: HashMap::new(),
            footnote_order: Vec::new(),
        }
    }

    /// The destination schema.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Look up a link definition by identifier (case-insensitive).
    pub fn definition(&self, identifier: &str) -> Option<&Definition> {
        self.definitions.get(&definitions::normalize(identifier))
    }

    /// Look up a footnote definition node by identifier (case-insensitive).
    pub fn footnote(&self, identifier: &str) -> Option<&'a Node> {
        self.footnotes
            .get(&definitions::normalize(identifier))
            .copied()
    }

    /// Record one usage of a footnote and return its occurrence count so
    /// far. The first usage also fixes the footnote's position in
    /// [`FlattenState::footnote_order`].
    pub fn use_footnote(&mut self, identifier: &str) -> usize {
        let id = definitions::normalize(identifier);
        let count = self.footnote_counts.entry(id.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.footnote_order.push(id);
        }
        *count
    }

    /// Footnote identifiers in first-use order.
    pub fn footnote_order(&self) -> &[String] {
        &self.footnote_order
    }

    pub(crate) fn node_handler(&self, tag: &str) -> Option<&'a FlattenNodeHandler> {
        self.handlers.get(tag)
    }

    pub(crate) fn raw_handler(&self, tag: &str) -> Option<&'a RawHandler> {
        self.raw_handlers.and_then(|handlers| handlers.get(tag))
    }

    /// Convert a single node, dispatching on its type tag.
    pub fn one(&mut self, node: &Node, parent: Option<&Node>) -> Result<Vec<FlatNode>, ConvertError> {
        if let Some(handler) = self.node_handler(&node.tag) {
            return handler(node, parent, self);
        }
        match node.tag.as_str() {
            "root" => {
                let children = self.all(node)?;
                if children.is_empty() {
                    return Err(ConvertError::StructuralAssertion(
                        "converting the root produced no content".to_string(),
                    ));
                }
                Ok(vec![FlatNode::container(
                    self.schema.top_node().to_string(),
                    children,
                )])
            }
            "text" => Ok(vec![self
                .schema
                .text(normalize_text(node.value().unwrap_or_default()))]),
            // Declarations and front matter carry no renderable content.
            "yaml" | "toml" | "definition" | "footnoteDefinition" => Ok(Vec::new()),
            "html" => html::bridge(self, node),
            "linkReference" => links::link_reference(self, node, parent),
            "imageReference" => links::image_reference(self, node, parent),
            _ => Err(ConvertError::UnknownNode(node.tag.clone())),
        }
    }

    /// Convert all children of a node, in order.
    pub fn all(&mut self, parent: &Node) -> Result<Vec<FlatNode>, ConvertError> {
        let children = parent.children();
        let mut values = Vec::new();
        for (index, child) in children.iter().enumerate() {
            let mut result = self.one(child, Some(parent))?;
            // A hard break already ends the line; the markdown-significant
            // spaces that follow it must not leak into the next leaf.
            if index > 0 && children[index - 1].tag == "break" {
                if let [single] = result.as_mut_slice() {
                    trim_after_break(single, self.schema.text_node());
                }
            }
            values.extend(result);
        }
        Ok(values)
    }
}

fn trim_after_break(node: &mut FlatNode, text_tag: &str) {
    if node.tag == text_tag {
        if let FlatBody::Text(text) = &mut node.body {
            *text = trim_space_start(text).to_string();
        }
        return;
    }
    if let FlatBody::Children(children) = &mut node.body {
        if let Some(first) = children.first_mut() {
            if first.tag == text_tag {
                if let FlatBody::Text(text) = &mut first.body {
                    *text = trim_space_start(text).to_string();
                }
            }
        }
    }
}

static NEWLINE_THEN_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n([^\n])").expect("newline pattern compiles"));

/// Normalize text leaf content the way Markdown renders it: spaces and tabs
/// around line endings are dropped, and remaining single newlines become
/// spaces.
fn normalize_text(value: &str) -> String {
    NEWLINE_THEN_CHAR
        .replace_all(&trim_lines(value), " $1")
        .into_owned()
}

/// Remove spaces and tabs around line endings, keeping the endings.
fn trim_lines(value: &str) -> String {
    let lines: Vec<&str> = value.split('\n').collect();
    let last = lines.len() - 1;
    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let line = if index > 0 {
                line.trim_start_matches([' ', '\t'])
            } else {
                line
            };
            if index < last {
                line.trim_end_matches([' ', '\t'])
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim spaces and tabs at the start of `value`.
fn trim_space_start(value: &str) -> &str {
    value.trim_start_matches([' ', '\t'])
}
