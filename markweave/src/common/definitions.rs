//! Link and footnote definition tables.
//!
//! Markdown-style documents declare link targets and footnote bodies out of
//! line and point at them by identifier. Before a nested tree is flattened,
//! a single pre-order scan collects every definition so that references can
//! be resolved while the tree is walked. The tables live exactly as long as
//! one conversion call.

use crate::model::{Attrs, Node};
use serde_json::Value;
use std::collections::HashMap;

/// An out-of-line link target collected during the pre-pass scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub url: String,
    pub title: Option<String>,
    /// Attributes of the definition node beyond identifier/url/title.
    pub extra: Attrs,
}

/// Case-normalize a definition identifier.
///
/// Identifiers match case-insensitively; uppercasing both sides mirrors how
/// CommonMark implementations fold them.
pub(crate) fn normalize(identifier: &str) -> String {
    identifier.to_uppercase()
}

pub(crate) struct DefinitionTables<'t> {
    pub definitions: HashMap<String, Definition>,
    pub footnotes: HashMap<String, &'t Node>,
}

/// Collect every `definition` and `footnoteDefinition` in the tree.
///
/// On duplicate identifiers the first occurrence in pre-order wins and later
/// ones are ignored, matching link-definition precedence in Markdown.
pub(crate) fn scan(tree: &Node) -> DefinitionTables<'_> {
    let mut tables = DefinitionTables {
        definitions: HashMap::new(),
        footnotes: HashMap::new(),
    };
    visit(tree, &mut tables);
    tables
}

fn visit<'t>(node: &'t Node, tables: &mut DefinitionTables<'t>) {
    match node.tag.as_str() {
        "definition" => {
            if let Some(identifier) = node.str_attr("identifier") {
                tables
                    .definitions
                    .entry(normalize(identifier))
                    .or_insert_with(|| definition_record(node));
            }
        }
        "footnoteDefinition" => {
            if let Some(identifier) = node.str_attr("identifier") {
                tables
                    .footnotes
                    .entry(normalize(identifier))
                    .or_insert(node);
            }
        }
        _ => {}
    }
    for child in node.children() {
        visit(child, tables);
    }
}

fn definition_record(node: &Node) -> Definition {
    let mut extra = node.attrs.clone();
    extra.remove("identifier");
    extra.remove("label");
    let url = match extra.remove("url") {
        Some(Value::String(url)) => url,
        _ => String::new(),
    };
    let title = match extra.remove("title") {
        Some(Value::String(title)) => Some(title),
        _ => None,
    };
    Definition { url, title, extra }
}
