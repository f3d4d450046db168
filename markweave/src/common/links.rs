//! Resolution and reversion of indirect link/image references.
//!
//! A `linkReference` or `imageReference` points at a definition by
//! identifier instead of carrying its target. During flattening a resolvable
//! reference converts exactly as the equivalent direct node would; an
//! unresolvable one degrades to literal text that reconstructs the original
//! bracket syntax, so no content is ever lost.

use crate::common::flatten::FlattenState;
use crate::error::ConvertError;
use crate::model::{FlatBody, FlatNode, Node};
use serde_json::Value;

/// Default conversion for `linkReference` nodes.
pub(crate) fn link_reference(
    state: &mut FlattenState<'_>,
    node: &Node,
    parent: Option<&Node>,
) -> Result<Vec<FlatNode>, ConvertError> {
    let identifier = node.str_attr("identifier").unwrap_or_default();
    let Some(definition) = state.definition(identifier).cloned() else {
        return revert_link(state, node);
    };

    let mut link = Node::container("link", node.children().to_vec());
    link.attrs = definition.extra.clone();
    merge_reference_attrs(&mut link, node);
    link.attrs
        .insert("url".to_string(), Value::String(definition.url.clone()));
    if let Some(title) = &definition.title {
        link.attrs
            .insert("title".to_string(), Value::String(title.clone()));
    }

    match state.node_handler("link") {
        Some(handler) => handler(&link, parent, state),
        None => Ok(Vec::new()),
    }
}

/// Default conversion for `imageReference` nodes.
pub(crate) fn image_reference(
    state: &mut FlattenState<'_>,
    node: &Node,
    parent: Option<&Node>,
) -> Result<Vec<FlatNode>, ConvertError> {
    let identifier = node.str_attr("identifier").unwrap_or_default();
    let Some(definition) = state.definition(identifier).cloned() else {
        return revert_image(state, node);
    };

    let mut image = Node::container("image", vec![]);
    image.attrs = definition.extra.clone();
    merge_reference_attrs(&mut image, node);
    image
        .attrs
        .insert("url".to_string(), Value::String(definition.url.clone()));
    if let Some(title) = &definition.title {
        image
            .attrs
            .insert("title".to_string(), Value::String(title.clone()));
    }

    match state.node_handler("image") {
        Some(handler) => handler(&image, parent, state),
        None => Ok(Vec::new()),
    }
}

/// Copy the reference node's own data onto the synthesized direct node.
/// Reference data wins over definition data on key collision; the
/// reference-bookkeeping attributes themselves do not carry over.
fn merge_reference_attrs(target: &mut Node, reference: &Node) {
    for (key, value) in &reference.attrs {
        if matches!(key.as_str(), "identifier" | "label" | "referenceType") {
            continue;
        }
        target.attrs.insert(key.clone(), value.clone());
    }
}

/// Closing bracket sequence for the reference's original spelling.
fn suffix(node: &Node) -> String {
    match node.str_attr("referenceType") {
        Some("collapsed") => "][]".to_string(),
        Some("full") => {
            let label = node
                .str_attr("label")
                .or_else(|| node.str_attr("identifier"))
                .unwrap_or_default();
            format!("][{label}]")
        }
        _ => "]".to_string(),
    }
}

fn revert_image(state: &mut FlattenState<'_>, node: &Node) -> Result<Vec<FlatNode>, ConvertError> {
    let alt = node.str_attr("alt").unwrap_or_default();
    Ok(vec![state.schema().text(format!("![{alt}{}", suffix(node)))])
}

fn revert_link(state: &mut FlattenState<'_>, node: &Node) -> Result<Vec<FlatNode>, ConvertError> {
    let mut contents = state.all(node)?;
    let text_tag = state.schema().text_node().to_string();
    let suffix = suffix(node);

    // Fold the brackets into the neighboring text leaves when possible so
    // `[label]` comes back as one run instead of three.
    match contents.first_mut() {
        Some(head) if head.tag == text_tag => {
            if let FlatBody::Text(text) = &mut head.body {
                *text = format!("[{text}");
            }
        }
        _ => contents.insert(0, state.schema().text("[")),
    }

    match contents.last_mut() {
        Some(tail) if tail.tag == text_tag => {
            if let FlatBody::Text(text) = &mut tail.body {
                text.push_str(&suffix);
            }
        }
        _ => contents.push(state.schema().text(suffix)),
    }

    Ok(contents)
}
