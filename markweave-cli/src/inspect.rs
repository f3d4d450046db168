//! Tree visualization for the `inspect` command.
//!
//! Renders either model as one indented line per node, with attributes and
//! marks spelled out, so conversion output can be eyeballed without wading
//! through JSON.

use markweave::{FlatNode, Mark, Node};

pub fn render_nested(node: &Node) -> String {
    let mut out = String::new();
    nested_into(node, 0, &mut out);
    out
}

pub fn render_flat(node: &FlatNode) -> String {
    let mut out = String::new();
    flat_into(node, 0, &mut out);
    out
}

fn nested_into(node: &Node, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&node.tag);
    push_attrs(&node.attrs, out);
    if let Some(value) = node.value() {
        out.push_str(&format!(" {value:?}"));
    }
    out.push('\n');
    for child in node.children() {
        nested_into(child, depth + 1, out);
    }
}

fn flat_into(node: &FlatNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&node.tag);
    push_attrs(&node.attrs, out);
    if !node.marks.is_empty() {
        out.push_str(&format!(" [{}]", join_marks(&node.marks)));
    }
    if let Some(value) = node.value() {
        out.push_str(&format!(" {value:?}"));
    }
    out.push('\n');
    for child in node.children() {
        flat_into(child, depth + 1, out);
    }
}

fn push_attrs(attrs: &markweave::Attrs, out: &mut String) {
    if attrs.is_empty() {
        return;
    }
    let rendered: Vec<String> = attrs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    out.push_str(&format!(" ({})", rendered.join(", ")));
}

fn join_marks(marks: &[Mark]) -> String {
    marks
        .iter()
        .map(|mark| mark.tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
