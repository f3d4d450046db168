//! Shared fixtures for the conversion tests: a small "basic" catalogue with
//! handlers for both directions, plus tree builders and dump helpers.

use markweave::{
    flatten, nest, to_flat_mark, to_flat_mark_with, to_flat_node, to_flat_node_with,
    to_nested_mark, to_nested_mark_with, to_nested_node, to_nested_node_with, Attrs, ConvertError,
    FlatNode, FlattenHandlers, FlattenOptions, Mark, NestHandlers, NestOptions, Node, RawHandlers,
    Schema,
};
use once_cell::sync::Lazy;
use serde_json::Value;

pub static SCHEMA: Lazy<Schema> = Lazy::new(|| Schema::new("doc", "text", ["link", "em", "strong"]));

pub fn flatten_handlers() -> FlattenHandlers {
    FlattenHandlers::new()
        .on("paragraph", to_flat_node("paragraph"))
        .on("blockquote", to_flat_node("blockquote"))
        .on(
            "heading",
            to_flat_node_with("heading", |node| {
                let mut attrs = Attrs::new();
                if let Some(depth) = node.attrs.get("depth") {
                    attrs.insert("level".to_string(), depth.clone());
                }
                attrs
            }),
        )
        .on("break", |_node, _parent, _state| {
            Ok(vec![FlatNode::container("hard_break", vec![])])
        })
        .on(
            "image",
            to_flat_node_with("image", |node| {
                let mut attrs = Attrs::new();
                for (from, to) in [("url", "src"), ("alt", "alt"), ("title", "title")] {
                    if let Some(value) = node.attrs.get(from) {
                        attrs.insert(to.to_string(), value.clone());
                    }
                }
                attrs
            }),
        )
        .on("emphasis", to_flat_mark("em"))
        .on("strong", to_flat_mark("strong"))
        .on(
            "link",
            to_flat_mark_with("link", |node| {
                let mut attrs = Attrs::new();
                if let Some(url) = node.str_attr("url") {
                    attrs.insert("href".to_string(), Value::String(url.to_string()));
                }
                if let Some(title) = node.str_attr("title") {
                    attrs.insert("title".to_string(), Value::String(title.to_string()));
                }
                attrs
            }),
        )
}

pub fn nest_handlers() -> NestHandlers {
    NestHandlers::new()
        .on_node("paragraph", to_nested_node("paragraph"))
        .on_node("blockquote", to_nested_node("blockquote"))
        .on_node(
            "heading",
            to_nested_node_with("heading", |node| {
                let mut attrs = Attrs::new();
                if let Some(level) = node.attrs.get("level") {
                    attrs.insert("depth".to_string(), level.clone());
                }
                attrs
            }),
        )
        .on_node("hard_break", to_nested_node("break"))
        .on_node(
            "image",
            to_nested_node_with("image", |node| {
                let mut attrs = Attrs::new();
                for (from, to) in [("src", "url"), ("alt", "alt"), ("title", "title")] {
                    if let Some(value) = node.attrs.get(from) {
                        attrs.insert(to.to_string(), value.clone());
                    }
                }
                attrs
            }),
        )
        .on_mark("em", to_nested_mark("emphasis"))
        .on_mark("strong", to_nested_mark("strong"))
        .on_mark(
            "link",
            to_nested_mark_with("link", |mark| {
                let mut attrs = Attrs::new();
                if let Some(href) = mark.str_attr("href") {
                    attrs.insert("url".to_string(), Value::String(href.to_string()));
                }
                if let Some(title) = mark.str_attr("title") {
                    attrs.insert("title".to_string(), Value::String(title.to_string()));
                }
                attrs
            }),
        )
}

pub fn flatten_basic(tree: &Node) -> Result<FlatNode, ConvertError> {
    let handlers = flatten_handlers();
    flatten(
        tree,
        FlattenOptions {
            schema: &SCHEMA,
            handlers: &handlers,
            raw_handlers: None,
        },
    )
}

pub fn flatten_with_raw(tree: &Node, raw: &RawHandlers) -> Result<FlatNode, ConvertError> {
    let handlers = flatten_handlers();
    flatten(
        tree,
        FlattenOptions {
            schema: &SCHEMA,
            handlers: &handlers,
            raw_handlers: Some(raw),
        },
    )
}

pub fn nest_basic(tree: &FlatNode) -> Result<Node, ConvertError> {
    let handlers = nest_handlers();
    nest(
        tree,
        NestOptions {
            schema: &SCHEMA,
            handlers: &handlers,
        },
    )
}

// Nested-side builders.

pub fn root(children: Vec<Node>) -> Node {
    Node::container("root", children)
}

pub fn p(children: Vec<Node>) -> Node {
    Node::container("paragraph", children)
}

pub fn t(value: &str) -> Node {
    Node::text("text", value)
}

pub fn em(children: Vec<Node>) -> Node {
    Node::container("emphasis", children)
}

pub fn strong(children: Vec<Node>) -> Node {
    Node::container("strong", children)
}

// Flat-side builders.

pub fn doc(children: Vec<FlatNode>) -> FlatNode {
    FlatNode::container("doc", children)
}

pub fn fp(children: Vec<FlatNode>) -> FlatNode {
    FlatNode::container("paragraph", children)
}

pub fn ft(value: &str) -> FlatNode {
    FlatNode::text("text", value)
}

pub fn marked(value: &str, marks: Vec<Mark>) -> FlatNode {
    ft(value).with_marks(marks)
}

/// Render a flat tree as indented lines, one node per line, marks in
/// brackets. Deterministic, for snapshot assertions.
pub fn dump_flat(node: &FlatNode) -> String {
    let mut out = Vec::new();
    dump_flat_into(node, 0, &mut out);
    out.join("\n")
}

fn dump_flat_into(node: &FlatNode, depth: usize, out: &mut Vec<String>) {
    let mut line = format!("{}{}", "  ".repeat(depth), node.tag);
    if let Some(value) = node.value() {
        line.push_str(&format!(" {value:?}"));
    }
    if !node.marks.is_empty() {
        let tags: Vec<&str> = node.marks.iter().map(|mark| mark.tag.as_str()).collect();
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    out.push(line);
    for child in node.children() {
        dump_flat_into(child, depth + 1, out);
    }
}

/// Render a nested tree as indented lines, one node per line.
pub fn dump_nested(node: &Node) -> String {
    let mut out = Vec::new();
    dump_nested_into(node, 0, &mut out);
    out.join("\n")
}

fn dump_nested_into(node: &Node, depth: usize, out: &mut Vec<String>) {
    let mut line = format!("{}{}", "  ".repeat(depth), node.tag);
    if let Some(value) = node.value() {
        line.push_str(&format!(" {value:?}"));
    }
    out.push(line);
    for child in node.children() {
        dump_nested_into(child, depth + 1, out);
    }
}
