//! The CLI's document catalogue.
//!
//! The library is deliberately agnostic about which node and mark types
//! exist; this module is the caller side of that contract. It wires the
//! Markdown vocabulary produced by `markweave::markdown` to a small
//! editor-style flat vocabulary (`doc`, `paragraph`, `hard_break`,
//! `code_block`, ... plus the `em`/`strong`/`link`/`code` marks) and back.

use markweave::{
    to_flat_mark, to_flat_mark_with, to_flat_node, to_flat_node_with, to_nested_mark,
    to_nested_mark_with, to_nested_node, to_nested_node_with, Attrs, FlatNode, FlattenHandlers,
    Mark, NestHandlers, Node,
};

fn copy_attr(source: &Attrs, from: &str, target: &mut Attrs, to: &str) {
    if let Some(value) = source.get(from) {
        target.insert(to.to_string(), value.clone());
    }
}

/// Handlers for the nested → flat direction.
pub fn flatten_handlers() -> FlattenHandlers {
    FlattenHandlers::new()
        .on("paragraph", to_flat_node("paragraph"))
        .on("blockquote", to_flat_node("blockquote"))
        .on(
            "heading",
            to_flat_node_with("heading", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "depth", &mut attrs, "level");
                attrs
            }),
        )
        .on(
            "list",
            to_flat_node_with("list", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "ordered", &mut attrs, "ordered");
                copy_attr(&node.attrs, "start", &mut attrs, "start");
                attrs
            }),
        )
        .on("listItem", to_flat_node("list_item"))
        .on("thematicBreak", to_flat_node("horizontal_rule"))
        .on("break", to_flat_node("hard_break"))
        .on("code", |node, _parent, _state| {
            let mut attrs = Attrs::new();
            copy_attr(&node.attrs, "lang", &mut attrs, "language");
            Ok(vec![FlatNode::text("code_block", node.value().unwrap_or_default()).with_attrs(attrs)])
        })
        .on(
            "image",
            to_flat_node_with("image", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "url", &mut attrs, "src");
                copy_attr(&node.attrs, "alt", &mut attrs, "alt");
                copy_attr(&node.attrs, "title", &mut attrs, "title");
                attrs
            }),
        )
        .on("inlineCode", |node, _parent, state| {
            Ok(vec![state
                .schema()
                .text(node.value().unwrap_or_default())
                .with_marks(vec![Mark::new("code")])])
        })
        .on("footnoteReference", |node, _parent, state| {
            let identifier = node.str_attr("identifier").unwrap_or_default().to_string();
            let number = state.use_footnote(&identifier);
            Ok(vec![FlatNode::container("footnote_ref", vec![])
                .with_attr("identifier", identifier)
                .with_attr("number", number as u64)])
        })
        .on("emphasis", to_flat_mark("em"))
        .on("strong", to_flat_mark("strong"))
        .on(
            "link",
            to_flat_mark_with("link", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "url", &mut attrs, "href");
                copy_attr(&node.attrs, "title", &mut attrs, "title");
                attrs
            }),
        )
}

/// Handlers for the flat → nested direction.
pub fn nest_handlers() -> NestHandlers {
    NestHandlers::new()
        .on_node("paragraph", to_nested_node("paragraph"))
        .on_node("blockquote", to_nested_node("blockquote"))
        .on_node(
            "heading",
            to_nested_node_with("heading", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "level", &mut attrs, "depth");
                attrs
            }),
        )
        .on_node(
            "list",
            to_nested_node_with("list", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "ordered", &mut attrs, "ordered");
                copy_attr(&node.attrs, "start", &mut attrs, "start");
                attrs
            }),
        )
        .on_node("list_item", to_nested_node("listItem"))
        .on_node("horizontal_rule", to_nested_node("thematicBreak"))
        .on_node("hard_break", to_nested_node("break"))
        .on_node("code_block", |node, _parent, _state| {
            let mut out = Node::text("code", node.value().unwrap_or_default());
            if let Some(language) = node.attrs.get("language") {
                out.attrs.insert("lang".to_string(), language.clone());
            }
            Ok(vec![out])
        })
        .on_node(
            "image",
            to_nested_node_with("image", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "src", &mut attrs, "url");
                copy_attr(&node.attrs, "alt", &mut attrs, "alt");
                copy_attr(&node.attrs, "title", &mut attrs, "title");
                attrs
            }),
        )
        .on_node(
            "footnote_ref",
            to_nested_node_with("footnoteReference", |node| {
                let mut attrs = Attrs::new();
                copy_attr(&node.attrs, "identifier", &mut attrs, "identifier");
                attrs
            }),
        )
        .on_mark("em", to_nested_mark("emphasis"))
        .on_mark("strong", to_nested_mark("strong"))
        .on_mark("code", |_mark, _parent, children, _state| {
            let value: String = children.iter().filter_map(Node::value).collect();
            Ok(vec![Node::text("inlineCode", value)])
        })
        .on_mark(
            "link",
            to_nested_mark_with("link", |mark| {
                let mut attrs = Attrs::new();
                copy_attr(&mark.attrs, "href", &mut attrs, "url");
                copy_attr(&mark.attrs, "title", &mut attrs, "title");
                attrs
            }),
        )
}
