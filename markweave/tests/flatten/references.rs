//! Reference resolution and reversion during flattening.
//!
//! Comrak resolves link references at parse time, so these tests build the
//! nested trees directly, the way an editor-side producer would.

use crate::common::{flatten_basic, flatten_handlers, p, root, t, SCHEMA};
use markweave::{flatten, to_flat_mark_with, Attrs, FlattenOptions, Node};
use serde_json::Value;

fn definition(identifier: &str, url: &str) -> Node {
    Node::container("definition", vec![])
        .with_attr("identifier", identifier)
        .with_attr("url", url)
}

fn link_reference(identifier: &str, style: &str, children: Vec<Node>) -> Node {
    Node::container("linkReference", children)
        .with_attr("identifier", identifier)
        .with_attr("referenceType", style)
}

#[test]
fn resolved_references_convert_like_direct_links() {
    let tree = root(vec![
        p(vec![link_reference("docs", "full", vec![t("the docs")])]),
        definition("docs", "https://docs.example"),
    ]);

    let doc = flatten_basic(&tree).unwrap();
    assert_eq!(doc.children().len(), 1);
    let leaf = &doc.children()[0].children()[0];
    assert_eq!(leaf.value(), Some("the docs"));
    assert_eq!(leaf.marks[0].tag, "link");
    assert_eq!(leaf.marks[0].str_attr("href"), Some("https://docs.example"));
}

#[test]
fn identifiers_resolve_case_insensitively() {
    let tree = root(vec![
        p(vec![link_reference("DOCS", "shortcut", vec![t("docs")])]),
        definition("Docs", "https://docs.example"),
    ]);

    let doc = flatten_basic(&tree).unwrap();
    let leaf = &doc.children()[0].children()[0];
    assert_eq!(leaf.marks[0].str_attr("href"), Some("https://docs.example"));
}

#[test]
fn first_definition_wins_on_duplicates() {
    let tree = root(vec![
        definition("docs", "https://first.example"),
        definition("docs", "https://second.example"),
        p(vec![link_reference("docs", "shortcut", vec![t("docs")])]),
    ]);

    let doc = flatten_basic(&tree).unwrap();
    let leaf = &doc.children()[0].children()[0];
    assert_eq!(leaf.marks[0].str_attr("href"), Some("https://first.example"));
}

#[test]
fn definition_titles_carry_over() {
    let tree = root(vec![
        definition("docs", "https://docs.example").with_attr("title", "The docs"),
        p(vec![link_reference("docs", "shortcut", vec![t("docs")])]),
    ]);

    let doc = flatten_basic(&tree).unwrap();
    let leaf = &doc.children()[0].children()[0];
    assert_eq!(leaf.marks[0].str_attr("title"), Some("The docs"));
}

#[test]
fn reference_data_wins_over_definition_data() {
    // A handler that copies every attribute of the synthesized link onto the
    // mark, so the merged data is observable.
    let handlers = flatten_handlers().on(
        "link",
        to_flat_mark_with("link", |node| node.attrs.clone()),
    );

    let tree = root(vec![
        definition("docs", "https://docs.example")
            .with_attr("rel", "external")
            .with_attr("channel", "definition"),
        p(vec![
            link_reference("docs", "shortcut", vec![t("docs")]).with_attr("channel", "reference"),
        ]),
    ]);

    let doc = flatten(
        &tree,
        FlattenOptions {
            schema: &SCHEMA,
            handlers: &handlers,
            raw_handlers: None,
        },
    )
    .unwrap();

    let mark = &doc.children()[0].children()[0].marks[0];
    assert_eq!(mark.str_attr("rel"), Some("external"));
    assert_eq!(mark.str_attr("channel"), Some("reference"));
    assert_eq!(mark.str_attr("url"), Some("https://docs.example"));
}

#[test]
fn unresolved_shortcut_reference_reverts_to_literal_text() {
    let tree = root(vec![p(vec![link_reference(
        "missing",
        "shortcut",
        vec![t("missing")],
    )])]);

    let doc = flatten_basic(&tree).unwrap();
    let leaves = doc.children()[0].children();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].value(), Some("[missing]"));
    assert!(leaves[0].marks.is_empty());
}

#[test]
fn unresolved_collapsed_reference_keeps_its_suffix() {
    let tree = root(vec![p(vec![link_reference(
        "missing",
        "collapsed",
        vec![t("missing")],
    )])]);

    let doc = flatten_basic(&tree).unwrap();
    assert_eq!(
        doc.children()[0].children()[0].value(),
        Some("[missing][]")
    );
}

#[test]
fn unresolved_full_reference_keeps_its_label() {
    let tree = root(vec![p(vec![link_reference(
        "missing",
        "full",
        vec![t("click here")],
    )
    .with_attr("label", "Missing")])]);

    let doc = flatten_basic(&tree).unwrap();
    assert_eq!(
        doc.children()[0].children()[0].value(),
        Some("[click here][Missing]")
    );
}

#[test]
fn unresolved_full_reference_falls_back_to_the_identifier() {
    let tree = root(vec![p(vec![link_reference(
        "missing",
        "full",
        vec![t("click here")],
    )])]);

    let doc = flatten_basic(&tree).unwrap();
    assert_eq!(
        doc.children()[0].children()[0].value(),
        Some("[click here][missing]")
    );
}

#[test]
fn reverted_brackets_merge_into_marked_neighbors() {
    let tree = root(vec![p(vec![link_reference(
        "missing",
        "shortcut",
        vec![Node::container("emphasis", vec![t("missing")])],
    )])]);

    let doc = flatten_basic(&tree).unwrap();
    let leaves = doc.children()[0].children();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].value(), Some("[missing]"));
    assert_eq!(leaves[0].marks[0].tag, "em");
}

#[test]
fn unresolved_image_reference_reverts_with_its_alt_text() {
    let tree = root(vec![p(vec![Node::container("imageReference", vec![])
        .with_attr("identifier", "cat")
        .with_attr("referenceType", "full")
        .with_attr("alt", "a cat")
        .with_attr("label", "cat")])]);

    let doc = flatten_basic(&tree).unwrap();
    assert_eq!(doc.children()[0].children()[0].value(), Some("![a cat][cat]"));
}

#[test]
fn resolved_image_reference_goes_through_the_image_handler() {
    let tree = root(vec![
        definition("cat", "https://cats.example/cat.png"),
        p(vec![Node::container("imageReference", vec![])
            .with_attr("identifier", "cat")
            .with_attr("referenceType", "shortcut")
            .with_attr("alt", "a cat")]),
    ]);

    let doc = flatten_basic(&tree).unwrap();
    let image = &doc.children()[0].children()[0];
    assert_eq!(image.tag, "image");
    assert_eq!(image.str_attr("src"), Some("https://cats.example/cat.png"));
    assert_eq!(image.str_attr("alt"), Some("a cat"));
}

#[test]
fn definitions_themselves_emit_nothing() {
    let tree = root(vec![
        definition("docs", "https://docs.example"),
        p(vec![t("body")]),
    ]);

    let doc = flatten_basic(&tree).unwrap();
    assert_eq!(doc.children().len(), 1);
    assert_eq!(doc.children()[0].tag, "paragraph");
}

#[test]
fn footnote_definitions_are_indexed_but_not_emitted() {
    let tree = root(vec![
        Node::container(
            "footnoteDefinition",
            vec![p(vec![t("The note body.")])],
        )
        .with_attr("identifier", "note"),
        p(vec![t("body")]),
    ]);

    let doc = flatten_basic(&tree).unwrap();
    assert_eq!(doc.children().len(), 1);
}

#[test]
fn custom_footnote_handler_can_use_the_state_tables() {
    let handlers = flatten_handlers().on("footnoteReference", |node, _parent, state| {
        let identifier = node.str_attr("identifier").unwrap_or_default().to_string();
        let number = state.use_footnote(&identifier);
        let known = state.footnote(&identifier).is_some();
        let mut attrs = Attrs::new();
        attrs.insert("number".to_string(), Value::from(number as u64));
        attrs.insert("known".to_string(), Value::from(known));
        Ok(vec![
            markweave::FlatNode::container("footnote_ref", vec![]).with_attrs(attrs),
        ])
    });

    let tree = root(vec![
        Node::container("footnoteDefinition", vec![p(vec![t("note")])])
            .with_attr("identifier", "a"),
        p(vec![
            Node::container("footnoteReference", vec![]).with_attr("identifier", "a"),
            Node::container("footnoteReference", vec![]).with_attr("identifier", "a"),
        ]),
    ]);

    let doc = flatten(
        &tree,
        FlattenOptions {
            schema: &SCHEMA,
            handlers: &handlers,
            raw_handlers: None,
        },
    )
    .unwrap();

    let refs = doc.children()[0].children();
    assert_eq!(refs[0].attrs.get("number"), Some(&Value::from(1u64)));
    assert_eq!(refs[1].attrs.get("number"), Some(&Value::from(2u64)));
    assert_eq!(refs[0].attrs.get("known"), Some(&Value::from(true)));
}
