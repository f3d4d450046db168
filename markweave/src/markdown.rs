//! Markdown front end (Markdown → nested tree)
//!
//! Builds nested-mark trees from CommonMark input.
//! Pipeline: Markdown string → Comrak AST → nested-mark tree
//!
//! The produced vocabulary follows Markdown AST conventions (`root`,
//! `paragraph`, `emphasis`, `inlineCode`, ...), which is also the vocabulary
//! the flatten engine's built-in defaults understand. The conversion core
//! itself never lexes text; this module is the upstream producer the
//! conversion entry points expect callers to bring.

use crate::model::Node;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parse Markdown into a nested-mark tree rooted at a `root` node.
pub fn parse(source: &str) -> Node {
    let arena = Arena::new();
    let options = default_options();
    let root = parse_document(&arena, source, &options);
    let mut nodes = convert(root);
    match nodes.pop() {
        Some(node) if nodes.is_empty() => node,
        _ => Node::container("root", vec![]),
    }
}

fn default_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options
}

fn convert<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let data = node.data.borrow();
    match &data.value {
        NodeValue::Document => vec![Node::container("root", children(node))],

        NodeValue::Paragraph => vec![Node::container("paragraph", children(node))],

        NodeValue::Heading(heading) => vec![Node::container("heading", children(node))
            .with_attr("depth", u64::from(heading.level))],

        NodeValue::BlockQuote => vec![Node::container("blockquote", children(node))],

        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let mut out = Node::container("list", children(node)).with_attr("ordered", ordered);
            if ordered {
                out = out.with_attr("start", list.start as u64);
            }
            vec![out]
        }

        NodeValue::Item(_) => vec![Node::container("listItem", children(node))],

        NodeValue::CodeBlock(block) => {
            let literal = block.literal.strip_suffix('\n').unwrap_or(&block.literal);
            let mut out = Node::text("code", literal);
            if !block.info.is_empty() {
                out = out.with_attr("lang", block.info.clone());
            }
            vec![out]
        }

        NodeValue::ThematicBreak => vec![Node::container("thematicBreak", vec![])],

        NodeValue::HtmlBlock(html) => {
            let literal = html.literal.strip_suffix('\n').unwrap_or(&html.literal);
            vec![Node::text("html", literal)]
        }

        NodeValue::HtmlInline(html) => vec![Node::text("html", html.clone())],

        NodeValue::FrontMatter(content) => {
            let yaml = content
                .trim()
                .trim_start_matches("---")
                .trim_end_matches("---")
                .trim();
            vec![Node::text("yaml", yaml)]
        }

        NodeValue::FootnoteDefinition(definition) => {
            vec![Node::container("footnoteDefinition", children(node))
                .with_attr("identifier", definition.name.clone())]
        }

        NodeValue::FootnoteReference(reference) => {
            vec![Node::container("footnoteReference", vec![])
                .with_attr("identifier", reference.name.clone())]
        }

        NodeValue::Text(text) => vec![Node::text("text", text.clone())],

        NodeValue::Emph => vec![Node::container("emphasis", children(node))],

        NodeValue::Strong => vec![Node::container("strong", children(node))],

        NodeValue::Code(code) => vec![Node::text("inlineCode", code.literal.clone())],

        NodeValue::Link(link) => {
            let mut out = Node::container("link", children(node)).with_attr("url", link.url.clone());
            if !link.title.is_empty() {
                out = out.with_attr("title", link.title.clone());
            }
            vec![out]
        }

        NodeValue::Image(link) => {
            let mut out = Node::container("image", vec![])
                .with_attr("url", link.url.clone())
                .with_attr("alt", collect_text(node));
            if !link.title.is_empty() {
                out = out.with_attr("title", link.title.clone());
            }
            vec![out]
        }

        // Soft line breaks stay in the text and collapse to spaces when the
        // tree is flattened.
        NodeValue::SoftBreak => vec![Node::text("text", "\n")],

        NodeValue::LineBreak => vec![Node::container("break", vec![])],

        // Anything else dissolves into its children.
        _ => children(node),
    }
}

fn children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    node.children().flat_map(convert).collect()
}

fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    visit_text(node, &mut out);
    out
}

fn visit_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => out.push_str(text),
        NodeValue::Code(code) => out.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
        _ => {
            for child in node.children() {
                visit_text(child, out);
            }
        }
    }
}
