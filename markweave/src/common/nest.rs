//! Flat → nested conversion engine.
//!
//! # The High-Level Concept
//!
//! The flat model stores, on every leaf, the ordered list of marks in effect
//! for it. Rebuilding the nested model means deciding which adjacent leaves
//! should share a wrapper. Mark identity alone is not enough: two emphasized
//! runs separated by plain text must become two `emphasis` wrappers, never
//! one. Adjacency is what defines grouping.
//!
//! # The Algorithm
//!
//! 1. **Partition:** split a container's children into maximal adjacent runs
//!    where neighbors either both carry no marks or agree on their leading
//!    mark (by full mark equality, attributes included).
//! 2. **Peel:** for a run with a shared leading mark, strip that one mark
//!    from every member and recurse on the remainder, building the run's
//!    converted children one layer at a time.
//! 3. **Wrap:** hand the shared mark and the converted children to the
//!    registered mark handler, which produces the wrapper node. A mark with
//!    no handler drops silently and its children surface unwrapped; nodes,
//!    by contrast, fail hard on a missing handler. That asymmetry is
//!    intentional.
//!
//! Each recursion level peels exactly one mark layer, so marks shared by
//! adjacent leaves collapse into a single wrapper instead of one per leaf,
//! and the recursion depth is bounded by the longest mark list.

use crate::error::ConvertError;
use crate::model::{FlatNode, Mark, Node, Schema};
use crate::registry::{NestHandlers, NestMarkHandler, NestNodeHandler};

/// Everything a flat → nested conversion call needs besides the tree.
pub struct NestOptions<'a> {
    pub schema: &'a Schema,
    pub handlers: &'a NestHandlers,
}

/// Convert a flat-mark tree into a nested-mark tree.
///
/// The input is read-only; the returned tree is freshly allocated. Fails if
/// a node's tag has neither a registered handler nor a built-in default, or
/// if the conversion does not produce exactly one root.
pub fn nest(tree: &FlatNode, options: NestOptions<'_>) -> Result<Node, ConvertError> {
    let mut state = NestState::new(options);
    let mut result = state.one(tree, None)?;
    if result.len() != 1 {
        return Err(ConvertError::StructuralAssertion(format!(
            "conversion produced {} top-level nodes, expected exactly one",
            result.len()
        )));
    }
    Ok(result.remove(0))
}

/// A flat node paired with the marks still waiting to be peeled off it.
#[derive(Clone, Copy)]
struct MarkedLeaf<'n> {
    node: &'n FlatNode,
    marks: &'n [Mark],
}

/// Per-call conversion state for the flat → nested direction, exposing the
/// `one`/`all` traversal primitives to handlers.
pub struct NestState<'a> {
    schema: &'a Schema,
    handlers: &'a NestHandlers,
}

impl<'a> NestState<'a> {
    fn new(options: NestOptions<'a>) -> Self {
        NestState {
            schema: options.schema,
            handlers: options.handlers,
        }
    }

    /// The source schema.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    fn node_handler(&self, tag: &str) -> Option<&'a NestNodeHandler> {
        self.handlers.node(tag)
    }

    fn mark_handler(&self, tag: &str) -> Option<&'a NestMarkHandler> {
        self.handlers.mark(tag)
    }

    /// Convert a single node, dispatching on its type tag.
    pub fn one(
        &mut self,
        node: &FlatNode,
        parent: Option<&FlatNode>,
    ) -> Result<Vec<Node>, ConvertError> {
        if let Some(handler) = self.node_handler(&node.tag) {
            return handler(node, parent, self);
        }
        if node.tag == self.schema.top_node() {
            let children = self.all(node)?;
            if children.is_empty() {
                return Err(ConvertError::StructuralAssertion(
                    "converting the top node produced no content".to_string(),
                ));
            }
            return Ok(vec![Node::container("root", children)]);
        }
        if node.tag == self.schema.text_node() {
            return Ok(vec![Node::text("text", node.value().unwrap_or_default())]);
        }
        Err(ConvertError::UnknownNode(node.tag.clone()))
    }

    /// Convert all children of a node, grouping adjacent leaves that share
    /// marks back into wrapper nodes.
    pub fn all(&mut self, parent: &FlatNode) -> Result<Vec<Node>, ConvertError> {
        let children: Vec<MarkedLeaf<'_>> = parent
            .children()
            .iter()
            .map(|child| MarkedLeaf {
                node: child,
                marks: &child.marks,
            })
            .collect();
        self.hydrate(children, parent)
    }

    fn hydrate(
        &mut self,
        children: Vec<MarkedLeaf<'_>>,
        parent: &FlatNode,
    ) -> Result<Vec<Node>, ConvertError> {
        let mut runs: Vec<Vec<MarkedLeaf<'_>>> = Vec::new();
        for child in children {
            if let Some(run) = runs.last_mut() {
                let previous = run.last().expect("runs are never empty");
                if same_run(previous, &child) {
                    run.push(child);
                    continue;
                }
            }
            runs.push(vec![child]);
        }

        let mut nodes = Vec::new();
        for run in runs {
            nodes.extend(self.convert_run(run, parent)?);
        }
        Ok(nodes)
    }

    fn convert_run(
        &mut self,
        run: Vec<MarkedLeaf<'_>>,
        parent: &FlatNode,
    ) -> Result<Vec<Node>, ConvertError> {
        let leading = run.first().and_then(|leaf| leaf.marks.first()).cloned();
        let Some(mark) = leading else {
            // No shared wrapper: every member converts on its own.
            let mut nodes = Vec::new();
            for leaf in run {
                nodes.extend(self.one(leaf.node, Some(parent))?);
            }
            return Ok(nodes);
        };

        let stripped = run
            .iter()
            .map(|leaf| MarkedLeaf {
                node: leaf.node,
                marks: &leaf.marks[1..],
            })
            .collect();
        let children = self.hydrate(stripped, parent)?;

        match self.mark_handler(&mark.tag) {
            Some(handler) => handler(&mark, parent, children, self),
            None => Ok(children),
        }
    }
}

/// Neighbors share a run iff both are unmarked or their outermost marks are
/// equal.
fn same_run(previous: &MarkedLeaf<'_>, next: &MarkedLeaf<'_>) -> bool {
    match (previous.marks.first(), next.marks.first()) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
