//! Conversion handler registries.
//!
//! Each direction dispatches on the source node's type tag. Callers register
//! a handler per tag they care about; anything unregistered falls back to the
//! engine's built-in defaults (root, text, ignorable types) or fails with
//! [`ConvertError::UnknownNode`]. Lookup is a flat map probe, so dispatch
//! cost is constant per node and recursion depth equals tree depth.
//!
//! The `to_flat_*` / `to_nested_*` constructors below cover the common
//! handler shape (recurse into children, wrap the result) and are the main
//! public surface next to [`crate::flatten`] and [`crate::nest`].

use crate::common::flatten::FlattenState;
use crate::common::nest::NestState;
use crate::error::ConvertError;
use crate::model::{Attrs, FlatNode, Mark, Node};
use std::collections::HashMap;

/// Node handler for the nested → flat direction.
///
/// Receives the source node, its parent (if any) and the conversion state,
/// and produces zero, one or many flat nodes. Handlers are `Send + Sync` so
/// one handler set can serve concurrent conversions; per-call state is never
/// shared.
pub type FlattenNodeHandler = Box<
    dyn Fn(&Node, Option<&Node>, &mut FlattenState<'_>) -> Result<Vec<FlatNode>, ConvertError>
        + Send
        + Sync,
>;

/// Node handler for the flat → nested direction.
pub type NestNodeHandler = Box<
    dyn Fn(&FlatNode, Option<&FlatNode>, &mut NestState<'_>) -> Result<Vec<Node>, ConvertError>
        + Send
        + Sync,
>;

/// Mark handler for the flat → nested direction.
///
/// Invoked with the shared mark of an adjacent run and the already converted
/// children that carried it; returns the wrapper (or wrappers) to emit.
pub type NestMarkHandler = Box<
    dyn Fn(&Mark, &FlatNode, Vec<Node>, &mut NestState<'_>) -> Result<Vec<Node>, ConvertError>
        + Send
        + Sync,
>;

/// Handler set for the nested → flat direction.
#[derive(Default)]
pub struct FlattenHandlers {
    nodes: HashMap<String, FlattenNodeHandler>,
}

impl FlattenHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a node type tag (builder style).
    /// Registering the same tag twice replaces the earlier handler.
    pub fn on<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Node, Option<&Node>, &mut FlattenState<'_>) -> Result<Vec<FlatNode>, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        self.nodes.insert(tag.into(), Box::new(handler));
        self
    }

    pub fn get(&self, tag: &str) -> Option<&FlattenNodeHandler> {
        self.nodes.get(tag)
    }
}

/// Handler set for the flat → nested direction: node handlers plus mark
/// handlers.
#[derive(Default)]
pub struct NestHandlers {
    nodes: HashMap<String, NestNodeHandler>,
    marks: HashMap<String, NestMarkHandler>,
}

impl NestHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node handler (builder style).
    pub fn on_node<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&FlatNode, Option<&FlatNode>, &mut NestState<'_>) -> Result<Vec<Node>, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        self.nodes.insert(tag.into(), Box::new(handler));
        self
    }

    /// Register a mark handler (builder style).
    pub fn on_mark<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Mark, &FlatNode, Vec<Node>, &mut NestState<'_>) -> Result<Vec<Node>, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        self.marks.insert(tag.into(), Box::new(handler));
        self
    }

    pub fn node(&self, tag: &str) -> Option<&NestNodeHandler> {
        self.nodes.get(tag)
    }

    pub fn mark(&self, tag: &str) -> Option<&NestMarkHandler> {
        self.marks.get(tag)
    }
}

/// Standard container handler for the nested → flat direction: convert the
/// children, wrap them in a flat node with the given tag.
pub fn to_flat_node(tag: impl Into<String>) -> FlattenNodeHandler {
    to_flat_node_with(tag, |_| Attrs::new())
}

/// Like [`to_flat_node`], with an attribute-deriving function.
pub fn to_flat_node_with<F>(tag: impl Into<String>, attrs: F) -> FlattenNodeHandler
where
    F: Fn(&Node) -> Attrs + Send + Sync + 'static,
{
    let tag = tag.into();
    Box::new(move |node, _parent, state| {
        let children = state.all(node)?;
        Ok(vec![
            FlatNode::container(tag.clone(), children).with_attrs(attrs(node))
        ])
    })
}

/// Standard wrapper handler for the nested → flat direction: convert the
/// children, then merge the wrapper's mark into each of them in canonical
/// order. The wrapper node itself disappears.
pub fn to_flat_mark(tag: impl Into<String>) -> FlattenNodeHandler {
    to_flat_mark_with(tag, |_| Attrs::new())
}

/// Like [`to_flat_mark`], with an attribute-deriving function for the mark.
pub fn to_flat_mark_with<F>(tag: impl Into<String>, attrs: F) -> FlattenNodeHandler
where
    F: Fn(&Node) -> Attrs + Send + Sync + 'static,
{
    let tag = tag.into();
    Box::new(move |node, _parent, state| {
        let children = state.all(node)?;
        let mark = Mark {
            tag: tag.clone(),
            attrs: attrs(node),
        };
        Ok(children
            .into_iter()
            .map(|mut child| {
                child.marks = state.schema().add_mark(&child.marks, &mark);
                child
            })
            .collect())
    })
}

/// Standard container handler for the flat → nested direction.
pub fn to_nested_node(tag: impl Into<String>) -> NestNodeHandler {
    to_nested_node_with(tag, |_| Attrs::new())
}

/// Like [`to_nested_node`], with an attribute-deriving function.
pub fn to_nested_node_with<F>(tag: impl Into<String>, attrs: F) -> NestNodeHandler
where
    F: Fn(&FlatNode) -> Attrs + Send + Sync + 'static,
{
    let tag = tag.into();
    Box::new(move |node, _parent, state| {
        let children = state.all(node)?;
        Ok(vec![
            Node::container(tag.clone(), children).with_attrs(attrs(node))
        ])
    })
}

/// Standard mark handler for the flat → nested direction: wrap the converted
/// run in a container with the given tag.
pub fn to_nested_mark(tag: impl Into<String>) -> NestMarkHandler {
    to_nested_mark_with(tag, |_| Attrs::new())
}

/// Like [`to_nested_mark`], with an attribute-deriving function.
pub fn to_nested_mark_with<F>(tag: impl Into<String>, attrs: F) -> NestMarkHandler
where
    F: Fn(&Mark) -> Attrs + Send + Sync + 'static,
{
    let tag = tag.into();
    Box::new(move |mark, _parent, children, _state| {
        Ok(vec![
            Node::container(tag.clone(), children).with_attrs(attrs(mark))
        ])
    })
}
