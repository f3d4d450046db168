//! Description of a flat-model schema.

use crate::model::marks::Mark;
use crate::model::nodes::FlatNode;
use std::collections::HashMap;

/// The handful of facts the conversion engines need to know about the flat
/// model they target: which tag is the document root, which tag is the text
/// leaf, and the canonical order in which simultaneous marks are stored.
///
/// The full node/mark catalogue stays with the caller's handler sets; the
/// schema never validates content.
#[derive(Debug, Clone)]
pub struct Schema {
    top_node: String,
    text_node: String,
    mark_rank: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from the root tag, the text tag and the canonical mark
    /// order (outermost-first). Mark tags not listed here sort after all
    /// listed ones, in insertion order.
    pub fn new<I, S>(top_node: impl Into<String>, text_node: impl Into<String>, marks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mark_rank = marks
            .into_iter()
            .enumerate()
            .map(|(rank, tag)| (tag.into(), rank))
            .collect();
        Schema {
            top_node: top_node.into(),
            text_node: text_node.into(),
            mark_rank,
        }
    }

    /// Tag of the document root node.
    pub fn top_node(&self) -> &str {
        &self.top_node
    }

    /// Tag of the text leaf node.
    pub fn text_node(&self) -> &str {
        &self.text_node
    }

    /// Canonical position of a mark tag; unranked tags sort last.
    pub fn mark_rank(&self, tag: &str) -> usize {
        self.mark_rank.get(tag).copied().unwrap_or(usize::MAX)
    }

    /// Create a text leaf in this schema.
    pub fn text(&self, value: impl Into<String>) -> FlatNode {
        FlatNode::text(self.text_node.clone(), value)
    }

    /// Merge a mark into an existing mark set.
    ///
    /// An equal mark is never duplicated. Otherwise the mark is inserted
    /// after every mark of equal or lower rank, so repeated merges always
    /// settle into the same canonical order regardless of how the source
    /// happened to nest its wrappers.
    pub fn add_mark(&self, set: &[Mark], mark: &Mark) -> Vec<Mark> {
        if set.contains(mark) {
            return set.to_vec();
        }
        let rank = self.mark_rank(&mark.tag);
        let index = set
            .iter()
            .position(|existing| self.mark_rank(&existing.tag) > rank)
            .unwrap_or(set.len());
        let mut merged = set.to_vec();
        merged.insert(index, mark.clone());
        merged
    }
}
