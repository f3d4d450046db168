//! Error types for tree conversions

use std::fmt;

/// Errors that can occur while converting between the two tree models.
///
/// All variants are fatal: a conversion either completes or surfaces one of
/// these to the caller. There is no partial-result mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// A node's type tag has no registered handler and no built-in default
    UnknownNode(String),
    /// A tree position expected a node but held something else
    InvalidNode(String),
    /// The converted tree does not satisfy the destination model's shape
    StructuralAssertion(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::UnknownNode(tag) => write!(f, "unknown node type '{tag}'"),
            ConvertError::InvalidNode(found) => write!(f, "expected a node, found {found}"),
            ConvertError::StructuralAssertion(msg) => {
                write!(f, "structural assertion failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ConvertError {}
