//! Core data structures for the two tree models.

pub mod marks;
pub mod nodes;
pub mod schema;

pub use marks::Mark;
pub use nodes::{Attrs, FlatBody, FlatNode, Node, NodeBody};
pub use schema::Schema;
