//! Bidirectional conversion between two rich-text document models
//!
//!     This crate bridges the two tree shapes rich-text tooling actually uses.
//!     Markdown-style parsers produce a nested-mark tree, where inline formatting
//!     is a wrapper node containing the text it formats. Structured editors
//!     consume a flat-mark tree, where there are no wrappers and every leaf
//!     carries an ordered list of the marks applied to it. Neither side is a
//!     superset of the other, so both conversions are implemented as first-class
//!     engines over a shared, catalogue-agnostic node model.
//!
//!     TLDR for integrators:
//!         - The crate never defines which node or mark types exist. You bring a
//!           handler set (tag -> conversion function) per direction; everything
//!           unregistered falls back to a small set of built-in defaults or fails
//!           loudly.
//!         - The helpers in ./registry.rs cover the overwhelmingly common handler
//!           shape (recurse into children, wrap the result) in one line each.
//!         - Markdown lexing stays upstream. ./markdown.rs adapts the comrak AST
//!           into the nested model for callers that want an end-to-end pipeline.
//!
//! Architecture
//!
//!     The goal is to keep everything that does not depend on a concrete type
//!     catalogue in one strong, well tested core. The two engines live in
//!     ./common (flatten.rs and nest.rs) over the models in ./model, and the
//!     dispatch layer in ./registry.rs is what callers extend. Reference
//!     resolution (./common/definitions.rs, ./common/links.rs) and the embedded
//!     raw-markup bridge (./html.rs) plug into the flatten engine as built-in
//!     defaults.
//!
//!     This is a pure lib: no I/O, no printing, no environment access. One
//!     conversion call is one synchronous recursive descent over a read-only
//!     input; all call-scoped state lives in a per-call state value, so
//!     concurrent conversions from multiple threads need no synchronization.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── registry.rs             # Handler sets and handler constructors
//!     ├── model
//!     │   ├── nodes.rs            # Nested and flat node types
//!     │   ├── marks.rs            # Mark identity and equality
//!     │   └── schema.rs           # Flat-model facts: root, text, mark order
//!     ├── common
//!     │   ├── flatten.rs          # Nested -> flat engine
//!     │   ├── nest.rs             # Flat -> nested engine
//!     │   ├── definitions.rs      # Link/footnote definition tables
//!     │   └── links.rs            # Reference resolution and reversion
//!     ├── html.rs                 # Embedded raw-markup bridge
//!     ├── markdown.rs             # Comrak front end (upstream producer)
//!     └── lib.rs
//!
//! Core Algorithms
//!
//!     Flattening dissolves wrapper nodes into marks: wrapper handlers convert
//!     their children and merge the wrapper's mark into each result, with the
//!     schema's canonical order deciding where simultaneous marks land. Nesting
//!     is the inverse and the subtle one: a container's children are partitioned
//!     into maximal adjacent runs that agree on their outermost mark, that mark
//!     is peeled off, and the run recurses before a mark handler wraps it.
//!     Adjacency, not mark identity, decides what shares a wrapper; see the
//!     module docs of ./common/nest.rs for why.
//!
//! Library Choices
//!
//!     This crate offloads everything that is not the conversion itself to the
//!     established crates for the job: comrak for Markdown parsing, html5ever
//!     with markup5ever_rcdom for the embedded raw-markup bridge, serde_json
//!     for the attribute values and wire formats. The conversion core has no
//!     opinion about where trees come from or go to.

pub mod common;
pub mod error;
pub mod html;
pub mod markdown;
pub mod model;
pub mod registry;

pub use common::definitions::Definition;
pub use common::flatten::{flatten, FlattenOptions, FlattenState};
pub use common::nest::{nest, NestOptions, NestState};
pub use error::ConvertError;
pub use html::{RawElement, RawHandlers, RawNode};
pub use model::{Attrs, FlatBody, FlatNode, Mark, Node, NodeBody, Schema};
pub use registry::{
    to_flat_mark, to_flat_mark_with, to_flat_node, to_flat_node_with, to_nested_mark,
    to_nested_mark_with, to_nested_node, to_nested_node_with, FlattenHandlers, NestHandlers,
};
