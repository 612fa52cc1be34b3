//! The box tree and the operations on it.
//!
//! # Scope
//!
//! This crate implements:
//! - **Box model** ([`BoxNode`]): immutable block and inline boxes, named or
//!   anonymous, checked against the structural invariants on construction
//! - **Box generation** ([CSS 2.1 § 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen)):
//!   block and inline boxes from an element tree and its cascade, with
//!   anonymous block and inline boxes and white-space collapsing
//! - **Cursor** ([`BoxCursor`]): navigation, filtered search and
//!   copy-on-write edits (rename, mark, delete, unwrap, wrap)
//! - **Output**: XHTML rendering with optional inline styles, and XML/JSON
//!   debug serialization
//!
//! # Not Implemented
//!
//! - Layout: no geometry, line breaking or painting
//! - `display: run-in`, flex and grid containers are generated as plain
//!   block boxes

/// Box nodes and their derivations.
pub mod box_node;
/// Persistent cursor.
pub mod cursor;
mod error;
/// Box generation per [CSS 2.1 § 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen).
pub mod generate;
mod markup;
/// XHTML output.
pub mod render;
/// Debug output.
pub mod serialize;

pub use box_node::{BoxKind, BoxNode, Rendering, is_replaced_element};
pub use cursor::BoxCursor;
pub use error::{CursorError, StructureError};
pub use generate::build_box_tree;
pub use render::{RenderOptions, render};
pub use serialize::{serialize_json, serialize_xml};
