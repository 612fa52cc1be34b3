//! Structural transformations over box trees, addressed by block.
//!
//! # Scope
//!
//! This crate implements:
//! - **Addressing** ([`Fragment`]): runs of leaf blocks, or of inline units
//!   inside one block, counted in document order
//! - **Primitives** ([`primitives`]): counting, moving by blocks, wrapping a
//!   run of blocks in one box, and the generic unwrap sweep
//! - **Transformations** ([`transformations`]): table flattening, headings,
//!   lists, poems, navigation lists, figures, page breaks, and removal of
//!   images and hidden boxes
//! - **Chaining** ([`Transformer`]): one step per fragment, each applied to
//!   a working copy and kept only when it succeeds
//!
//! # Not Implemented
//!
//! - Recognizing which fragments need which transformation: callers pick
//!   the fragments

mod error;
mod fragment;
pub mod primitives;
pub mod transformations;
mod transformer;

pub use error::TransformError;
pub use fragment::Fragment;
pub use transformer::Transformer;
