//! Common utilities for the boxwalk crates.
//!
//! - **Warning System** - deduplicated, colored diagnostics for input the
//!   pipeline accepts but does not fully support

pub mod warning;
