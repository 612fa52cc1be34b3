//! Style input for box generation.
//!
//! # Scope
//!
//! This crate implements:
//! - **Property catalog** ([`Property`]): the fixed set of properties the
//!   cascade keeps, each with its grammar, initial value and inheritance flag
//! - **Values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/)):
//!   typed keywords, colors and lengths, parsed with `cssparser`
//! - **Stylesheets**: declaration lists (with `margin`/`padding` shorthands
//!   and `!important`), style rules, and a built-in UA stylesheet
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/)):
//!   type, universal, class, ID and attribute selectors with descendant and
//!   child combinators
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/)):
//!   one [`CascadedStyle`] per element, `inherit`/`initial` kept as markers
//! - **Used values** ([`UsedStyle`]): inheritance, initial values, the used
//!   `display`/`background-color`/`visibility`, and `relativize`
//!
//! # Not Implemented
//!
//! - Pseudo-classes, pseudo-elements, sibling combinators
//! - At-rules (`@media`, `@import`, `@font-face`) are skipped
//! - Computed values: lengths stay in the unit they were written in

/// CSS cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Declaration lists.
pub mod declaration;
/// `display` and `visibility` keywords.
pub mod display;
mod error;
/// The supported-property catalog.
pub mod property;
/// Selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Stylesheet parsing.
pub mod stylesheet;
/// User-agent stylesheet.
pub mod ua_stylesheet;
/// Used-value resolution.
pub mod used;
/// Typed values per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod values;

pub use cascade::{CascadedStyle, LoadOptions, StyleMap, author_stylesheets, cascade, cascade_document};
pub use declaration::{Declaration, parse_declarations};
pub use display::{Display, UsedVisibility, Visibility};
pub use error::StyleError;
pub use property::Property;
pub use selector::{Selector, Specificity, parse_selector, parse_selector_list};
pub use stylesheet::{StyleRule, Stylesheet, parse_stylesheet};
pub use used::UsedStyle;
pub use values::{CascadedValue, ColorValue, LengthUnit, LengthValue, Value};
