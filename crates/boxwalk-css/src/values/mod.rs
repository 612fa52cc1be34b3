//! Typed specified values.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! A declaration's value is parsed against its property's grammar before it
//! reaches the cascade, so everything downstream matches on these types
//! instead of re-reading strings.

mod color;
mod length;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::display::{Display, Visibility};

pub use color::ColorValue;
pub use length::{LengthUnit, LengthValue};

pub(crate) use color::parse_color;
pub(crate) use length::parse_length;

/// Parse error with no custom payload; failures are reported as
/// [`StyleError`](crate::StyleError) by the caller.
pub(crate) type CssParseError<'i> = cssparser::ParseError<'i, ()>;

/// A concrete value of one of the supported properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A `display` keyword.
    Display(Display),
    /// A `visibility` keyword.
    Visibility(Visibility),
    /// A `<color>`.
    Color(ColorValue),
    /// `background-color: transparent`
    Transparent,
    /// A `<length-percentage>`.
    Length(LengthValue),
    /// A bare `<number>`, as in `font-weight: 700`.
    Number(f32),
    /// Any other keyword from the property's grammar.
    Keyword(&'static str),
}

impl Value {
    /// Whether this is a length equal to zero. Zero lengths compare equal
    /// whatever their unit.
    #[must_use]
    pub fn is_zero_length(&self) -> bool {
        matches!(self, Self::Length(length) if length.is_zero())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display(display) => write!(f, "{display}"),
            Self::Visibility(visibility) => write!(f, "{visibility}"),
            Self::Color(color) => write!(f, "{color}"),
            Self::Transparent => f.write_str("transparent"),
            Self::Length(length) => write!(f, "{length}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Keyword(keyword) => f.write_str(keyword),
        }
    }
}

/// Values serialize as their CSS text.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// [CSS Cascading Level 4 § 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
///
/// The output of the cascade for one property: either one of the
/// CSS-wide keywords or a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub enum CascadedValue {
    /// "the cascaded value of the property is the computed value of the
    /// property on the parent element"
    Inherit,
    /// "the cascaded value of the property is its initial value"
    Initial,
    /// A value written in a stylesheet or attribute.
    Specified(Value),
}

impl Serialize for CascadedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for CascadedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inherit => f.write_str("inherit"),
            Self::Initial => f.write_str("initial"),
            Self::Specified(value) => write!(f, "{value}"),
        }
    }
}
