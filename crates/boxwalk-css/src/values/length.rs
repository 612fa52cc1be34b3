//! CSS length values and parsing
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! Lengths are kept in the unit they were written in. Nothing downstream
//! lays anything out, so there is no conversion to pixels.

use std::fmt;

use cssparser::{Parser, Token};

use super::CssParseError;

/// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// "1px = 1/96th of 1in"
    Px,
    /// "Equal to the computed value of the font-size property of the element"
    Em,
    /// "Equal to the used x-height of the first available font"
    Ex,
    /// "Equal to the computed value of font-size on the root element"
    Rem,
    /// "1pt = 1/72th of 1in"
    Pt,
    /// "1pc = 1/6th of 1in"
    Pc,
    /// "1in = 2.54cm = 96px"
    In,
    /// "1cm = 96px/2.54"
    Cm,
    /// "1mm = 1/10th of 1cm"
    Mm,
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    Percent,
}

impl LengthUnit {
    fn from_unit(unit: &str) -> Option<Self> {
        Some(match unit.to_ascii_lowercase().as_str() {
            "px" => Self::Px,
            "em" => Self::Em,
            "ex" => Self::Ex,
            "rem" => Self::Rem,
            "pt" => Self::Pt,
            "pc" => Self::Pc,
            "in" => Self::In,
            "cm" => Self::Cm,
            "mm" => Self::Mm,
            _ => return None,
        })
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Ex => "ex",
            Self::Rem => "rem",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Percent => "%",
        }
    }
}

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
/// A number with a unit (or a percentage).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthValue {
    /// The number as written.
    pub value: f32,
    /// The unit it was written with.
    pub unit: LengthUnit,
}

impl LengthValue {
    /// `0px`
    pub const ZERO: Self = Self::new(0.0, LengthUnit::Px);

    /// A length of `value` in `unit`.
    #[must_use]
    pub const fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Whether this is zero, in whatever unit. `0`, `0px` and `0em` all are.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl fmt::Display for LengthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Parse a `<length-percentage>`. A unitless `0` is accepted as `0px`.
pub(crate) fn parse_length<'i>(input: &mut Parser<'i, '_>) -> Result<LengthValue, CssParseError<'i>> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    let length = match &token {
        Token::Dimension { value, unit, .. } => LengthUnit::from_unit(unit).map(|u| LengthValue::new(*value, u)),
        Token::Percentage { unit_value, .. } => Some(LengthValue::new(unit_value * 100.0, LengthUnit::Percent)),
        Token::Number { value, .. } if *value == 0.0 => Some(LengthValue::ZERO),
        _ => None,
    };
    length.ok_or_else(|| location.new_unexpected_token_error(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_in_any_unit() {
        assert!(LengthValue::new(0.0, LengthUnit::Em).is_zero());
        assert!(LengthValue::ZERO.is_zero());
        assert!(!LengthValue::new(0.5, LengthUnit::Px).is_zero());
    }

    #[test]
    fn test_display_keeps_unit() {
        assert_eq!(LengthValue::new(1.5, LengthUnit::Em).to_string(), "1.5em");
        assert_eq!(LengthValue::new(40.0, LengthUnit::Px).to_string(), "40px");
        assert_eq!(LengthValue::new(50.0, LengthUnit::Percent).to_string(), "50%");
    }
}
