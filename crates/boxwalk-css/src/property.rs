//! The supported-property catalog.
//!
//! Every property the cascade keeps and the resolver can answer for. Each
//! one knows its grammar, its initial value and whether it is inherited
//! ([CSS Cascading Level 4 § 7](https://www.w3.org/TR/css-cascade-4/#defaulting)).

use std::str::FromStr;

use cssparser::{Parser, ParserInput, Token};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::display::{Display, Visibility};
use crate::error::StyleError;
use crate::values::{
    CascadedValue, ColorValue, CssParseError, LengthValue, Value, parse_color, parse_length,
};

/// A supported CSS property.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    IntoStaticStr,
    EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Property {
    /// [CSS Display § 2](https://www.w3.org/TR/css-display-3/#the-display-properties)
    /// "Initial: inline. Inherited: no"
    Display,
    /// [CSS Backgrounds § 3.2](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    /// "Initial: transparent. Inherited: no"
    BackgroundColor,
    /// [CSS 2.1 § 11.2](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    /// "Initial: visible. Inherited: yes"
    Visibility,
    /// [CSS Color § 3.1](https://www.w3.org/TR/css-color-4/#the-color-property)
    /// "Inherited: yes"
    Color,
    /// "Initial: normal. Inherited: yes"
    FontWeight,
    /// "Initial: normal. Inherited: yes"
    FontStyle,
    /// "Initial: medium. Inherited: yes"
    FontSize,
    /// "Initial: start. Inherited: yes"
    TextAlign,
    /// "Initial: 0. Inherited: yes"
    TextIndent,
    /// "Initial: none. Inherited: no"
    TextDecoration,
    /// [CSS Box § 5](https://www.w3.org/TR/css-box-4/#margins)
    MarginTop,
    /// See [`Property::MarginTop`].
    MarginRight,
    /// See [`Property::MarginTop`].
    MarginBottom,
    /// See [`Property::MarginTop`].
    MarginLeft,
    /// [CSS Box § 6](https://www.w3.org/TR/css-box-4/#paddings)
    PaddingTop,
    /// See [`Property::PaddingTop`].
    PaddingRight,
    /// See [`Property::PaddingTop`].
    PaddingBottom,
    /// See [`Property::PaddingTop`].
    PaddingLeft,
    /// "Initial: disc. Inherited: yes"
    ListStyleType,
    /// "Initial: baseline. Inherited: no"
    VerticalAlign,
    /// "Initial: normal. Inherited: yes"
    WhiteSpace,
}

/// What a property's value may look like.
#[derive(Debug, Clone, Copy)]
enum Grammar {
    Display,
    Visibility,
    Color,
    /// `<color> | transparent`
    BackgroundColor,
    Keywords(&'static [&'static str]),
    Length,
    LengthOrKeywords(&'static [&'static str]),
    NumberOrKeywords(&'static [&'static str]),
}

const FONT_WEIGHTS: &[&str] = &["normal", "bold", "bolder", "lighter"];
const FONT_STYLES: &[&str] = &["normal", "italic", "oblique"];
const FONT_SIZES: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
];
const TEXT_ALIGNS: &[&str] = &["left", "right", "center", "justify", "start", "end"];
const TEXT_DECORATIONS: &[&str] = &["none", "underline", "overline", "line-through", "blink"];
const MARGIN_KEYWORDS: &[&str] = &["auto"];
const LIST_STYLE_TYPES: &[&str] = &[
    "disc",
    "circle",
    "square",
    "decimal",
    "decimal-leading-zero",
    "lower-roman",
    "upper-roman",
    "lower-alpha",
    "upper-alpha",
    "lower-latin",
    "upper-latin",
    "lower-greek",
    "none",
];
const VERTICAL_ALIGNS: &[&str] = &[
    "baseline",
    "sub",
    "super",
    "top",
    "text-top",
    "middle",
    "bottom",
    "text-bottom",
];
const WHITE_SPACES: &[&str] = &["normal", "pre", "nowrap", "pre-wrap", "pre-line"];

impl Property {
    /// The property's name as written in CSS.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Look a property up by its CSS name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name.trim()).ok()
    }

    /// [CSS Cascading § 7.1](https://www.w3.org/TR/css-cascade-4/#inherited-property)
    /// "Some properties are inherited from an ancestor element to its descendants."
    #[must_use]
    pub const fn is_inherited(self) -> bool {
        matches!(
            self,
            Self::Visibility
                | Self::Color
                | Self::FontWeight
                | Self::FontStyle
                | Self::FontSize
                | Self::TextAlign
                | Self::TextIndent
                | Self::ListStyleType
                | Self::WhiteSpace
        )
    }

    /// [CSS Cascading § 7.1](https://www.w3.org/TR/css-cascade-4/#initial-values)
    /// "Each property has an initial value, defined in the property's
    /// definition table."
    #[must_use]
    pub const fn initial_value(self) -> Value {
        match self {
            Self::Display => Value::Display(Display::Inline),
            Self::BackgroundColor => Value::Transparent,
            Self::Visibility => Value::Visibility(Visibility::Visible),
            Self::Color => Value::Color(ColorValue::BLACK),
            Self::FontWeight | Self::FontStyle | Self::WhiteSpace => Value::Keyword("normal"),
            Self::FontSize => Value::Keyword("medium"),
            // "start" resolves to "left" in a left-to-right document.
            Self::TextAlign => Value::Keyword("left"),
            Self::TextIndent
            | Self::MarginTop
            | Self::MarginRight
            | Self::MarginBottom
            | Self::MarginLeft
            | Self::PaddingTop
            | Self::PaddingRight
            | Self::PaddingBottom
            | Self::PaddingLeft => Value::Length(LengthValue::ZERO),
            Self::TextDecoration => Value::Keyword("none"),
            Self::ListStyleType => Value::Keyword("disc"),
            Self::VerticalAlign => Value::Keyword("baseline"),
        }
    }

    const fn grammar(self) -> Grammar {
        match self {
            Self::Display => Grammar::Display,
            Self::BackgroundColor => Grammar::BackgroundColor,
            Self::Visibility => Grammar::Visibility,
            Self::Color => Grammar::Color,
            Self::FontWeight => Grammar::NumberOrKeywords(FONT_WEIGHTS),
            Self::FontStyle => Grammar::Keywords(FONT_STYLES),
            Self::FontSize => Grammar::LengthOrKeywords(FONT_SIZES),
            Self::TextAlign => Grammar::Keywords(TEXT_ALIGNS),
            Self::TextIndent
            | Self::PaddingTop
            | Self::PaddingRight
            | Self::PaddingBottom
            | Self::PaddingLeft => Grammar::Length,
            Self::TextDecoration => Grammar::Keywords(TEXT_DECORATIONS),
            Self::MarginTop | Self::MarginRight | Self::MarginBottom | Self::MarginLeft => {
                Grammar::LengthOrKeywords(MARGIN_KEYWORDS)
            }
            Self::ListStyleType => Grammar::Keywords(LIST_STYLE_TYPES),
            Self::VerticalAlign => Grammar::LengthOrKeywords(VERTICAL_ALIGNS),
            Self::WhiteSpace => Grammar::Keywords(WHITE_SPACES),
        }
    }

    /// Parse the text of a declaration value for this property.
    ///
    /// `inherit` and `initial` are kept as markers; anything else must fit
    /// the property's grammar and be the whole of `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidValue`] when `text` does not fit.
    pub fn parse_value(self, text: &str) -> Result<CascadedValue, StyleError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("inherit") {
            return Ok(CascadedValue::Inherit);
        }
        if trimmed.eq_ignore_ascii_case("initial") {
            return Ok(CascadedValue::Initial);
        }
        let mut input = ParserInput::new(trimmed);
        let mut parser = Parser::new(&mut input);
        parser
            .parse_entirely(|input| self.parse_typed(input))
            .map(CascadedValue::Specified)
            .map_err(|_| StyleError::InvalidValue {
                property: self,
                value: trimmed.to_owned(),
            })
    }

    fn parse_typed<'i>(self, input: &mut Parser<'i, '_>) -> Result<Value, CssParseError<'i>> {
        match self.grammar() {
            Grammar::Display => {
                let location = input.current_source_location();
                let ident = input.expect_ident()?.clone();
                Display::from_str(&ident)
                    .map(Value::Display)
                    .map_err(|_| location.new_unexpected_token_error(Token::Ident(ident)))
            }
            Grammar::Visibility => {
                let location = input.current_source_location();
                let ident = input.expect_ident()?.clone();
                Visibility::from_str(&ident)
                    .map(Value::Visibility)
                    .map_err(|_| location.new_unexpected_token_error(Token::Ident(ident)))
            }
            Grammar::Color => parse_color(input).map(Value::Color),
            Grammar::BackgroundColor => {
                if input
                    .try_parse(|i| i.expect_ident_matching("transparent"))
                    .is_ok()
                {
                    return Ok(Value::Transparent);
                }
                parse_color(input).map(Value::Color)
            }
            Grammar::Keywords(keywords) => parse_keyword(input, keywords),
            Grammar::Length => parse_length(input).map(Value::Length),
            Grammar::LengthOrKeywords(keywords) => {
                if let Ok(keyword) = input.try_parse(|i| parse_keyword(i, keywords)) {
                    return Ok(keyword);
                }
                parse_length(input).map(Value::Length)
            }
            Grammar::NumberOrKeywords(keywords) => {
                if let Ok(keyword) = input.try_parse(|i| parse_keyword(i, keywords)) {
                    return Ok(keyword);
                }
                Ok(Value::Number(input.expect_number()?))
            }
        }
    }

    /// Whether `value` fits this property's grammar.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self.grammar(), value) {
            (Grammar::Display, Value::Display(_))
            | (Grammar::Visibility, Value::Visibility(_))
            | (Grammar::Color | Grammar::BackgroundColor, Value::Color(_))
            | (Grammar::BackgroundColor, Value::Transparent)
            | (Grammar::Length | Grammar::LengthOrKeywords(_), Value::Length(_))
            | (Grammar::NumberOrKeywords(_), Value::Number(_)) => true,
            (
                Grammar::Keywords(keywords) | Grammar::LengthOrKeywords(keywords) | Grammar::NumberOrKeywords(keywords),
                Value::Keyword(keyword),
            ) => keywords.contains(keyword),
            _ => false,
        }
    }
}

fn parse_keyword<'i>(input: &mut Parser<'i, '_>, keywords: &'static [&'static str]) -> Result<Value, CssParseError<'i>> {
    let location = input.current_source_location();
    let ident = input.expect_ident()?.clone();
    keywords
        .iter()
        .find(|keyword| ident.eq_ignore_ascii_case(keyword))
        .map(|keyword| Value::Keyword(*keyword))
        .ok_or_else(|| location.new_unexpected_token_error(Token::Ident(ident)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::LengthUnit;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names_are_kebab_case() {
        assert_eq!(Property::BackgroundColor.name(), "background-color");
        assert_eq!(Property::from_name("list-style-type"), Some(Property::ListStyleType));
        assert_eq!(Property::from_name("float"), None);
    }

    #[test]
    fn test_initial_values_fit_their_grammar() {
        for property in Property::iter() {
            assert!(property.accepts(&property.initial_value()), "{property}");
        }
    }

    #[test]
    fn test_parse_markers_and_values() {
        assert_eq!(Property::Color.parse_value(" inherit "), Ok(CascadedValue::Inherit));
        assert_eq!(Property::Display.parse_value("INITIAL"), Ok(CascadedValue::Initial));
        assert_eq!(
            Property::Display.parse_value("table-cell"),
            Ok(CascadedValue::Specified(Value::Display(Display::TableCell)))
        );
        assert_eq!(
            Property::BackgroundColor.parse_value("transparent"),
            Ok(CascadedValue::Specified(Value::Transparent))
        );
        assert_eq!(
            Property::MarginLeft.parse_value("1.5em"),
            Ok(CascadedValue::Specified(Value::Length(LengthValue::new(1.5, LengthUnit::Em))))
        );
        assert_eq!(
            Property::FontWeight.parse_value("700"),
            Ok(CascadedValue::Specified(Value::Number(700.0)))
        );
    }

    #[test]
    fn test_rejects_values_outside_grammar() {
        assert!(Property::Display.parse_value("sideways").is_err());
        assert!(Property::Color.parse_value("transparent").is_err());
        assert!(Property::PaddingTop.parse_value("auto").is_err());
        assert!(Property::TextAlign.parse_value("left right").is_err());
    }
}
