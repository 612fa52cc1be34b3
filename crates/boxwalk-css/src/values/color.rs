//! CSS color values and parsing
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use std::fmt;

use cssparser::{Parser, Token};

use super::CssParseError;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl ColorValue {
    /// Black (#000000), the initial value of `color`.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // [§ 4.2.1]
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 => Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?)),
            4 => Some(Self {
                r: digit(0)?,
                g: digit(1)?,
                b: digit(2)?,
                a: digit(3)?,
            }),
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: pair(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// The sixteen HTML 4 colors plus `orange`. `transparent` is not a named
    /// color here: `background-color` keeps it as its own keyword.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "black" => (0, 0, 0),
            "silver" => (192, 192, 192),
            "gray" | "grey" => (128, 128, 128),
            "white" => (255, 255, 255),
            "maroon" => (128, 0, 0),
            "red" => (255, 0, 0),
            "purple" => (128, 0, 128),
            "fuchsia" | "magenta" => (255, 0, 255),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "olive" => (128, 128, 0),
            "yellow" => (255, 255, 0),
            "navy" => (0, 0, 128),
            "blue" => (0, 0, 255),
            "teal" => (0, 128, 128),
            "aqua" | "cyan" => (0, 255, 255),
            "orange" => (255, 165, 0),
            _ => return None,
        };
        Some(Self::rgb(r, g, b))
    }
}

/// Serializes as `#rrggbb`, or `#rrggbbaa` when not opaque.
impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Parse a `<color>`: hash, named color, or `rgb()`/`rgba()`.
pub(crate) fn parse_color<'i>(input: &mut Parser<'i, '_>) -> Result<ColorValue, CssParseError<'i>> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    let color = match &token {
        Token::Hash(hex) | Token::IDHash(hex) => ColorValue::from_hex(hex),
        Token::Ident(name) => ColorValue::from_named(name),
        Token::Function(name) if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") => {
            return input.parse_nested_block(|args| parse_rgb_arguments(args));
        }
        _ => None,
    };
    color.ok_or_else(|| location.new_unexpected_token_error(token))
}

/// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "For legacy reasons, rgb() also supports an alternate syntax that
/// separates all of its arguments with commas."
fn parse_rgb_arguments<'i>(input: &mut Parser<'i, '_>) -> Result<ColorValue, CssParseError<'i>> {
    let mut channels: Vec<f32> = Vec::with_capacity(4);
    while !input.is_exhausted() {
        let location = input.current_source_location();
        let token = input.next()?.clone();
        match token {
            Token::Number { value, .. } if channels.len() < 3 => channels.push(value.clamp(0.0, 255.0)),
            Token::Number { value, .. } => channels.push(value.clamp(0.0, 1.0) * 255.0),
            Token::Percentage { unit_value, .. } => channels.push(unit_value.clamp(0.0, 1.0) * 255.0),
            Token::Comma | Token::Delim('/') => {}
            other => return Err(location.new_unexpected_token_error(other)),
        }
    }
    match channels[..] {
        [r, g, b] => Ok(ColorValue::rgb(channel(r), channel(g), channel(b))),
        [r, g, b, a] => Ok(ColorValue {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: channel(a),
        }),
        _ => Err(input.new_custom_error(())),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f32) -> u8 {
    value.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssparser::ParserInput;

    fn parse(text: &str) -> Option<ColorValue> {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        parse_color(&mut parser).ok()
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(ColorValue::from_hex("#f00"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(ColorValue::from_hex("00ff00"), Some(ColorValue::rgb(0, 255, 0)));
        assert_eq!(ColorValue::from_hex("#0000ff80").map(|c| c.a), Some(128));
        assert_eq!(ColorValue::from_hex("#12345"), None);
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(parse("rgb(255, 0, 0)"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(parse("rgb(0 0 255 / 0)").map(|c| c.a), Some(0));
        assert_eq!(parse("rgba(100%, 0%, 0%, 1)"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(parse("rgb(1, 2)"), None);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(ColorValue::rgb(0, 0, 255).to_string(), "#0000ff");
        assert_eq!(ColorValue::TRANSPARENT.to_string(), "#00000000");
    }
}
