//! Declaration blocks
//!
//! [CSS Syntax Level 3 § 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
//!
//! Used for the contents of style rules and for `style` attributes.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, Delimiter, ParseError, ParseErrorKind, Parser, ParserInput,
    ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token, parse_important,
};

use boxwalk_common::warning::warn_once;

use crate::error::StyleError;
use crate::property::Property;
use crate::values::CascadedValue;

/// One `property: value` pair that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// A longhand from the supported catalog.
    pub property: Property,
    /// The parsed value or CSS-wide keyword.
    pub value: CascadedValue,
    /// [CSS Cascading § 6.4.1](https://www.w3.org/TR/css-cascade-4/#importance)
    /// "A declaration is important if it has a !important annotation"
    pub important: bool,
}

const MARGINS: [Property; 4] = [
    Property::MarginTop,
    Property::MarginRight,
    Property::MarginBottom,
    Property::MarginLeft,
];

const PADDINGS: [Property; 4] = [
    Property::PaddingTop,
    Property::PaddingRight,
    Property::PaddingBottom,
    Property::PaddingLeft,
];

/// Parse a declaration list such as the contents of a `style` attribute.
///
/// Unsupported properties and values that do not fit their property are
/// dropped with a warning; the rest of the list is still used.
#[must_use]
pub fn parse_declarations(block: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(block);
    let mut parser = Parser::new(&mut input);
    parse_declaration_block(&mut parser)
}

/// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
///
/// The declarations of a block the parser is already inside, such as the
/// `{}` block of a style rule.
pub(crate) fn parse_declaration_block(input: &mut Parser<'_, '_>) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for result in RuleBodyParser::new(input, &mut DeclarationListParser) {
        match result {
            Ok(parsed) => declarations.extend(parsed),
            Err((error, text)) => warn_once("CSS", &describe(&error, text)),
        }
    }
    declarations
}

fn describe(error: &ParseError<'_, StyleError>, text: &str) -> String {
    match &error.kind {
        ParseErrorKind::Custom(style_error) => style_error.to_string(),
        ParseErrorKind::Basic(_) => format!("invalid declaration '{}'", text.trim()),
    }
}

struct DeclarationListParser;

impl<'i> DeclarationParser<'i> for DeclarationListParser {
    type Declaration = Vec<Declaration>;
    type Error = StyleError;

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// One declaration, which may expand to several longhands.
    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        let components = input.parse_until_before(Delimiter::Bang, component_values)?;
        let value = input.slice_from(start).trim();
        let important = input.try_parse(parse_important).is_ok();
        input.expect_exhausted()?;
        expand(&name.to_ascii_lowercase(), value, &components, important).map_err(|err| input.new_custom_error(err))
    }
}

impl<'i> AtRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type AtRule = Vec<Declaration>;
    type Error = StyleError;
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser {
    type Prelude = ();
    type QualifiedRule = Vec<Declaration>;
    type Error = StyleError;
}

impl<'i> RuleBodyItemParser<'i, Vec<Declaration>, StyleError> for DeclarationListParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

/// The component values of a declaration value, each as written.
fn component_values<'i>(input: &mut Parser<'i, '_>) -> Result<Vec<&'i str>, ParseError<'i, StyleError>> {
    let mut components = Vec::new();
    loop {
        input.skip_whitespace();
        let start = input.position();
        let Ok(token) = input.next() else {
            break;
        };
        if matches!(
            token,
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock | Token::CurlyBracketBlock
        ) {
            input.parse_nested_block(|block| {
                while block.next().is_ok() {}
                Ok::<_, ParseError<'i, StyleError>>(())
            })?;
        }
        components.push(input.slice_from(start));
    }
    Ok(components)
}

/// Validate a declaration, expanding the `margin` and `padding` shorthands.
fn expand(name: &str, value: &str, components: &[&str], important: bool) -> Result<Vec<Declaration>, StyleError> {
    let longhands: Vec<(Property, &str)> = match name {
        "margin" => expand_box_shorthand(MARGINS, components)
            .ok_or_else(|| StyleError::UnknownProperty(format!("margin: {value}")))?,
        "padding" => expand_box_shorthand(PADDINGS, components)
            .ok_or_else(|| StyleError::UnknownProperty(format!("padding: {value}")))?,
        _ => {
            let property = Property::from_name(name).ok_or_else(|| StyleError::UnknownProperty(name.to_owned()))?;
            vec![(property, value)]
        }
    };

    longhands
        .into_iter()
        .map(|(property, value)| {
            Ok(Declaration {
                property,
                value: property.parse_value(value)?,
                important,
            })
        })
        .collect()
}

/// [CSS Box § 5.2 / § 6.2](https://www.w3.org/TR/css-box-4/#margin-shorthand)
///
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom margins are set to the first value and
/// the right and left margins are set to the second. If there are three
/// values, the top is set to the first value, the left and right are set to
/// the second, and the bottom is set to the third. If there are four values
/// they apply to the top, right, bottom, and left, respectively."
fn expand_box_shorthand<'a>(longhands: [Property; 4], components: &[&'a str]) -> Option<Vec<(Property, &'a str)>> {
    let sides = match *components {
        [all] => [all; 4],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => return None,
    };
    Some(longhands.into_iter().zip(sides).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Display;
    use crate::values::{ColorValue, LengthUnit, LengthValue, Value};

    #[test]
    fn test_parse_simple_list() {
        let decls = parse_declarations("display: block; color: red");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, Property::Display);
        assert_eq!(decls[0].value, CascadedValue::Specified(Value::Display(Display::Block)));
        assert_eq!(
            decls[1].value,
            CascadedValue::Specified(Value::Color(ColorValue::rgb(255, 0, 0)))
        );
    }

    #[test]
    fn test_important_is_flagged() {
        let decls = parse_declarations("color: blue !important; display:none");
        assert!(decls[0].important);
        assert!(!decls[1].important);
    }

    #[test]
    fn test_margin_shorthand_expands() {
        let decls = parse_declarations("margin: 1em 0");
        let props: Vec<_> = decls.iter().map(|d| d.property).collect();
        assert_eq!(
            props,
            [Property::MarginTop, Property::MarginRight, Property::MarginBottom, Property::MarginLeft]
        );
        assert_eq!(
            decls[0].value,
            CascadedValue::Specified(Value::Length(LengthValue::new(1.0, LengthUnit::Em)))
        );
        assert_eq!(decls[3].value, CascadedValue::Specified(Value::Length(LengthValue::ZERO)));
    }

    #[test]
    fn test_unknown_and_invalid_are_dropped() {
        let decls = parse_declarations("float: left; display: sideways; ; color: inherit");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value, CascadedValue::Inherit);
    }

    #[test]
    fn test_function_arguments_stay_in_one_declaration() {
        let decls = parse_declarations("background-color: rgb(0, 0, 255); visibility: hidden");
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn test_important_with_space_after_bang() {
        let decls = parse_declarations("display: block ! IMPORTANT");
        assert_eq!(decls.len(), 1);
        assert!(decls[0].important);
        assert_eq!(decls[0].value, CascadedValue::Specified(Value::Display(Display::Block)));
    }

    #[test]
    fn test_text_after_important_drops_declaration() {
        let decls = parse_declarations("color: red !important blue; display: block");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, Property::Display);
    }

    #[test]
    fn test_property_names_are_case_insensitive() {
        let decls = parse_declarations("DISPLAY: none");
        assert_eq!(decls[0].value, CascadedValue::Specified(Value::Display(Display::None)));
    }

    #[test]
    fn test_padding_shorthand_with_three_components() {
        let decls = parse_declarations("padding: 1px 2px 3px !important");
        let values: Vec<_> = decls.iter().map(|d| d.value.clone()).collect();
        let px = |n| CascadedValue::Specified(Value::Length(LengthValue::new(n, LengthUnit::Px)));
        assert_eq!(values, vec![px(1.0), px(2.0), px(3.0), px(2.0)]);
        assert!(decls.iter().all(|d| d.important));
    }

    #[test]
    fn test_shorthand_with_wrong_component_count_is_dropped() {
        assert!(parse_declarations("margin: 1px 2px 3px 4px 5px").is_empty());
    }

    #[test]
    fn test_nested_rules_and_at_rules_are_dropped() {
        let decls = parse_declarations("@media print { color: red } color: blue");
        assert_eq!(decls.len(), 1);
        assert_eq!(
            decls[0].value,
            CascadedValue::Specified(Value::Color(ColorValue::rgb(0, 0, 255)))
        );
    }
}
