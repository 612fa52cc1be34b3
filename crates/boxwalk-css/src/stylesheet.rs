//! Stylesheets
//!
//! [CSS Syntax Level 3 § 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)

use cssparser::{
    AtRuleParser, CowRcStr, ParseError, Parser, ParserInput, ParserState, QualifiedRuleParser, StyleSheetParser,
};

use boxwalk_common::warning::warn_once;

use crate::declaration::{Declaration, parse_declaration_block};
use crate::selector::{Selector, parse_selector_list};

/// [§ 9 Style rules](https://www.w3.org/TR/css-syntax-3/#style-rules)
/// "A style rule is a qualified rule that associates a selector list with a
/// list of property declarations"
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// The rule's selector list; the rule applies if any one matches.
    pub selectors: Vec<Selector>,
    /// The declarations that survived validation.
    pub declarations: Vec<Declaration>,
}

/// A parsed stylesheet. At-rules are not kept.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Style rules in source order.
    pub rules: Vec<StyleRule>,
}

/// Parse a stylesheet.
///
/// Rules with an unsupported selector and all at-rules are skipped with a
/// warning, in the way a browser drops what it does not understand.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let rules = StyleSheetParser::new(&mut parser, &mut TopLevelRuleParser)
        .filter_map(Result::ok)
        .collect();
    Stylesheet { rules }
}

struct TopLevelRuleParser;

impl<'i> AtRuleParser<'i> for TopLevelRuleParser {
    type Prelude = ();
    type AtRule = StyleRule;
    type Error = ();

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// Refusing the prelude makes the parser skip the rest of the rule.
    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        warn_once("CSS", &format!("ignored at-rule '@{name}'"));
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for TopLevelRuleParser {
    type Prelude = Vec<Selector>;
    type QualifiedRule = StyleRule;
    type Error = ();

    fn parse_prelude<'t>(&mut self, input: &mut Parser<'i, 't>) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let prelude = input.slice_from(start).trim();
        parse_selector_list(prelude).ok_or_else(|| {
            warn_once("CSS", &format!("unsupported selector '{prelude}'"));
            input.new_custom_error(())
        })
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Ok(StyleRule {
            selectors,
            declarations: parse_declaration_block(input),
        })
    }
}
