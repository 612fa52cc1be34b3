//! CSS Selector parsing and matching
//!
//! This module implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) that stylesheets
//! in XHTML content documents actually use: type, universal, class, ID and
//! attribute selectors, joined by descendant and child combinators.

use std::mem;

use cssparser::{Parser, ParserInput, Token};

use boxwalk_dom::{DomTree, ElementData, NodeId};

use crate::values::CssParseError;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// Example: `*`
    Universal,

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// Examples: `div`, `td`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// Example: `.poem`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// Example: `#chapter-1`
    Id(String),

    /// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
    /// Examples: `[title]`, `[lang=en]`
    Attribute {
        /// Local name of the attribute.
        name: String,
        /// Exact value to match, if given.
        value: Option<String>,
    },
}

impl SimpleSelector {
    fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Type(name) => element.name.local.eq_ignore_ascii_case(name),
            Self::Class(class) => element.classes().contains(class.as_str()),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Attribute { name, value } => match (element.attributes.get_local(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
        }
    }
}

/// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#compound)
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector(pub Vec<SimpleSelector>);

impl CompoundSelector {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.as_element(id)
            .is_some_and(|element| self.0.iter().all(|simple| simple.matches(element)))
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,
    /// `A > B`
    Child,
}

/// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// "(A, B, C)": IDs, then classes and attributes, then types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

/// A complex selector: compounds separated by combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<CompoundSelector>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
    /// Precomputed specificity.
    pub specificity: Specificity,
}

impl Selector {
    fn new(compounds: Vec<CompoundSelector>, combinators: Vec<Combinator>) -> Self {
        let mut specificity = Specificity::default();
        for simple in compounds.iter().flat_map(|c| &c.0) {
            match simple {
                SimpleSelector::Id(_) => specificity.0 += 1,
                SimpleSelector::Class(_) | SimpleSelector::Attribute { .. } => specificity.1 += 1,
                SimpleSelector::Type(_) => specificity.2 += 1,
                SimpleSelector::Universal => {}
            }
        }
        Self {
            compounds,
            combinators,
            specificity,
        }
    }

    /// Whether the element `id` matches, evaluated right to left.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(subject) = self.compounds.last() else {
            return false;
        };
        subject.matches(tree, id) && self.matches_context(tree, id, self.compounds.len() - 1)
    }

    /// Match `compounds[..remaining]` against the ancestors of `id`.
    fn matches_context(&self, tree: &DomTree, id: NodeId, remaining: usize) -> bool {
        if remaining == 0 {
            return true;
        }
        let compound = &self.compounds[remaining - 1];
        match self.combinators[remaining - 1] {
            Combinator::Child => tree
                .parent(id)
                .is_some_and(|parent| compound.matches(tree, parent) && self.matches_context(tree, parent, remaining - 1)),
            Combinator::Descendant => tree
                .ancestors(id)
                .any(|ancestor| compound.matches(tree, ancestor) && self.matches_context(tree, ancestor, remaining - 1)),
        }
    }
}

/// Parse a comma-separated selector list. Returns `None` if any selector
/// in it is unsupported, which invalidates the whole list.
#[must_use]
pub fn parse_selector_list(text: &str) -> Option<Vec<Selector>> {
    text.split(',').map(parse_selector).collect()
}

/// Parse one complex selector.
#[must_use]
pub fn parse_selector(text: &str) -> Option<Selector> {
    let mut input = ParserInput::new(text.trim());
    let mut parser = Parser::new(&mut input);

    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut current = CompoundSelector::default();
    let mut pending: Option<Combinator> = None;

    while let Ok(token) = parser.next_including_whitespace() {
        let simple = match token.clone() {
            Token::WhiteSpace(_) => {
                if !current.0.is_empty() {
                    compounds.push(mem::take(&mut current));
                }
                if !compounds.is_empty() && pending.is_none() {
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }
            Token::Delim('>') => {
                if !current.0.is_empty() {
                    compounds.push(mem::take(&mut current));
                }
                if compounds.is_empty() {
                    return None;
                }
                pending = Some(Combinator::Child);
                continue;
            }
            Token::Ident(name) => SimpleSelector::Type(name.to_ascii_lowercase()),
            Token::Delim('*') => SimpleSelector::Universal,
            Token::Delim('.') => match parser.next_including_whitespace() {
                Ok(Token::Ident(class)) => SimpleSelector::Class(class.to_string()),
                _ => return None,
            },
            Token::IDHash(id) => SimpleSelector::Id(id.to_string()),
            Token::SquareBracketBlock => parser.parse_nested_block(parse_attribute_selector).ok()?,
            // pseudo-classes, pseudo-elements and other combinators
            _ => return None,
        };
        if let Some(combinator) = pending.take() {
            combinators.push(combinator);
        }
        current.0.push(simple);
    }

    if !current.0.is_empty() {
        compounds.push(current);
    } else if pending == Some(Combinator::Child) || compounds.is_empty() {
        return None;
    }
    Some(Selector::new(compounds, combinators))
}

/// `[name]` or `[name=value]`
fn parse_attribute_selector<'i>(input: &mut Parser<'i, '_>) -> Result<SimpleSelector, CssParseError<'i>> {
    let name = input.expect_ident()?.to_ascii_lowercase();
    if input.is_exhausted() {
        return Ok(SimpleSelector::Attribute { name, value: None });
    }
    input.expect_delim('=')?;
    let value = input.expect_ident_or_string()?.to_string();
    input.expect_exhausted()?;
    Ok(SimpleSelector::Attribute {
        name,
        value: Some(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specificity_counts() {
        let selector = parse_selector("div.poem > p#first[title]").unwrap();
        assert_eq!(selector.specificity, Specificity(1, 2, 2));
        assert!(Specificity(0, 1, 0) > Specificity(0, 0, 5));
    }

    #[test]
    fn test_combinators_parsed() {
        let selector = parse_selector("table  tr>td").unwrap();
        assert_eq!(selector.compounds.len(), 3);
        assert_eq!(selector.combinators, vec![Combinator::Descendant, Combinator::Child]);
    }

    #[test]
    fn test_unsupported_selectors_rejected() {
        assert!(parse_selector("a:hover").is_none());
        assert!(parse_selector("h1 + p").is_none());
        assert!(parse_selector("> p").is_none());
        assert!(parse_selector_list("p, a::before").is_none());
        assert_eq!(parse_selector_list("h1, h2").map(|l| l.len()), Some(2));
    }
}
