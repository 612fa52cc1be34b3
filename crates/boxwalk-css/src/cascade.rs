//! CSS Cascading
//!
//! This module implements the cascade per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/),
//! producing one [`CascadedStyle`] per element. Inheritance and initial
//! values are not applied here; that is the job of
//! [`UsedStyle`](crate::UsedStyle).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use boxwalk_dom::{DomTree, NodeId, ns};

use crate::declaration::{Declaration, parse_declarations};
use crate::error::StyleError;
use crate::property::Property;
use crate::selector::Specificity;
use crate::stylesheet::{Stylesheet, parse_stylesheet};
use crate::ua_stylesheet::ua_stylesheet;
use crate::values::CascadedValue;

/// [§ 4.2 Cascaded Values](https://www.w3.org/TR/css-cascade-4/#cascaded)
///
/// "The cascaded value represents the result of the cascade: it is the
/// declared value that wins the cascade."
///
/// Properties with no declared value are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadedStyle {
    values: BTreeMap<Property, CascadedValue>,
}

impl CascadedStyle {
    /// An element with no declared values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from declaration text, as in a `style` attribute. Later
    /// declarations win; importance is ignored.
    #[must_use]
    pub fn parse(declarations: &str) -> Self {
        let mut style = Self::new();
        for declaration in parse_declarations(declarations) {
            let _ = style.values.insert(declaration.property, declaration.value);
        }
        style
    }

    /// The cascaded value of `property`, if one was declared.
    #[must_use]
    pub fn get(&self, property: Property) -> Option<&CascadedValue> {
        self.values.get(&property)
    }

    /// Set `property`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidValue`] if the value does not fit the
    /// property, so the resolver never sees one.
    pub fn set(&mut self, property: Property, value: CascadedValue) -> Result<(), StyleError> {
        if let CascadedValue::Specified(v) = &value
            && !property.accepts(v)
        {
            return Err(StyleError::InvalidValue {
                property,
                value: v.to_string(),
            });
        }
        let _ = self.values.insert(property, value);
        Ok(())
    }

    /// Declared values in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, &CascadedValue)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serializes as a `style` attribute value: `name: value` pairs sorted by
/// property name, joined with `"; "`.
impl fmt::Display for CascadedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(property, _)| property.name());
        for (i, (property, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        Ok(())
    }
}

/// Cascaded style of every element in a tree.
pub type StyleMap = HashMap<NodeId, CascadedStyle>;

/// Which author styles the cascade honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Read `<style>` elements in the document.
    pub style_elements: bool,
    /// Read `style` attributes.
    pub style_attributes: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            style_elements: true,
            style_attributes: true,
        }
    }
}

/// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Origin and importance, lowest first. Important declarations reverse the
/// origin order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    UserAgent,
    Author,
    StyleAttribute,
    AuthorImportant,
    StyleAttributeImportant,
    UserAgentImportant,
}

impl Level {
    const fn of(origin: Self, important: bool) -> Self {
        match (origin, important) {
            (Self::UserAgent, true) => Self::UserAgentImportant,
            (Self::Author, true) => Self::AuthorImportant,
            (Self::StyleAttribute, true) => Self::StyleAttributeImportant,
            (level, _) => level,
        }
    }
}

/// One declaration competing in the cascade for an element.
struct Candidate<'a> {
    level: Level,
    specificity: Specificity,
    order: usize,
    declaration: &'a Declaration,
}

/// Parse the author stylesheets embedded in `<style>` elements, in
/// document order.
#[must_use]
pub fn author_stylesheets(tree: &DomTree) -> Vec<Stylesheet> {
    (0..tree.len())
        .map(NodeId)
        .filter(|&id| {
            tree.as_element(id).is_some_and(|element| {
                element.name.local == "style"
                    && matches!(element.name.namespace.as_deref(), None | Some(ns::XHTML))
                    && element
                        .attributes
                        .get_local("type")
                        .is_none_or(|t| t.trim().eq_ignore_ascii_case("text/css"))
            })
        })
        .map(|id| parse_stylesheet(&tree.string_value(id)))
        .collect()
}

/// Cascade the document with its own `<style>` elements, per `options`.
#[must_use]
pub fn cascade_document(tree: &DomTree, options: &LoadOptions) -> StyleMap {
    let author = if options.style_elements {
        author_stylesheets(tree)
    } else {
        Vec::new()
    };
    cascade_with(tree, &author, options.style_attributes)
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Cascade every element of `tree` against the UA stylesheet, `author`
/// stylesheets and `style` attributes.
#[must_use]
pub fn cascade(tree: &DomTree, author: &[Stylesheet]) -> StyleMap {
    cascade_with(tree, author, true)
}

fn cascade_with(tree: &DomTree, author: &[Stylesheet], style_attributes: bool) -> StyleMap {
    let sheets: Vec<(Level, &Stylesheet)> = std::iter::once((Level::UserAgent, ua_stylesheet()))
        .chain(author.iter().map(|sheet| (Level::Author, sheet)))
        .collect();

    let mut styles = StyleMap::new();
    for id in (0..tree.len()).map(NodeId) {
        let Some(element) = tree.as_element(id) else {
            continue;
        };

        // [§ 6.4 Cascade Sorting Order]
        let mut candidates = Vec::new();
        let mut order = 0;
        for &(origin, sheet) in &sheets {
            for rule in &sheet.rules {
                let Some(specificity) = rule
                    .selectors
                    .iter()
                    .filter(|selector| selector.matches(tree, id))
                    .map(|selector| selector.specificity)
                    .max()
                else {
                    order += rule.declarations.len();
                    continue;
                };
                for declaration in &rule.declarations {
                    candidates.push(Candidate {
                        level: Level::of(origin, declaration.important),
                        specificity,
                        order,
                        declaration,
                    });
                    order += 1;
                }
            }
        }

        // [§ 6.2] "declarations from style attributes"
        let inline = if style_attributes {
            element.style_attribute().map(parse_declarations).unwrap_or_default()
        } else {
            Vec::new()
        };
        for declaration in &inline {
            candidates.push(Candidate {
                level: Level::of(Level::StyleAttribute, declaration.important),
                specificity: Specificity::default(),
                order,
                declaration,
            });
            order += 1;
        }

        candidates.sort_by_key(|c| (c.level, c.specificity, c.order));
        let mut style = CascadedStyle::new();
        for candidate in candidates {
            let _ = style
                .values
                .insert(candidate.declaration.property, candidate.declaration.value.clone());
        }
        let _ = styles.insert(id, style);
    }
    styles
}
