//! Used values
//!
//! [CSS Cascading Level 4 § 4.6 Used Values](https://www.w3.org/TR/css-cascade-4/#used)
//!
//! A [`UsedStyle`] wraps one box's cascaded values and a link to the style
//! of the box it was generated under. Inheritance and initial values are
//! resolved on demand by walking that link, and the three values box
//! generation needs (`display`, `background-color`, `visibility`) are
//! memoized on first access.

use std::cell::OnceCell;
use std::rc::Rc;

use strum::IntoEnumIterator;

use crate::cascade::CascadedStyle;
use crate::display::{Display, UsedVisibility};
use crate::property::Property;
use crate::values::{CascadedValue, ColorValue, Value};

/// Resolved style of one box, chained to its parent box's style.
///
/// The parent link records where the box was generated, not where it
/// currently sits in an edited tree.
#[derive(Debug)]
pub struct UsedStyle {
    cascaded: Rc<CascadedStyle>,
    parent: Option<Rc<UsedStyle>>,
    display: OnceCell<Display>,
    background_color: OnceCell<Option<ColorValue>>,
    visibility: OnceCell<UsedVisibility>,
}

impl UsedStyle {
    /// `resolve(specified_properties, parent)`
    #[must_use]
    pub fn resolve(cascaded: Rc<CascadedStyle>, parent: Option<Rc<Self>>) -> Rc<Self> {
        Rc::new(Self {
            cascaded,
            parent,
            display: OnceCell::new(),
            background_color: OnceCell::new(),
            visibility: OnceCell::new(),
        })
    }

    /// [CSS 2.1 § 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box." The only declared value is `display: block`.
    #[must_use]
    pub fn anonymous_block(parent: &Rc<Self>) -> Rc<Self> {
        let mut cascaded = CascadedStyle::new();
        let _ = cascaded.set(Property::Display, CascadedValue::Specified(Value::Display(Display::Block)));
        Self::resolve(Rc::new(cascaded), Some(Rc::clone(parent)))
    }

    /// [CSS 2.1 § 9.2.2.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous)
    ///
    /// Nothing declared: everything is inherited or initial.
    #[must_use]
    pub fn anonymous_inline(parent: &Rc<Self>) -> Rc<Self> {
        Self::resolve(Rc::new(CascadedStyle::new()), Some(Rc::clone(parent)))
    }

    /// The declared values this style was built from.
    #[must_use]
    pub fn cascaded(&self) -> &CascadedStyle {
        &self.cascaded
    }

    /// The style this one inherits from.
    #[must_use]
    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// [CSS Cascading § 7 Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting)
    ///
    /// Look `property` up, optionally resolving `inherit` through the parent
    /// chain and `initial` to the property's initial value. An undeclared
    /// property counts as `inherit` if it is inherited and `initial`
    /// otherwise. `inherit` at the root becomes `initial`.
    #[must_use]
    pub fn get_property(&self, property: Property, concretize_inherit: bool, concretize_initial: bool) -> CascadedValue {
        let (inherit, mut initial) = match self.cascaded.get(property) {
            Some(CascadedValue::Specified(value)) => return CascadedValue::Specified(value.clone()),
            Some(CascadedValue::Inherit) => (true, false),
            Some(CascadedValue::Initial) => (false, true),
            None => (property.is_inherited(), !property.is_inherited()),
        };
        if inherit && concretize_inherit {
            match &self.parent {
                Some(parent) => return parent.get_property(property, concretize_inherit, concretize_initial),
                None => initial = true,
            }
        }
        if initial && concretize_initial {
            return CascadedValue::Specified(property.initial_value());
        }
        if initial {
            CascadedValue::Initial
        } else {
            CascadedValue::Inherit
        }
    }

    /// The specified value of `property`, with both keywords resolved.
    ///
    /// The value always fits the property: [`CascadedStyle::set`] and the
    /// declaration parser refuse anything else.
    #[must_use]
    pub fn specified(&self, property: Property) -> Value {
        let value = match self.get_property(property, true, true) {
            CascadedValue::Specified(value) => value,
            // both keywords were concretized above
            CascadedValue::Inherit | CascadedValue::Initial => property.initial_value(),
        };
        debug_assert!(property.accepts(&value), "'{value}' does not fit {property}");
        value
    }

    /// Used `display`. A box under a `display: none` box is `none` whatever
    /// it declares.
    #[must_use]
    pub fn display(&self) -> Display {
        *self.display.get_or_init(|| {
            if self.parent.as_ref().is_some_and(|parent| parent.display() == Display::None) {
                return Display::None;
            }
            match self.specified(Property::Display) {
                Value::Display(display) => display,
                // not accepted by `display`; see `specified`
                Value::Visibility(_)
                | Value::Color(_)
                | Value::Transparent
                | Value::Length(_)
                | Value::Number(_)
                | Value::Keyword(_) => Display::Inline,
            }
        })
    }

    /// Used `background-color`. `transparent` shows the parent's background,
    /// so it resolves to the parent's used value, or `None` at the root.
    #[must_use]
    pub fn background_color(&self) -> Option<ColorValue> {
        *self.background_color.get_or_init(|| match self.specified(Property::BackgroundColor) {
            Value::Color(color) => Some(color),
            Value::Transparent => self.parent.as_ref().and_then(|parent| parent.background_color()),
            // not accepted by `background-color`; see `specified`
            Value::Display(_) | Value::Visibility(_) | Value::Length(_) | Value::Number(_) | Value::Keyword(_) => None,
        })
    }

    /// Used `visibility`, with `collapse` folded into `hidden`.
    #[must_use]
    pub fn visibility(&self) -> UsedVisibility {
        *self.visibility.get_or_init(|| match self.specified(Property::Visibility) {
            Value::Visibility(visibility) => visibility.into(),
            // not accepted by `visibility`; see `specified`
            Value::Display(_)
            | Value::Color(_)
            | Value::Transparent
            | Value::Length(_)
            | Value::Number(_)
            | Value::Keyword(_) => UsedVisibility::Visible,
        })
    }

    /// A minimal style expressing how this one differs from what a box with
    /// no declarations of its own would get under `base`.
    ///
    /// A property that resolves to `initial` on one side only is written out
    /// (as its initial value if this side is the `initial` one), since
    /// consumers may disagree about defaults. Zero lengths are equal in any
    /// unit. Returns `None` when nothing differs.
    #[must_use]
    pub fn relativize(&self, base: Option<&Rc<Self>>) -> Option<Rc<Self>> {
        let if_empty = Self::resolve(Rc::new(CascadedStyle::new()), base.cloned());
        let mut relative = CascadedStyle::new();
        for property in Property::iter() {
            let ours = self.get_property(property, true, false);
            let theirs = if_empty.get_property(property, true, false);
            let value = match (&ours, &theirs) {
                (CascadedValue::Initial, CascadedValue::Initial) => continue,
                (CascadedValue::Initial, _) => CascadedValue::Specified(property.initial_value()),
                (_, CascadedValue::Initial) => ours.clone(),
                (CascadedValue::Specified(a), CascadedValue::Specified(b)) if a.is_zero_length() && b.is_zero_length() => {
                    continue;
                }
                _ if ours == theirs => continue,
                _ => ours.clone(),
            };
            let _ = relative.set(property, value);
        }
        (!relative.is_empty()).then(|| Self::resolve(Rc::new(relative), base.cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Visibility;

    fn style(decls: &str, parent: Option<&Rc<UsedStyle>>) -> Rc<UsedStyle> {
        UsedStyle::resolve(Rc::new(CascadedStyle::parse(decls)), parent.cloned())
    }

    #[test]
    fn test_inherit_at_root_is_initial() {
        let root = style("color: inherit", None);
        assert_eq!(root.specified(Property::Color), Value::Color(ColorValue::BLACK));
    }

    #[test]
    fn test_undeclared_inherited_property_follows_parent() {
        let parent = style("visibility: collapse", None);
        let child = style("", Some(&parent));
        assert_eq!(child.specified(Property::Visibility), Value::Visibility(Visibility::Collapse));
        assert_eq!(child.visibility(), UsedVisibility::Hidden);
    }

    #[test]
    fn test_keywords_kept_when_not_concretized() {
        let parent = style("", None);
        let child = style("margin-top: initial", Some(&parent));
        assert_eq!(child.get_property(Property::MarginTop, true, false), CascadedValue::Initial);
        assert_eq!(child.get_property(Property::Color, false, false), CascadedValue::Inherit);
    }
}
