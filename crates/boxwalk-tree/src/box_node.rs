//! The box tree
//!
//! [CSS 2.1 § 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! A [`BoxNode`] is an immutable, reference-counted tree node. Edits never
//! touch an existing box: they derive a new one that shares everything but
//! the replaced aspect (name and attributes, children, or rendering hint),
//! so any number of tree versions can share unchanged subtrees.

use std::fmt;
use std::rc::Rc;

use boxwalk_css::UsedStyle;
use boxwalk_dom::{Attributes, QualName};

use crate::error::StructureError;

/// HTML elements whose content is external to the document.
///
/// [HTML § 15.4.1 Replaced elements](https://html.spec.whatwg.org/multipage/rendering.html#replaced-elements)
const REPLACED_ELEMENTS: [&str; 4] = ["img", "video", "embed", "iframe"];

/// Whether `name` is an element whose source content is ignored.
#[must_use]
pub fn is_replaced_element(name: &QualName) -> bool {
    REPLACED_ELEMENTS.iter().any(|local| name.is_html(local))
}

/// Block-level or inline-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    /// [§ 9.2.1](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    /// "Block-level boxes are boxes that participate in a block formatting context."
    Block,
    /// [§ 9.2.2](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    /// "Inline-level boxes are those that ... participate in an inline formatting context."
    Inline,
}

/// How an output writer should treat a box. Structure and style are
/// unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rendering {
    /// Write the box normally.
    #[default]
    Default,
    /// Leave the element out when it adds nothing, the way an anonymous box
    /// is left out.
    PreferUnwrap,
    /// Leave the box and its whole subtree out.
    Skip,
}

#[derive(Clone)]
struct BoxData {
    kind: BoxKind,
    name: Option<QualName>,
    attributes: Attributes,
    children: Rc<[BoxNode]>,
    text: Option<String>,
    style: Rc<UsedStyle>,
    replaced: bool,
    rendering: Rendering,
    block_and_no_block_children: bool,
}

/// One node of the box tree. Cloning is cheap and keeps identity.
#[derive(Clone)]
pub struct BoxNode(Rc<BoxData>);

impl BoxNode {
    /// A block box for an element, or an anonymous one if `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if `children` mix block and inline boxes
    /// or contain two adjacent anonymous block boxes.
    pub fn block(
        name: Option<QualName>,
        attributes: Attributes,
        style: Rc<UsedStyle>,
        children: Vec<Self>,
    ) -> Result<Self, StructureError> {
        Self::build(BoxKind::Block, name, attributes, style, children.into())
    }

    /// An inline box with child boxes.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::BlockInInline`] if any child is a block.
    pub fn inline(
        name: Option<QualName>,
        attributes: Attributes,
        style: Rc<UsedStyle>,
        children: Vec<Self>,
    ) -> Result<Self, StructureError> {
        Self::build(BoxKind::Inline, name, attributes, style, children.into())
    }

    /// An inline box holding text and no child boxes.
    #[must_use]
    pub fn inline_text(name: Option<QualName>, attributes: Attributes, style: Rc<UsedStyle>, text: String) -> Self {
        let replaced = name.as_ref().is_some_and(is_replaced_element);
        Self(Rc::new(BoxData {
            kind: BoxKind::Inline,
            name,
            attributes,
            children: Rc::from(Vec::new()),
            text: Some(text),
            style,
            replaced,
            rendering: Rendering::Default,
            block_and_no_block_children: false,
        }))
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// An anonymous block wrapping `children`, styled from `parent_style`.
    ///
    /// # Errors
    ///
    /// As [`BoxNode::block`].
    pub fn anonymous_block(parent_style: &Rc<UsedStyle>, children: Vec<Self>) -> Result<Self, StructureError> {
        Self::block(None, Attributes::new(), UsedStyle::anonymous_block(parent_style), children)
    }

    /// [§ 9.2.2.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous)
    ///
    /// "Any text that is directly contained inside a block container element
    /// (not inside an inline element) must be treated as an anonymous inline
    /// element."
    #[must_use]
    pub fn anonymous_inline(parent_style: &Rc<UsedStyle>, text: String) -> Self {
        Self::inline_text(None, Attributes::new(), UsedStyle::anonymous_inline(parent_style), text)
    }

    fn build(
        kind: BoxKind,
        name: Option<QualName>,
        attributes: Attributes,
        style: Rc<UsedStyle>,
        children: Rc<[Self]>,
    ) -> Result<Self, StructureError> {
        validate(kind, &children)?;
        let replaced = name.as_ref().is_some_and(is_replaced_element);
        Ok(Self(Rc::new(BoxData {
            kind,
            block_and_no_block_children: kind == BoxKind::Block && children.first().is_none_or(Self::is_inline),
            name,
            attributes,
            children,
            text: None,
            style,
            replaced,
            rendering: Rendering::Default,
        })))
    }

    // ===== accessors =====

    /// Block or inline.
    #[must_use]
    pub fn kind(&self) -> BoxKind {
        self.0.kind
    }

    /// Whether this is a block box.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.0.kind == BoxKind::Block
    }

    /// Whether this is an inline box.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.0.kind == BoxKind::Inline
    }

    /// The element name used when writing the box out. `None` for anonymous
    /// boxes.
    #[must_use]
    pub fn name(&self) -> Option<&QualName> {
        self.0.name.as_ref()
    }

    /// Whether the box was generated rather than taken from an element.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.name.is_none()
    }

    /// Attributes written out with the box.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.0.attributes
    }

    /// Child boxes in order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.0.children
    }

    pub(crate) fn shared_children(&self) -> Rc<[Self]> {
        Rc::clone(&self.0.children)
    }

    /// Text content of an inline box without child boxes.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.0.text.as_deref()
    }

    /// Used style, chained to the style of the box this one was generated
    /// under.
    #[must_use]
    pub fn style(&self) -> &Rc<UsedStyle> {
        &self.0.style
    }

    /// Whether the box stands for a replaced element such as an image.
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        self.0.replaced
    }

    /// The rendering hint.
    #[must_use]
    pub fn rendering(&self) -> Rendering {
        self.0.rendering
    }

    /// A block box whose children, if any, are inline: the unit a
    /// transformation counts as "one block".
    #[must_use]
    pub fn is_block_and_has_no_block_children(&self) -> bool {
        self.0.block_and_no_block_children
    }

    /// An inline box carrying text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.is_inline() && self.0.text.is_some()
    }

    /// Whether the box has attributes besides `style` and `class`, which a
    /// writer must keep even when the element itself could go.
    #[must_use]
    pub fn has_necessary_attributes(&self) -> bool {
        self.0
            .attributes
            .iter()
            .any(|(name, _)| name.namespace.is_some() || (name.local != "style" && name.local != "class"))
    }

    /// Whether the box paints a background of its own: it has a background
    /// color and it differs from `parent`'s.
    #[must_use]
    pub fn is_visible(&self, parent: Option<&Self>) -> bool {
        let Some(color) = self.0.style.background_color() else {
            return false;
        };
        parent.is_none_or(|parent| parent.0.style.background_color() != Some(color))
    }

    /// Pointer identity: whether both handles refer to the same box value.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ===== derivations =====

    /// The same box under another name. `None` makes it anonymous.
    #[must_use]
    pub fn renamed(&self, name: Option<QualName>, attributes: Attributes) -> Self {
        self.derive(|data| {
            data.name = name;
            data.attributes = attributes;
        })
    }

    /// The same box with other children. Text is dropped when `children` is
    /// not empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the new children break an invariant.
    pub fn with_children(&self, children: Vec<Self>) -> Result<Self, StructureError> {
        validate(self.0.kind, &children)?;
        Ok(self.derive(|data| {
            data.block_and_no_block_children =
                data.kind == BoxKind::Block && children.first().is_none_or(Self::is_inline);
            if !children.is_empty() {
                data.text = None;
            }
            data.children = children.into();
        }))
    }

    /// The same box with another rendering hint.
    #[must_use]
    pub fn with_rendering(&self, rendering: Rendering) -> Self {
        self.derive(|data| data.rendering = rendering)
    }

    fn derive(&self, change: impl FnOnce(&mut BoxData)) -> Self {
        let mut data = (*self.0).clone();
        change(&mut data);
        Self(Rc::new(data))
    }
}

/// Check the invariants a box's children must satisfy.
fn validate(kind: BoxKind, children: &[BoxNode]) -> Result<(), StructureError> {
    match kind {
        BoxKind::Block => {
            if let Some(first) = children.first()
                && children.iter().any(|child| child.kind() != first.kind())
            {
                return Err(StructureError::MixedChildren);
            }
            let anonymous_block = |b: &BoxNode| b.is_block() && b.is_anonymous();
            if children.windows(2).any(|pair| anonymous_block(&pair[0]) && anonymous_block(&pair[1])) {
                return Err(StructureError::AdjacentAnonymousBlocks);
            }
        }
        // inline children were checked when they were built, so one level is enough
        BoxKind::Inline => {
            if children.iter().any(BoxNode::is_block) {
                return Err(StructureError::BlockInInline);
            }
        }
    }
    Ok(())
}

impl fmt::Debug for BoxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("BoxNode");
        let _ = s.field("kind", &self.0.kind);
        if let Some(name) = &self.0.name {
            let _ = s.field("name", &name.local);
        }
        if let Some(text) = &self.0.text {
            let _ = s.field("text", text);
        }
        if self.0.rendering != Rendering::Default {
            let _ = s.field("rendering", &self.0.rendering);
        }
        if !self.0.children.is_empty() {
            let _ = s.field("children", &self.0.children);
        }
        s.finish()
    }
}
