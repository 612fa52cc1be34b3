//! Box generation
//!
//! [CSS 2.1 § 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Turns an element tree and its cascaded styles into a [`BoxNode`] tree.
//! Generation is eager: every box's children are computed once, when the
//! box is built, and shared by every copy later derived from it.

use std::collections::HashMap;
use std::rc::Rc;

use boxwalk_common::warning::warn_once;
use boxwalk_css::{CascadedStyle, Display, StyleMap, UsedStyle};
use boxwalk_dom::{Attributes, DomTree, NodeId};

use crate::box_node::{BoxKind, BoxNode, is_replaced_element};
use crate::error::StructureError;

/// [§ 16.6.1](https://www.w3.org/TR/CSS2/text.html#white-space-model)
/// "white space" in the sense of the `white-space` processing model: space,
/// tab, line feed and carriage return. Runs of it between blocks generate
/// nothing.
fn is_white_space(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// Generate the box tree of `tree`'s document element. Returns `None` when
/// the document element generates no box (for example `display: none`).
///
/// # Errors
///
/// Returns [`StructureError::BlockInInline`] if an element with a
/// block-level display sits inside an inline element.
pub fn build_box_tree(tree: &DomTree, styles: &StyleMap) -> Result<Option<BoxNode>, StructureError> {
    let Some(root) = tree.document_element() else {
        return Ok(None);
    };
    Generator::new(tree, styles).generate(root, None)
}

/// The box a child is being generated into.
#[derive(Clone, Copy)]
struct Container<'a> {
    style: &'a Rc<UsedStyle>,
    kind: BoxKind,
}

struct Generator<'a> {
    tree: &'a DomTree,
    styles: HashMap<NodeId, Rc<CascadedStyle>>,
    unstyled: Rc<CascadedStyle>,
}

impl<'a> Generator<'a> {
    fn new(tree: &'a DomTree, styles: &StyleMap) -> Self {
        Self {
            tree,
            styles: styles.iter().map(|(id, style)| (*id, Rc::new(style.clone()))).collect(),
            unstyled: Rc::new(CascadedStyle::new()),
        }
    }

    fn style(&self, id: NodeId, parent: Option<&Rc<UsedStyle>>) -> Rc<UsedStyle> {
        let cascaded = self.styles.get(&id).unwrap_or(&self.unstyled);
        UsedStyle::resolve(Rc::clone(cascaded), parent.cloned())
    }

    /// Used display of `id` as a child of a box styled `parent`. `None`
    /// for nodes that are not elements.
    fn display(&self, id: NodeId, parent: &Rc<UsedStyle>) -> Option<Display> {
        self.tree
            .as_element(id)
            .map(|_| self.style(id, Some(parent)).display())
    }

    fn is_block(&self, id: NodeId, parent: &Rc<UsedStyle>) -> bool {
        self.display(id, parent)
            .is_some_and(|display| display.generates_box() && !display.is_inline())
    }

    fn is_inline(&self, id: NodeId, parent: &Rc<UsedStyle>) -> bool {
        self.display(id, parent)
            .is_some_and(|display| display.generates_box() && display.is_inline())
    }

    fn generates_box(&self, id: NodeId, parent: &Rc<UsedStyle>) -> bool {
        self.display(id, parent).is_some_and(Display::generates_box)
    }

    /// Element and text children. Comments never reach box generation.
    fn content(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(|&child| self.tree.as_element(child).is_some() || self.tree.as_text(child).is_some())
            .collect()
    }

    /// Text of `nodes` and their descendants, leaving out subtrees that
    /// generate no box.
    fn string_value(&self, nodes: &[NodeId], parent: &Rc<UsedStyle>) -> String {
        let mut out = String::new();
        for &id in nodes {
            if let Some(text) = self.tree.as_text(id) {
                out.push_str(text);
            } else if self.generates_box(id, parent) {
                let style = self.style(id, Some(parent));
                out.push_str(&self.string_value(&self.content(id), &style));
            }
        }
        out
    }

    fn generate(&self, id: NodeId, container: Option<Container<'_>>) -> Result<Option<BoxNode>, StructureError> {
        let Some(element) = self.tree.as_element(id) else {
            return Ok(None);
        };
        let style = self.style(id, container.map(|c| c.style));
        let display = style.display();

        // [CSS Display § 2.6](https://www.w3.org/TR/css-display-3/#valdef-display-none)
        // "The element and its descendants generate no boxes or text runs."
        if !display.generates_box() {
            return Ok(None);
        }
        if matches!(display, Display::Flex | Display::InlineFlex | Display::Grid | Display::InlineGrid) {
            warn_once("Box", &format!("display: {display} is generated as a plain block box"));
        }

        let kind = if display.is_inline() { BoxKind::Inline } else { BoxKind::Block };
        if kind == BoxKind::Block && container.is_some_and(|c| c.kind == BoxKind::Inline) {
            return Err(StructureError::BlockInInline);
        }

        let name = element.name.clone();
        let attributes = element.attributes.clone();

        // [§ 3.1](https://www.w3.org/TR/css-display-3/#replaced-element)
        // The content of a replaced element is outside the formatting model.
        let children = if is_replaced_element(&name) { Vec::new() } else { self.content(id) };

        // STEP 1: An inline element with nothing box-generating inside is a
        // single run of text.
        if kind == BoxKind::Inline && !children.iter().any(|&child| self.generates_box(child, &style)) {
            let text = self.string_value(&children, &style);
            return Ok(Some(BoxNode::inline_text(Some(name), attributes, style, text)));
        }

        // STEP 2: Group children into runs of block-level elements and runs
        // of everything else.
        let this = Container { style: &style, kind };
        let has_blocks = children.iter().any(|&child| self.is_block(child, &style));
        let mut boxes = Vec::new();
        for run in children.chunk_by(|&a, &b| self.is_block(a, &style) == self.is_block(b, &style)) {
            if self.is_block(run[0], &style) {
                for &child in run {
                    boxes.extend(self.generate(child, Some(this))?);
                }
            } else if has_blocks {
                // [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
                //
                // "if a block container box has a block-level box inside it,
                // then we force it to have only block-level boxes inside it."
                let has_content = run.iter().any(|&child| self.is_inline(child, &style))
                    || !is_white_space(&self.string_value(run, &style));
                if has_content {
                    let anonymous_style = UsedStyle::anonymous_block(&style);
                    let inlines = self.generate_inline_run(
                        run,
                        Container {
                            style: &anonymous_style,
                            kind: BoxKind::Block,
                        },
                    )?;
                    boxes.push(BoxNode::block(None, Attributes::new(), anonymous_style, inlines)?);
                }
            } else {
                boxes.extend(self.generate_inline_run(run, this)?);
            }
        }

        // STEP 3: Build the box. Its constructor checks the invariants.
        let node = match kind {
            BoxKind::Block => BoxNode::block(Some(name), attributes, style, boxes)?,
            BoxKind::Inline => BoxNode::inline(Some(name), attributes, style, boxes)?,
        };
        Ok(Some(node))
    }

    /// Boxes for a run of inline content: text becomes anonymous inline
    /// boxes, elements are generated in place.
    fn generate_inline_run(&self, run: &[NodeId], container: Container<'_>) -> Result<Vec<BoxNode>, StructureError> {
        let is_text = |id: NodeId| self.tree.as_text(id).is_some();
        let mut boxes = Vec::new();
        for group in run.chunk_by(|&a, &b| is_text(a) == is_text(b)) {
            if is_text(group[0]) {
                // [§ 9.2.2.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous)
                //
                // "White space content that would subsequently be collapsed
                // away ... does not generate any anonymous inline boxes."
                let text: String = group.iter().filter_map(|&id| self.tree.as_text(id)).collect();
                if !is_white_space(&text) {
                    boxes.push(BoxNode::anonymous_inline(container.style, text));
                }
            } else {
                for &child in group {
                    boxes.extend(self.generate(child, Some(container))?);
                }
            }
        }
        Ok(boxes)
    }
}
