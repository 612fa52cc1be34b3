//! Rendering a box tree back to XHTML.
//!
//! Named boxes are written under their own name. Anonymous boxes, and
//! boxes marked [`Rendering::PreferUnwrap`], are written as `div`/`span`
//! (or their own name) only when leaving them out would lose something: a
//! style of their own, attributes, or the block break they stand for.
//! [`Rendering::Skip`] boxes are left out with their subtrees.

use std::rc::Rc;

use boxwalk_css::UsedStyle;
use boxwalk_dom::{QualName, ns};

use crate::box_node::{BoxNode, Rendering};
use crate::markup::{MarkupWriter, Namespaces};

/// Stylesheet linked when styles are written inline.
pub const RESET_STYLESHEET: &str = "html5-reset.css";
/// Stylesheet linked when only the markup's semantics carry the style.
pub const SEMANTIC_STYLESHEET: &str = "html5-semantic.css";

/// How [`render`] writes a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Write each box's own style, relative to its parent, as a `style`
    /// attribute.
    pub preserve_style: bool,
    /// Stylesheet to link from `head`. Defaults to [`RESET_STYLESHEET`] or
    /// [`SEMANTIC_STYLESHEET`] depending on `preserve_style`.
    pub stylesheet_href: Option<String>,
}

impl RenderOptions {
    fn href(&self) -> &str {
        self.stylesheet_href.as_deref().unwrap_or(if self.preserve_style {
            RESET_STYLESHEET
        } else {
            SEMANTIC_STYLESHEET
        })
    }
}

/// Write `root` as an XHTML document.
///
/// An `html` root box contributes its children; any other root is written
/// inside the generated `html` element.
#[must_use]
pub fn render(root: &BoxNode, options: &RenderOptions) -> String {
    let namespaces = Namespaces::collect(root, Some(ns::XHTML), true);
    let mut renderer = Renderer {
        writer: MarkupWriter::default(),
        namespaces,
        preserve_style: options.preserve_style,
    };

    renderer.writer.declaration();
    renderer.writer.start("html");
    for (name, value) in renderer.namespaces.declarations() {
        renderer.writer.attribute(&name, &value);
    }
    renderer.writer.start("head");
    renderer.writer.start("link");
    renderer.writer.attribute("rel", "stylesheet");
    renderer.writer.attribute("type", "text/css");
    renderer.writer.attribute("href", options.href());
    renderer.writer.end();
    renderer.writer.end();

    if root.name().is_some_and(|name| name.is_html("html")) && root.rendering() != Rendering::Skip {
        let mut new_block = true;
        for child in root.children() {
            new_block = renderer.render_box(child, Some(root), new_block);
        }
    } else {
        let _ = renderer.render_box(root, None, true);
    }
    renderer.writer.finish()
}

struct Renderer {
    writer: MarkupWriter,
    namespaces: Namespaces,
    preserve_style: bool,
}

impl Renderer {
    /// The `style` attribute for `node` under `parent`, if its style differs.
    fn style_attribute(&self, node: &BoxNode, parent: Option<&BoxNode>) -> Option<String> {
        if !self.preserve_style {
            return None;
        }
        let base: Option<&Rc<UsedStyle>> = parent.map(BoxNode::style);
        node.style()
            .relativize(base)
            .map(|relative| relative.cascaded().to_string())
    }

    /// Whether the element for `node` may be left out.
    fn elidable(node: &BoxNode) -> bool {
        (node.is_anonymous() || node.rendering() == Rendering::PreferUnwrap) && !node.has_necessary_attributes()
    }

    /// Whether anything would be written for `node`.
    fn will_render(&self, node: &BoxNode, parent: &BoxNode) -> bool {
        if node.rendering() == Rendering::Skip {
            return false;
        }
        !Self::elidable(node)
            || node.has_text()
            || self.style_attribute(node, Some(parent)).is_some()
            || node.children().iter().any(|child| self.will_render(child, node))
    }

    /// Write `node`. `new_block` tells whether a block break comes before
    /// it anyway; the return value tells the same for whatever follows.
    fn render_box(&mut self, node: &BoxNode, parent: Option<&BoxNode>, mut new_block: bool) -> bool {
        if node.rendering() == Rendering::Skip {
            return new_block;
        }
        let style = self.style_attribute(node, parent);

        // an inline wrapper, a block wrapper where a block starts anyway, or
        // one with nothing inside to write
        let skip_element = Self::elidable(node)
            && style.is_none()
            && (node.is_inline()
                || new_block
                || (!node.has_text() && !node.children().iter().any(|child| self.will_render(child, node))));

        if !skip_element {
            let name = node.name().cloned().unwrap_or_else(|| {
                QualName::html(if node.is_block() { "div" } else { "span" })
            });
            let (tag, undeclare) = self.namespaces.element(&name);
            self.writer.start(&tag);
            if undeclare {
                self.writer.attribute("xmlns", "");
            }
            for (attribute, value) in node.attributes().iter() {
                if attribute.namespace.is_none() && (attribute.local == "style" || attribute.local == "class") {
                    continue;
                }
                let attribute = self.namespaces.attribute(attribute);
                self.writer.attribute(&attribute, value);
            }
            if let Some(style) = &style {
                self.writer.attribute("style", style);
            }
            if node.is_block() {
                new_block = true;
            }
        }

        if let Some(text) = node.text() {
            self.writer.text(text);
        }
        for child in node.children() {
            new_block = self.render_box(child, Some(node), new_block);
        }

        if !skip_element {
            self.writer.end();
            if node.is_block() {
                new_block = true;
            }
        }
        if node.is_inline() {
            new_block = false;
        }
        new_block
    }
}
