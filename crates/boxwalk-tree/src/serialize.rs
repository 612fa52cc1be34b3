//! Debug output: the box tree exactly as it is, anonymous boxes and used
//! properties included, as XML or as JSON.

use serde::Serialize;

use boxwalk_css::{Display, UsedVisibility};
use boxwalk_dom::QualName;

use crate::box_node::{BoxNode, Rendering};
use crate::markup::{MarkupWriter, Namespaces};

/// Namespace of the `css:*` used-property attributes.
pub const CSS_PROPERTY_NAMESPACE: &str = "css";

/// Write the box tree as XML.
///
/// Each named box becomes a `_local` element (its own local name behind an
/// underscore) holding a `BlockBox` or `InlineBox`. Anonymous boxes become
/// `AnonymousBlockBox` and `AnonymousInlineBox`. Inline content of a block
/// sits in `BlockContent`, text in `InlineContent`.
#[must_use]
pub fn serialize_xml(root: &BoxNode) -> String {
    let mut namespaces = Namespaces::collect(root, None, false);
    namespaces.declare(CSS_PROPERTY_NAMESPACE, "css");
    let mut writer = MarkupWriter::default();
    writer.declaration();
    serialize_box(&mut writer, &namespaces, root, None, true);
    writer.finish()
}

fn rendering_name(rendering: Rendering) -> Option<&'static str> {
    match rendering {
        Rendering::Default => None,
        Rendering::PreferUnwrap => Some("prefer-unwrap"),
        Rendering::Skip => Some("skip"),
    }
}

fn serialize_box(
    writer: &mut MarkupWriter,
    namespaces: &Namespaces,
    node: &BoxNode,
    parent: Option<&BoxNode>,
    is_root: bool,
) {
    let declare = |writer: &mut MarkupWriter| {
        if is_root {
            for (name, value) in namespaces.declarations() {
                writer.attribute(&name, &value);
            }
        }
    };
    let rendering = |writer: &mut MarkupWriter| {
        if let Some(rendering) = rendering_name(node.rendering()) {
            writer.attribute("rendering", rendering);
        }
    };

    let Some(name) = node.name() else {
        writer.start(if node.is_block() {
            "AnonymousBlockBox"
        } else {
            "AnonymousInlineBox"
        });
        declare(writer);
        rendering(writer);
        serialize_content(writer, namespaces, node);
        writer.end();
        return;
    };

    writer.start(&format!("_{}", name.local));
    declare(writer);
    for (attribute, value) in node.attributes().iter() {
        writer.attribute(&namespaces.attribute(attribute), value);
    }
    if node.is_block() {
        writer.start("BlockBox");
        let style = node.style();
        writer.attribute("css:display", &style.display().to_string());
        writer.attribute(
            "css:background-color",
            &style
                .background_color()
                .map_or_else(|| "transparent".to_owned(), |color| color.to_string()),
        );
        writer.attribute("css:visibility", &style.visibility().to_string());
        writer.attribute("visible", if node.is_visible(parent) { "true" } else { "false" });
    } else {
        writer.start("InlineBox");
        writer.attribute("element", &name.local);
    }
    rendering(writer);
    serialize_content(writer, namespaces, node);
    writer.end();
    writer.end();
}

fn serialize_content(writer: &mut MarkupWriter, namespaces: &Namespaces, node: &BoxNode) {
    if let Some(text) = node.text() {
        writer.start("InlineContent");
        writer.text(text);
        writer.end();
        return;
    }
    let inline_content = node.is_block() && node.children().first().is_some_and(BoxNode::is_inline);
    if inline_content {
        writer.start("BlockContent");
    }
    for child in node.children() {
        serialize_box(writer, namespaces, child, Some(node), false);
    }
    if inline_content {
        writer.end();
    }
}

/// A qualified name in the JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonName<'a> {
    namespace: &'a str,
    local_part: &'a str,
    prefix: &'a str,
}

impl<'a> From<&'a QualName> for JsonName<'a> {
    fn from(name: &'a QualName) -> Self {
        Self {
            namespace: name.namespace.as_deref().unwrap_or_default(),
            local_part: &name.local,
            prefix: name.prefix.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonAttribute<'a> {
    name: JsonName<'a>,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonProps {
    display: Display,
    #[serde(rename = "background-color")]
    background_color: Option<String>,
    visibility: UsedVisibility,
}

/// One box in the JSON output. `type` is 1 for block boxes, 0 for inline.
#[derive(Debug, Serialize)]
struct JsonBox<'a> {
    #[serde(rename = "type")]
    kind: u8,
    name: Option<JsonName<'a>>,
    attributes: Vec<JsonAttribute<'a>>,
    text: Option<&'a str>,
    children: Vec<JsonBox<'a>>,
    props: JsonProps,
}

impl<'a> JsonBox<'a> {
    fn new(node: &'a BoxNode) -> Self {
        let style = node.style();
        Self {
            kind: u8::from(node.is_block()),
            name: node.name().map(JsonName::from),
            attributes: node
                .attributes()
                .iter()
                .map(|(name, value)| JsonAttribute {
                    name: name.into(),
                    value,
                })
                .collect(),
            text: node.text(),
            children: node.children().iter().map(Self::new).collect(),
            props: JsonProps {
                display: style.display(),
                background_color: style.background_color().map(|color| color.to_string()),
                visibility: style.visibility(),
            },
        }
    }
}

/// Write the box tree as JSON:
/// `{type, name: {namespace, localPart, prefix}, attributes: [{name, value}], text, children, props}`.
///
/// # Errors
///
/// Only if `serde_json` fails to write, which plain strings and numbers do
/// not cause.
pub fn serialize_json(root: &BoxNode, pretty: bool) -> serde_json::Result<String> {
    let tree = JsonBox::new(root);
    if pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    }
}
