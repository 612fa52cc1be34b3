//! XHTML loading.
//!
//! Parses a namespace-well-formed XML document into a [`DomTree`]. Namespace
//! declarations are resolved here so every element and attribute name in the
//! tree is a fully expanded [`QualName`]; the `xmlns` attributes themselves
//! are not kept.

use quick_xml::Reader;
use quick_xml::escape::{EscapeError, resolve_predefined_entity, unescape_with};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use boxwalk_common::warning::warn_once;

use crate::{Attributes, DomTree, ElementData, NodeId, NodeKind, QualName, ns};

/// Why a document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute could not be parsed.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    /// An attribute value contains a bad escape.
    #[error("bad escape in attribute value: {0}")]
    Escape(#[from] EscapeError),

    /// A name, value or run of character data is not valid UTF-8.
    #[error("input is not valid UTF-8")]
    Encoding,

    /// A prefixed name uses a prefix with no `xmlns:` declaration in scope.
    #[error("namespace prefix '{0}' is not bound")]
    UnboundPrefix(String),

    /// A numeric character reference does not denote a character.
    #[error("invalid character reference '&{0};'")]
    CharRef(String),

    /// The document ended inside an element.
    #[error("element <{0}> is never closed")]
    Unclosed(String),

    /// The document has no element at all.
    #[error("document has no root element")]
    NoRootElement,
}

/// In-scope namespace bindings, one frame per open element.
#[derive(Default)]
struct Scopes(Vec<Vec<(String, Option<String>)>>);

impl Scopes {
    /// Namespace bound to `prefix` (`""` is the default namespace).
    fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(ns::XML);
        }
        self.0
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(p, _)| p == prefix)
            .and_then(|(_, uri)| uri.as_deref())
    }
}

fn split_name(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, LoadError> {
    std::str::from_utf8(bytes).map_err(|_| LoadError::Encoding)
}

/// Resolve an element or attribute name. Unprefixed attributes are in no
/// namespace; unprefixed elements take the default namespace.
fn qualify(scopes: &Scopes, raw: &str, is_element: bool) -> Result<QualName, LoadError> {
    let (prefix, local) = split_name(raw);
    let mut name = match prefix {
        Some(p) => {
            let uri = scopes
                .resolve(p)
                .ok_or_else(|| LoadError::UnboundPrefix(p.to_owned()))?;
            QualName::new(Some(uri), local).with_prefix(p)
        }
        None if is_element => QualName::new(scopes.resolve(""), local),
        None => QualName::local(local),
    };
    if name.namespace.is_none() {
        name.prefix = None;
    }
    Ok(name)
}

/// Open a new namespace frame for `start` and build its element data.
fn open_element(scopes: &mut Scopes, start: &BytesStart<'_>) -> Result<ElementData, LoadError> {
    let mut frame = Vec::new();
    let mut raw_attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref())?.to_owned();
        let value = unescape_attribute(utf8(&attr.value)?)?;
        if key == "xmlns" {
            frame.push((String::new(), (!value.is_empty()).then_some(value)));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            frame.push((prefix.to_owned(), Some(value)));
        } else {
            raw_attributes.push((key, value));
        }
    }
    scopes.0.push(frame);

    let name = qualify(scopes, utf8(start.name().as_ref())?, true)?;
    let mut attributes = Attributes::new();
    for (key, value) in raw_attributes {
        let _ = attributes.insert(qualify(scopes, &key, false)?, value);
    }
    Ok(ElementData { name, attributes })
}

fn drop_undeclared(name: &str) {
    warn_once("DOM", &format!("undeclared entity '&{name};' dropped"));
}

/// Expand the references in an attribute value. Unknown named entities are
/// dropped with the same warning as in character data.
fn unescape_attribute(raw: &str) -> Result<String, LoadError> {
    let value = unescape_with(raw, |name| {
        resolve_predefined_entity(name).or_else(|| {
            drop_undeclared(name);
            Some("")
        })
    })?;
    Ok(value.into_owned())
}

/// Expand `&name;`. Unknown named entities are dropped with a warning.
fn resolve_reference(name: &str) -> Result<Option<char>, LoadError> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse(),
        };
        return code
            .ok()
            .and_then(char::from_u32)
            .map(Some)
            .ok_or_else(|| LoadError::CharRef(name.to_owned()));
    }
    Ok(match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            drop_undeclared(name);
            None
        }
    })
}

/// Parse an XHTML (or any namespace-aware XML) document.
///
/// # Errors
///
/// Returns a [`LoadError`] if the input is not well-formed, uses an unbound
/// prefix, or contains no element.
pub fn load_xhtml(source: &str) -> Result<DomTree, LoadError> {
    let mut reader = Reader::from_str(source);
    let mut tree = DomTree::new();
    let mut scopes = Scopes::default();
    let mut open: Vec<NodeId> = vec![NodeId::ROOT];

    loop {
        let parent = open.last().copied().unwrap_or(NodeId::ROOT);
        match reader.read_event()? {
            Event::Start(e) => {
                let data = open_element(&mut scopes, &e)?;
                let id = tree.alloc(NodeKind::Element(data));
                tree.append_child(parent, id);
                open.push(id);
            }
            Event::Empty(e) => {
                let data = open_element(&mut scopes, &e)?;
                let _ = scopes.0.pop();
                let id = tree.alloc(NodeKind::Element(data));
                tree.append_child(parent, id);
            }
            Event::End(_) => {
                let _ = open.pop();
                let _ = scopes.0.pop();
            }
            Event::Text(e) => {
                // Character data outside the document element is not content.
                if parent != NodeId::ROOT {
                    let _ = tree.append_text(parent, utf8(e.as_ref())?);
                }
            }
            Event::CData(e) => {
                if parent != NodeId::ROOT {
                    let _ = tree.append_text(parent, utf8(e.as_ref())?);
                }
            }
            Event::GeneralRef(e) => {
                let name = utf8(e.as_ref())?;
                if parent != NodeId::ROOT
                    && let Some(c) = resolve_reference(name)?
                {
                    let _ = tree.append_text(parent, c.encode_utf8(&mut [0; 4]));
                }
            }
            Event::Comment(e) => {
                let id = tree.alloc(NodeKind::Comment(utf8(e.as_ref())?.to_owned()));
                tree.append_child(parent, id);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if open.len() > 1
        && let Some(&unclosed) = open.last()
    {
        let name = tree
            .as_element(unclosed)
            .map(|e| e.name.to_string())
            .unwrap_or_default();
        return Err(LoadError::Unclosed(name));
    }
    if tree.document_element().is_none() {
        return Err(LoadError::NoRootElement);
    }
    Ok(tree)
}
