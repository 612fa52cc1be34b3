//! Shared plumbing for the XML writers: namespace prefixes and a small
//! string-building element writer.

use std::collections::BTreeMap;
use std::fmt::Write;

use boxwalk_dom::{QualName, ns};
use quick_xml::escape::escape;

use crate::box_node::BoxNode;

/// Prefixes for every namespace in a box tree other than the default one.
pub(crate) struct Namespaces {
    default: Option<&'static str>,
    prefixes: BTreeMap<String, String>,
}

impl Namespaces {
    /// Collect the namespaces of element names (when `element_names` is set)
    /// and attribute names under `root`. `default` is declared without a
    /// prefix.
    pub(crate) fn collect(root: &BoxNode, default: Option<&'static str>, element_names: bool) -> Self {
        let mut namespaces = Self {
            default,
            prefixes: BTreeMap::new(),
        };
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if element_names && let Some(name) = node.name() {
                namespaces.add(name);
            }
            for (name, _) in node.attributes().iter() {
                namespaces.add(name);
            }
            stack.extend(node.children());
        }
        namespaces
    }

    /// Declare `namespace` under `prefix` unless it is already known.
    pub(crate) fn declare(&mut self, namespace: &str, prefix: &str) {
        if !self.prefixes.contains_key(namespace) {
            let _ = self.prefixes.insert(namespace.to_owned(), prefix.to_owned());
        }
    }

    fn add(&mut self, name: &QualName) {
        let Some(namespace) = name.namespace.as_deref() else {
            return;
        };
        if Some(namespace) == self.default || namespace == ns::XML || self.prefixes.contains_key(namespace) {
            return;
        }
        let taken = |prefix: &str| self.prefixes.values().any(|p| p == prefix);
        let prefix = match name.prefix.as_deref() {
            Some(prefix) if !taken(prefix) => prefix.to_owned(),
            _ => (1..)
                .map(|n| format!("ns{n}"))
                .find(|candidate| !taken(candidate))
                .unwrap_or_default(),
        };
        let _ = self.prefixes.insert(namespace.to_owned(), prefix);
    }

    /// `xmlns` attributes for the root element.
    pub(crate) fn declarations(&self) -> Vec<(String, String)> {
        let mut declarations: Vec<(String, String)> = self
            .default
            .map(|uri| ("xmlns".to_owned(), uri.to_owned()))
            .into_iter()
            .collect();
        declarations.extend(
            self.prefixes
                .iter()
                .map(|(uri, prefix)| (format!("xmlns:{prefix}"), uri.clone())),
        );
        declarations
    }

    /// How to write an element named `name`, and whether it must undeclare
    /// the default namespace.
    pub(crate) fn element(&self, name: &QualName) -> (String, bool) {
        match name.namespace.as_deref() {
            None => (name.local.clone(), self.default.is_some()),
            Some(namespace) if Some(namespace) == self.default => (name.local.clone(), false),
            Some(_) => (self.attribute(name), false),
        }
    }

    /// How to write an attribute named `name`.
    pub(crate) fn attribute(&self, name: &QualName) -> String {
        match name.namespace.as_deref() {
            None => name.local.clone(),
            Some(ns::XML) => format!("xml:{}", name.local),
            Some(namespace) => match self.prefixes.get(namespace) {
                Some(prefix) => format!("{prefix}:{}", name.local),
                None => name.local.clone(),
            },
        }
    }
}

/// Appends XML to a string. Elements with no content are self-closed.
#[derive(Default)]
pub(crate) struct MarkupWriter {
    out: String,
    open: Vec<String>,
    start_tag_pending: bool,
}

impl MarkupWriter {
    pub(crate) fn declaration(&mut self) {
        self.out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    }

    fn close_start_tag(&mut self) {
        if self.start_tag_pending {
            self.out.push('>');
            self.start_tag_pending = false;
        }
    }

    pub(crate) fn start(&mut self, tag: &str) {
        self.close_start_tag();
        let _ = write!(self.out, "<{tag}");
        self.open.push(tag.to_owned());
        self.start_tag_pending = true;
    }

    /// Add an attribute to the element just started.
    pub(crate) fn attribute(&mut self, name: &str, value: &str) {
        debug_assert!(self.start_tag_pending, "attribute written after content");
        let _ = write!(self.out, " {name}=\"{}\"", escape(value));
    }

    pub(crate) fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.close_start_tag();
        self.out.push_str(&escape(text));
    }

    pub(crate) fn end(&mut self) {
        let Some(tag) = self.open.pop() else {
            return;
        };
        if self.start_tag_pending {
            self.out.push_str("/>");
            self.start_tag_pending = false;
        } else {
            let _ = write!(self.out, "</{tag}>");
        }
    }

    pub(crate) fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.end();
        }
        self.out
    }
}
