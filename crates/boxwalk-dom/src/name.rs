//! Qualified names and attribute lists.
//!
//! [Namespaces in XML 1.0 § 4](https://www.w3.org/TR/xml-names/#ns-qualnames)
//! "In XML documents conforming to this specification, some names ... MUST be
//! given as qualified names."

use std::fmt;
use std::hash::{Hash, Hasher};

/// Namespace URIs the pipeline gives special meaning to.
pub mod ns {
    /// The XHTML namespace.
    pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
    /// The EPUB 3 structural semantics namespace (`epub:type`).
    pub const EPUB: &str = "http://www.idpf.org/2007/ops";
    /// The `xml:` prefix namespace, bound in every document.
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// The namespace of `xmlns` declarations themselves.
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// [Namespaces in XML 1.0 § 4](https://www.w3.org/TR/xml-names/#ns-qualnames)
///
/// An expanded name (namespace + local part) plus the prefix it was written
/// with. Two names are equal when their namespace and local part are equal;
/// the prefix only matters when writing the name back out.
#[derive(Debug, Clone)]
pub struct QualName {
    /// Namespace URI, `None` for names in no namespace.
    pub namespace: Option<String>,
    /// "The local part"
    pub local: String,
    /// Prefix used in the source, if any.
    pub prefix: Option<String>,
}

impl QualName {
    /// A name in `namespace` with no prefix.
    #[must_use]
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            local: local.to_owned(),
            prefix: None,
        }
    }

    /// A name in no namespace (e.g. most attributes).
    #[must_use]
    pub fn local(local: &str) -> Self {
        Self::new(None, local)
    }

    /// An XHTML element name.
    #[must_use]
    pub fn html(local: &str) -> Self {
        Self::new(Some(ns::XHTML), local)
    }

    /// A name in the EPUB namespace, written with the conventional `epub` prefix.
    #[must_use]
    pub fn epub(local: &str) -> Self {
        Self::new(Some(ns::EPUB), local).with_prefix("epub")
    }

    /// The same name written with `prefix`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_owned());
        self
    }

    /// Whether this is the XHTML element `local`.
    #[must_use]
    pub fn is_html(&self, local: &str) -> bool {
        self.namespace.as_deref() == Some(ns::XHTML) && self.local == local
    }
}

impl PartialEq for QualName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local == other.local
    }
}

impl Eq for QualName {}

impl Hash for QualName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local.hash(state);
    }
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// An element's attributes in document order. Lookups are linear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(QualName, String)>);

impl Attributes {
    /// An empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Value of the attribute named `name`.
    #[must_use]
    pub fn get(&self, name: &QualName) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the no-namespace attribute `local`.
    #[must_use]
    pub fn get_local(&self, local: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.namespace.is_none() && n.local == local)
            .map(|(_, value)| value.as_str())
    }

    /// Whether an attribute named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &QualName) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `value`, keeping its position if it was already present.
    /// Returns the previous value.
    pub fn insert(&mut self, name: QualName, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.0.push((name, value));
        None
    }

    /// Iterate over `(name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualName, &str)> {
        self.0.iter().map(|(n, v)| (n, v.as_str()))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(QualName, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (QualName, String)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            let _ = attributes.insert(name, value);
        }
        attributes
    }
}
