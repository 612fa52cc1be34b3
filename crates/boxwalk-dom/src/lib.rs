//! Element tree for the boxwalk pipeline.
//!
//! This crate provides an arena-based tree of document, element, text and
//! comment nodes following the [DOM Living Standard](https://dom.spec.whatwg.org/)
//! node model, with namespace-qualified element and attribute names.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! so later stages (the cascade, box generation) can key side tables by node
//! without holding borrows into the tree.

mod name;
pub mod xml;

use std::collections::HashSet;

pub use name::{Attributes, QualName, ns};
pub use xml::{LoadError, load_xhtml};

/// A type-safe index into the [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// One node of the arena: its payload plus parent/child links.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub kind: NodeKind,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

/// The node types the loader produces.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document node; owns the document element.
    Document,
    /// An element with its name and attributes.
    Element(ElementData),
    /// Character data.
    Text(String),
    /// A comment. Never generates a box.
    Comment(String),
}

/// Element-specific data.
///
/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
/// "Elements have an associated namespace, namespace prefix, local name ..."
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Namespace, local name and prefix.
    pub name: QualName,
    /// "An element has an associated attribute list"
    pub attributes: Attributes,
}

impl ElementData {
    /// An element with no attributes.
    #[must_use]
    pub fn new(name: QualName) -> Self {
        Self {
            name,
            attributes: Attributes::new(),
        }
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get_local("id")
    }

    /// The set of space-separated tokens in the `class` attribute.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attributes
            .get_local("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// The inline `style` attribute.
    #[must_use]
    pub fn style_attribute(&self) -> Option<&str> {
        self.attributes.get_local("style")
    }
}

/// Arena-based element tree.
///
/// All nodes live in one vector; the document node is at [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// A tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, including the document node.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the document node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Append a detached `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Allocate an element named `name` and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: QualName, attributes: Attributes) -> NodeId {
        let id = self.alloc(NodeKind::Element(ElementData { name, attributes }));
        self.append_child(parent, id);
        id
    }

    /// Append character data to `parent`, merging with a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let last = self.nodes[parent.0].children.last().copied();
        if let Some(last) = last
            && let NodeKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(text);
            return last;
        }
        let id = self.alloc(NodeKind::Text(text.to_owned()));
        self.append_child(parent, id);
        id
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element data if `id` is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Character data if `id` is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Iterate over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&n| self.parent(n))
    }

    /// [§ 4.2.1 Document tree](https://dom.spec.whatwg.org/#document-element)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists, and null otherwise."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// [XPath 1.0 § 5.2](https://www.w3.org/TR/xpath-10/#element-nodes)
    ///
    /// "The string-value of an element node is the concatenation of the
    /// string-values of all text node descendants of the element node in
    /// document order."
    #[must_use]
    pub fn string_value(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut |_| true, &mut out);
        out
    }

    /// Concatenated descendant text, not descending into elements for which
    /// `descend` returns false.
    pub fn collect_text(&self, id: NodeId, descend: &mut dyn FnMut(NodeId) -> bool, out: &mut String) {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element(_) | NodeKind::Document) => {
                for &child in self.children(id) {
                    if self.as_element(child).is_none() || descend(child) {
                        self.collect_text(child, descend, out);
                    }
                }
            }
            Some(NodeKind::Comment(_)) | None => {}
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
