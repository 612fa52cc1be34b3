//! Tests for the element tree and the XHTML loader.

use boxwalk_dom::{Attributes, DomTree, LoadError, NodeId, NodeKind, QualName, load_xhtml, ns};

// ========== tree building ==========

#[test]
fn test_append_text_merges_adjacent_runs() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, QualName::html("p"), Attributes::new());
    let first = tree.append_text(p, "a ");
    let second = tree.append_text(p, "b");
    assert_eq!(first, second);
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.as_text(first), Some("a b"));
}

#[test]
fn test_string_value_concatenates_descendants() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, QualName::html("p"), Attributes::new());
    let _ = tree.append_text(p, "one ");
    let em = tree.append_element(p, QualName::html("em"), Attributes::new());
    let _ = tree.append_text(em, "two");
    let _ = tree.append_text(p, " three");
    assert_eq!(tree.string_value(p), "one two three");
}

#[test]
fn test_ancestors_nearest_first() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, QualName::html("html"), Attributes::new());
    let body = tree.append_element(html, QualName::html("body"), Attributes::new());
    let p = tree.append_element(body, QualName::html("p"), Attributes::new());
    let chain: Vec<_> = tree.ancestors(p).collect();
    assert_eq!(chain, vec![body, html, NodeId::ROOT]);
}

// ========== loading ==========

#[test]
fn test_load_resolves_default_and_prefixed_namespaces() {
    let tree = load_xhtml(
        r#"<?xml version="1.0"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
  <body><div epub:type="pagebreak" id="p1"/></body>
</html>"#,
    )
    .unwrap();

    let html = tree.document_element().unwrap();
    assert!(tree.as_element(html).unwrap().name.is_html("html"));

    let body = tree
        .children(html)
        .iter()
        .copied()
        .find(|&id| tree.as_element(id).is_some())
        .unwrap();
    let div = tree.children(body)[0];
    let data = tree.as_element(div).unwrap();
    assert!(data.name.is_html("div"));
    assert_eq!(data.attributes.get(&QualName::epub("type")), Some("pagebreak"));
    assert_eq!(data.id(), Some("p1"));
    // xmlns declarations are not attributes
    assert!(
        tree.as_element(html)
            .unwrap()
            .attributes
            .iter()
            .all(|(n, _)| n.namespace.as_deref() != Some(ns::XMLNS))
    );
    assert!(tree.as_element(html).unwrap().attributes.is_empty());
}

#[test]
fn test_load_expands_entities_into_one_text_node() {
    let tree = load_xhtml(r#"<p xmlns="http://www.w3.org/1999/xhtml">fish &amp; chips &#x263A;</p>"#).unwrap();
    let p = tree.document_element().unwrap();
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.string_value(p), "fish & chips \u{263A}");
}

#[test]
fn test_load_drops_undeclared_entities_in_text_and_attributes_alike() {
    let tree = load_xhtml(r#"<p title="a&nbsp;b &amp; c">x&nbsp;y</p>"#).unwrap();
    let p = tree.document_element().unwrap();
    let data = tree.as_element(p).unwrap();
    assert_eq!(data.attributes.get(&QualName::local("title")), Some("ab & c"));
    assert_eq!(tree.string_value(p), "xy");
    assert!(boxwalk_common::warning::has_warned("DOM", "undeclared entity '&nbsp;' dropped"));
}

#[test]
fn test_load_rejects_bad_character_reference_in_attribute() {
    let result = load_xhtml(r#"<p title="&#xD800;"/>"#);
    assert!(matches!(result, Err(LoadError::Escape(_))));
}

#[test]
fn test_load_keeps_whitespace_text() {
    let tree = load_xhtml("<div xmlns=\"http://www.w3.org/1999/xhtml\">  \n\t <p/></div>").unwrap();
    let div = tree.document_element().unwrap();
    assert_eq!(tree.as_text(tree.children(div)[0]), Some("  \n\t "));
}

#[test]
fn test_load_keeps_comments_as_nodes() {
    let tree = load_xhtml("<div><!-- note --></div>").unwrap();
    let div = tree.document_element().unwrap();
    let comment = tree.children(div)[0];
    assert!(matches!(tree.get(comment).unwrap().kind, NodeKind::Comment(_)));
}

#[test]
fn test_load_rejects_unbound_prefix() {
    let err = load_xhtml("<html><epub:div/></html>").unwrap_err();
    assert!(matches!(err, LoadError::UnboundPrefix(p) if p == "epub"));
}

#[test]
fn test_load_rejects_empty_document() {
    assert!(matches!(load_xhtml("<!-- nothing -->"), Err(LoadError::NoRootElement)));
}

#[test]
fn test_load_rejects_mismatched_end_tag() {
    assert!(load_xhtml("<div><p></div>").is_err());
}

#[test]
fn test_classes_split_on_whitespace() {
    let tree = load_xhtml(r#"<p class="a  b	c"/>"#).unwrap();
    let p = tree.document_element().unwrap();
    let classes = tree.as_element(p).unwrap().classes();
    assert_eq!(classes.len(), 3);
    assert!(classes.contains("b"));
}
