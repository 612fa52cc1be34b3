//! Tests for box generation from XHTML documents.

use boxwalk_css::{Display, LoadOptions, cascade_document};
use boxwalk_dom::load_xhtml;
use boxwalk_tree::{BoxNode, StructureError, build_box_tree};

fn generate(source: &str) -> Result<Option<BoxNode>, StructureError> {
    let tree = load_xhtml(source).unwrap();
    let styles = cascade_document(&tree, &LoadOptions::default());
    build_box_tree(&tree, &styles)
}

fn boxes(source: &str) -> BoxNode {
    generate(source).unwrap().unwrap()
}

fn local(node: &BoxNode) -> Option<&str> {
    node.name().map(|name| name.local.as_str())
}

// ========== block and inline boxes ==========

#[test]
fn test_document_element_is_root() {
    let root = boxes(
        r#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body><p>x</p></body></html>"#,
    );
    assert_eq!(local(&root), Some("html"));
    // head is display: none
    assert_eq!(root.children().len(), 1);
    let body = &root.children()[0];
    assert_eq!(local(body), Some("body"));
    let p = &body.children()[0];
    assert!(p.is_block());
    assert!(p.is_block_and_has_no_block_children());
    assert_eq!(p.children()[0].text(), Some("x"));
    assert!(p.children()[0].is_anonymous());
}

#[test]
fn test_inline_element_without_boxes_inside_holds_its_text() {
    let root = boxes(r#"<p xmlns="http://www.w3.org/1999/xhtml">a<em>b<strong>c</strong></em>d</p>"#);
    let children = root.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].text(), Some("a"));
    assert_eq!(local(&children[1]), Some("em"));
    assert!(children[1].is_inline());
    // strong generates a box, so em keeps children
    assert_eq!(children[1].children().len(), 2);
    assert_eq!(children[1].children()[0].text(), Some("b"));
    assert_eq!(children[1].children()[1].text(), Some("c"));
    assert_eq!(children[2].text(), Some("d"));
}

#[test]
fn test_hidden_descendants_leave_text_out() {
    let root = boxes(
        r#"<p xmlns="http://www.w3.org/1999/xhtml"><em>one <b style="display: none">hidden</b>two</em></p>"#,
    );
    let em = &root.children()[0];
    assert!(em.children().is_empty());
    assert_eq!(em.text(), Some("one two"));
}

#[test]
fn test_display_from_style_element() {
    let root = boxes(
        r#"<div xmlns="http://www.w3.org/1999/xhtml"><style>span.b { display: block }</style><span class="b">x</span><span>y</span></div>"#,
    );
    // style is display: none; the block span forces an anonymous block
    let children = root.children();
    assert_eq!(children.len(), 2);
    assert_eq!(local(&children[0]), Some("span"));
    assert!(children[0].is_block());
    assert!(children[1].is_anonymous());
    assert!(children[1].is_block());
    assert_eq!(local(&children[1].children()[0]), Some("span"));
}

// ========== anonymous boxes ==========

#[test]
fn test_inline_content_next_to_blocks_gets_anonymous_block() {
    let root = boxes(r#"<div xmlns="http://www.w3.org/1999/xhtml">text<p>b</p><em>c</em> d</div>"#);
    let children = root.children();
    assert_eq!(children.len(), 3);
    assert!(children[0].is_anonymous() && children[0].is_block());
    assert_eq!(children[0].children()[0].text(), Some("text"));
    assert_eq!(local(&children[1]), Some("p"));
    assert!(children[2].is_anonymous() && children[2].is_block());
    assert_eq!(children[2].children().len(), 2);
    assert_eq!(local(&children[2].children()[0]), Some("em"));
    assert_eq!(children[2].children()[1].text(), Some(" d"));
}

#[test]
fn test_whitespace_only_content_generates_nothing() {
    let root = boxes("<div xmlns=\"http://www.w3.org/1999/xhtml\">   \n\t </div>");
    assert!(root.children().is_empty());
    assert!(!root.has_text());

    let root = boxes("<div xmlns=\"http://www.w3.org/1999/xhtml\">\n  <p>a</p>\n  <p>b</p>\n</div>");
    assert_eq!(root.children().len(), 2);
    assert!(root.children().iter().all(|child| !child.is_anonymous()));
}

#[test]
fn test_anonymous_block_styles_inherit() {
    let root = boxes(r#"<div xmlns="http://www.w3.org/1999/xhtml" style="color: red">a<p>b</p></div>"#);
    let anonymous = &root.children()[0];
    assert_eq!(anonymous.style().display(), Display::Block);
    assert!(std::rc::Rc::ptr_eq(anonymous.style().parent().unwrap(), root.style()));
}

// ========== boxes not generated ==========

#[test]
fn test_display_none_and_table_columns_are_skipped() {
    let root = boxes(
        r#"<table xmlns="http://www.w3.org/1999/xhtml"><colgroup><col/></colgroup><tr><td>a</td><td style="display: none">b</td></tr></table>"#,
    );
    assert_eq!(root.children().len(), 1);
    let row = &root.children()[0];
    assert_eq!(local(row), Some("tr"));
    assert_eq!(row.children().len(), 1);
    assert_eq!(local(&row.children()[0]), Some("td"));
}

#[test]
fn test_root_without_box() {
    assert!(generate(r#"<div xmlns="http://www.w3.org/1999/xhtml" style="display: none">x</div>"#)
        .unwrap()
        .is_none());
}

#[test]
fn test_replaced_element_ignores_content() {
    let root = boxes(r#"<p xmlns="http://www.w3.org/1999/xhtml">a<img src="x.png">alt text</img></p>"#);
    let img = &root.children()[1];
    assert!(img.is_replaced());
    assert!(img.children().is_empty());
    assert_eq!(img.text(), Some(""));
    assert_eq!(img.attributes().get_local("src"), Some("x.png"));
}

// ========== errors ==========

#[test]
fn test_block_inside_inline_is_rejected() {
    let result = generate(r#"<div xmlns="http://www.w3.org/1999/xhtml"><span><p>x</p></span></div>"#);
    assert_eq!(result.unwrap_err(), StructureError::BlockInInline);
}
