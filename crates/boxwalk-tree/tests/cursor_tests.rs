//! Tests for cursor navigation, searches and edits.

use boxwalk_css::{LoadOptions, cascade_document};
use boxwalk_dom::{Attributes, QualName, load_xhtml};
use boxwalk_tree::{BoxCursor, BoxNode, CursorError, Rendering, StructureError, build_box_tree};

/// div > [p > "a", p > ["b", em "c"], ul > [li > "d", li > "e"]]
const DOCUMENT: &str = r#"<div xmlns="http://www.w3.org/1999/xhtml"><p>a</p><p>b<em>c</em></p><ul><li>d</li><li>e</li></ul></div>"#;

fn cursor(source: &str) -> BoxCursor {
    let tree = load_xhtml(source).unwrap();
    let styles = cascade_document(&tree, &LoadOptions::default());
    BoxCursor::new(build_box_tree(&tree, &styles).unwrap().unwrap())
}

fn local(node: &BoxNode) -> Option<&str> {
    node.name().map(|name| name.local.as_str())
}

fn names(node: &BoxNode) -> Vec<Option<&str>> {
    node.children().iter().map(local).collect()
}

/// Cursor on the first `li`.
fn at_first_item() -> BoxCursor {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let _ = cursor.next_sibling().unwrap();
    let _ = cursor.next_sibling().unwrap();
    let _ = cursor.first_child().unwrap();
    cursor
}

/// Cursor on the first `p`, which nothing precedes.
fn cursor_at_first_paragraph() -> BoxCursor {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    cursor
}

// ========== navigation ==========

#[test]
fn test_child_and_parent() {
    let mut cursor = cursor(DOCUMENT);
    let root = cursor.current();
    let p = cursor.first_child().unwrap();
    assert_eq!(local(&p), Some("p"));
    assert_eq!(cursor.depth(), 1);
    assert!(cursor.parent().unwrap().same(&root));
    assert_eq!(cursor.depth(), 0);
    assert!(cursor.parent().is_none());
}

#[test]
fn test_siblings_stop_at_ends() {
    let mut cursor = cursor(DOCUMENT);
    let first = cursor.first_child().unwrap();
    assert!(cursor.previous_sibling().is_none());
    assert!(cursor.current().same(&first));
    let _ = cursor.next_sibling().unwrap();
    let ul = cursor.next_sibling().unwrap();
    assert_eq!(local(&ul), Some("ul"));
    assert!(cursor.next_sibling().is_none());
    assert!(cursor.current().same(&ul));
    assert_eq!(local(&cursor.previous_sibling().unwrap()), Some("p"));
}

#[test]
fn test_root_moves_to_top() {
    let mut cursor = at_first_item();
    let root = cursor.root();
    assert_eq!(cursor.depth(), 0);
    assert!(root.same(&cursor.tree()));
}

#[test]
fn test_first_following_walks_up() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let a = cursor.first_child().unwrap();
    assert_eq!(a.text(), Some("a"));
    let second = cursor.first_following().unwrap();
    assert_eq!(second.children()[0].text(), Some("b"));
    assert_eq!(cursor.depth(), 1);

    let mut last = at_first_item();
    let _ = last.next_sibling().unwrap();
    let _ = last.first_child().unwrap();
    assert!(last.first_following().is_none());
    assert_eq!(last.current().text(), Some("e"));
}

#[test]
fn test_first_preceding_descends_to_last_leaf() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let _ = cursor.next_sibling().unwrap();
    let _ = cursor.next_sibling().unwrap();
    let em = cursor.first_preceding().unwrap();
    assert_eq!(local(&em), Some("em"));
    assert_eq!(cursor.depth(), 2);
}

#[test]
fn test_first_preceding_skips_ancestors() {
    let mut cursor = at_first_item();
    let d = cursor.first_child().unwrap();
    // "d" is the first leaf under ul; what precedes it is inside the second p
    let found = cursor.first_preceding().unwrap();
    assert!(!found.same(&d));
    assert_eq!(local(&found), Some("em"));
}

// ========== searches ==========

#[test]
fn test_first_descendant_in_document_order() {
    let mut cursor = cursor(DOCUMENT);
    let em = cursor.first_descendant(|node| node.text() == Some("c")).unwrap();
    assert_eq!(local(&em), Some("em"));
    assert_eq!(cursor.depth(), 2);
}

#[test]
fn test_first_descendant_restores_on_failure() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let p = cursor.current();
    // li is not below the first p
    assert!(cursor.first_descendant(|node| local(node) == Some("li")).is_none());
    assert!(cursor.current().same(&p));
    assert_eq!(cursor.depth(), 1);
}

#[test]
fn test_first_following_matching_enters_later_subtrees() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let li = cursor.first_following_matching(|node| local(node) == Some("li")).unwrap();
    assert_eq!(li.children()[0].text(), Some("d"));
    assert_eq!(cursor.depth(), 2);

    let before = cursor.current();
    assert!(cursor.first_following_matching(|node| local(node) == Some("table")).is_none());
    assert!(cursor.current().same(&before));
}

#[test]
fn test_first_preceding_matching_climbs_from_the_preceding_box() {
    let mut cursor = at_first_item();
    let _ = cursor.next_sibling().unwrap();
    let ul = cursor.first_preceding_matching(|node| local(node) == Some("ul")).unwrap();
    assert_eq!(names(&ul), vec![Some("li"), Some("li")]);

    let mut cursor = at_first_item();
    let em = cursor.first_preceding_matching(|node| local(node) == Some("em")).unwrap();
    assert_eq!(em.text(), Some("c"));

    let mut cursor = at_first_item();
    let li = cursor.current();
    assert!(cursor.first_preceding_matching(|node| local(node) == Some("table")).is_none());
    assert!(cursor.current().same(&li));
}

#[test]
fn test_first_preceding_matching_passes_over_ancestors_before_the_preceding_box() {
    // Nothing precedes the first item inside ul, so the search starts at em.
    let mut cursor = at_first_item();
    let li = cursor.current();
    assert!(cursor.first_preceding_matching(|node| local(node) == Some("ul")).is_none());
    assert!(cursor.current().same(&li));

    let mut cursor = at_first_item();
    let found = cursor.first_preceding_matching(|node| local(node) == Some("div")).unwrap();
    assert!(found.same(&cursor.tree()));
    assert_eq!(cursor.depth(), 0);

    let mut cursor = cursor_at_first_paragraph();
    assert!(cursor.first_preceding_matching(|node| local(node) == Some("div")).is_none());
    assert_eq!(cursor.depth(), 1);
}

#[test]
fn test_first_parent() {
    let mut cursor = at_first_item();
    let _ = cursor.first_child().unwrap();
    let div = cursor.first_parent(|node| local(node) == Some("div")).unwrap();
    assert_eq!(cursor.depth(), 0);
    assert!(div.same(&cursor.tree()));

    let mut cursor = at_first_item();
    let li = cursor.current();
    assert!(cursor.first_parent(|node| local(node) == Some("li")).is_none());
    assert!(cursor.current().same(&li));
}

// ========== renaming and marking ==========

#[test]
fn test_rename_current() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let attributes: Attributes = [(QualName::local("id"), "intro".to_owned())].into_iter().collect();
    let renamed = cursor.rename_current(Some(QualName::html("h1")), attributes).unwrap();
    assert_eq!(local(&renamed), Some("h1"));
    assert_eq!(renamed.attributes().get_local("id"), Some("intro"));
    assert_eq!(names(&cursor.tree()), vec![Some("h1"), Some("p"), Some("ul")]);

    let anonymous = cursor.rename_current(None, Attributes::new()).unwrap();
    assert!(anonymous.is_anonymous());
    assert!(anonymous.attributes().is_empty());
}

#[test]
fn test_rename_to_anonymous_next_to_anonymous_block_fails() {
    let mut cursor = cursor(r#"<div xmlns="http://www.w3.org/1999/xhtml">a<p>b</p></div>"#);
    let _ = cursor.first_child().unwrap();
    let _ = cursor.next_sibling().unwrap();
    let before = cursor.tree();
    assert_eq!(
        cursor.rename_current(None, Attributes::new()).unwrap_err(),
        CursorError::Structure(StructureError::AdjacentAnonymousBlocks)
    );
    assert!(cursor.tree().same(&before));
}

#[test]
fn test_marks() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    assert_eq!(cursor.mark_current_for_unwrap().unwrap().rendering(), Rendering::PreferUnwrap);
    let _ = cursor.next_sibling().unwrap();
    assert_eq!(cursor.mark_current_for_removal().unwrap().rendering(), Rendering::Skip);
    let rendering: Vec<_> = cursor.tree().children().iter().map(BoxNode::rendering).collect();
    assert_eq!(rendering, vec![Rendering::PreferUnwrap, Rendering::Skip, Rendering::Default]);
}

// ========== deleting and unwrapping ==========

#[test]
fn test_delete_first_child() {
    let mut cursor = at_first_item();
    let _ = cursor.parent().unwrap();
    let ul = cursor.delete_first_child().unwrap();
    assert_eq!(ul.children().len(), 1);
    assert_eq!(ul.children()[0].children()[0].text(), Some("e"));

    let _ = cursor.first_child().unwrap();
    let _ = cursor.first_child().unwrap();
    assert_eq!(cursor.delete_first_child().unwrap_err(), CursorError::NoChildren);
}

#[test]
fn test_unwrap_first_child() {
    let mut cursor = cursor(
        r#"<div xmlns="http://www.w3.org/1999/xhtml"><div><p>x</p><p>y</p></div><p>z</p></div>"#,
    );
    let root = cursor.unwrap_first_child().unwrap();
    assert_eq!(names(&root), vec![Some("p"), Some("p"), Some("p")]);
    assert_eq!(cursor.depth(), 0);
}

#[test]
fn test_unwrap_first_child_mixing_kinds_fails() {
    let mut cursor = cursor(DOCUMENT);
    let before = cursor.tree();
    // the first p holds inline content, its siblings are blocks
    assert_eq!(
        cursor.unwrap_first_child().unwrap_err(),
        CursorError::Structure(StructureError::MixedChildren)
    );
    assert!(cursor.tree().same(&before));
}

#[test]
fn test_unwrap_next_sibling_with_text_makes_it_anonymous() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let _ = cursor.next_sibling().unwrap();
    let b = cursor.first_child().unwrap();
    let current = cursor.unwrap_next_sibling().unwrap();
    assert!(current.same(&b));
    assert_eq!(cursor.depth(), 2);
    let p = cursor.parent().unwrap();
    assert_eq!(p.children().len(), 2);
    assert!(p.children()[1].is_anonymous());
    assert_eq!(p.children()[1].text(), Some("c"));

    let _ = cursor.first_child().unwrap();
    let _ = cursor.next_sibling().unwrap();
    assert_eq!(cursor.unwrap_next_sibling().unwrap_err(), CursorError::NoNextSibling);
}

#[test]
fn test_unwrap_parent() {
    let mut cursor = at_first_item();
    let li = cursor.current();
    let current = cursor.unwrap_parent().unwrap();
    assert!(current.same(&li));
    assert_eq!(cursor.depth(), 1);
    assert_eq!(names(&cursor.tree()), vec![Some("p"), Some("p"), Some("li"), Some("li")]);
    assert_eq!(cursor.next_sibling().unwrap().children()[0].text(), Some("e"));
}

#[test]
fn test_unwrap_parent_preconditions() {
    let mut cursor = cursor(DOCUMENT);
    assert_eq!(cursor.unwrap_parent().unwrap_err(), CursorError::NoParent);
    let _ = cursor.first_child().unwrap();
    assert_eq!(cursor.unwrap_parent().unwrap_err(), CursorError::UnwrapRoot);
}

// ========== wrapping ==========

#[test]
fn test_wrap_current_descends_into_wrapper() {
    let mut cursor = cursor(DOCUMENT);
    let p = cursor.first_child().unwrap();
    let current = cursor.wrap_current(Some(QualName::html("section")), Attributes::new()).unwrap();
    assert!(current.same(&p));
    assert_eq!(cursor.depth(), 2);
    let section = cursor.parent().unwrap();
    assert_eq!(local(&section), Some("section"));
    assert!(section.is_block());
    assert_eq!(names(&cursor.tree()), vec![Some("section"), Some("p"), Some("ul")]);
}

#[test]
fn test_wrap_inline_gets_inline_wrapper() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_descendant(|node| local(node) == Some("em")).unwrap();
    let _ = cursor.wrap_current(Some(QualName::html("span")), Attributes::new()).unwrap();
    let span = cursor.parent().unwrap();
    assert!(span.is_inline());
}

#[test]
fn test_wrap_current_anonymous_next_to_anonymous_fails() {
    let mut cursor = cursor(r#"<div xmlns="http://www.w3.org/1999/xhtml">a<p>b</p>c</div>"#);
    let _ = cursor.first_child().unwrap();
    let _ = cursor.next_sibling().unwrap();
    assert_eq!(
        cursor.wrap_current(None, Attributes::new()).unwrap_err(),
        CursorError::Structure(StructureError::AdjacentAnonymousBlocks)
    );
}

#[test]
fn test_wrap_first_children() {
    let mut cursor = cursor(DOCUMENT);
    let root = cursor
        .wrap_first_children(2, Some(QualName::html("div")), Attributes::new())
        .unwrap();
    assert_eq!(cursor.depth(), 0);
    assert_eq!(names(&root), vec![Some("div"), Some("ul")]);
    assert_eq!(names(&root.children()[0]), vec![Some("p"), Some("p")]);

    assert_eq!(
        cursor.wrap_first_children(3, None, Attributes::new()).unwrap_err(),
        CursorError::NotEnoughChildren { requested: 3 }
    );
    assert_eq!(
        cursor.wrap_first_children(0, None, Attributes::new()).unwrap_err(),
        CursorError::NotEnoughChildren { requested: 0 }
    );
}

#[test]
fn test_wrap_children() {
    let mut cursor = at_first_item();
    let _ = cursor.parent().unwrap();
    let ul = cursor.wrap_children(None, Attributes::new()).unwrap();
    assert_eq!(ul.children().len(), 1);
    assert!(ul.children()[0].is_anonymous());
    assert_eq!(ul.children()[0].children().len(), 2);

    let _ = cursor.first_descendant(|node| node.text() == Some("d")).unwrap();
    assert_eq!(cursor.wrap_children(None, Attributes::new()).unwrap_err(), CursorError::NoChildren);
}

#[test]
fn test_wrap_next_siblings() {
    let mut cursor = cursor(DOCUMENT);
    let p = cursor.first_child().unwrap();
    let current = cursor.wrap_next_siblings(1, None, Attributes::new()).unwrap();
    assert!(current.same(&p));
    assert_eq!(cursor.depth(), 1);
    assert_eq!(names(&cursor.tree()), vec![Some("p"), None, Some("ul")]);

    assert_eq!(
        cursor.wrap_next_siblings(3, None, Attributes::new()).unwrap_err(),
        CursorError::NotEnoughSiblings { requested: 3 }
    );
    let _ = cursor.root();
    assert_eq!(
        cursor.wrap_next_siblings(1, None, Attributes::new()).unwrap_err(),
        CursorError::NoParent
    );
}

// ========== persistence and sub-cursors ==========

#[test]
fn test_edits_leave_earlier_trees_alone() {
    let mut cursor = at_first_item();
    let before = cursor.tree();
    let snapshot = cursor.clone();
    let _ = cursor.unwrap_parent().unwrap();
    assert_eq!(names(&before), vec![Some("p"), Some("p"), Some("ul")]);
    assert!(snapshot.tree().same(&before));
    assert_eq!(snapshot.depth(), 2);
    assert!(!cursor.tree().same(&before));
}

#[test]
fn test_clone_moves_independently() {
    let mut cursor = cursor(DOCUMENT);
    let _ = cursor.first_child().unwrap();
    let mut other = cursor.clone();
    let _ = other.next_sibling().unwrap();
    assert_eq!(cursor.current().children()[0].text(), Some("a"));
    assert_eq!(other.current().children()[0].text(), Some("b"));
}

#[test]
fn test_sub_tree_edits_reach_parent_cursor() {
    let mut outer = cursor(DOCUMENT);
    let _ = outer.first_child().unwrap();
    let _ = outer.next_sibling().unwrap();
    let mut inner = outer.sub_tree();
    assert!(inner.tree().same(&outer.current()));
    assert_eq!(inner.depth(), 0);

    let _ = inner.first_child().unwrap();
    let _ = inner.unwrap_next_sibling().unwrap();
    assert!(inner.tree().same(&outer.current()));
    assert_eq!(outer.depth(), 1);
    assert!(outer.current().children().iter().all(BoxNode::is_anonymous));
    assert!(outer.tree().children()[1].same(&outer.current()));
}

#[test]
fn test_nested_sub_trees_propagate_to_the_top() {
    let mut outer = at_first_item();
    let _ = outer.parent().unwrap();
    let mut middle = outer.sub_tree();
    let _ = middle.first_child().unwrap();
    let mut inner = middle.sub_tree();
    let _ = inner.rename_current(Some(QualName::html("section")), Attributes::new()).unwrap();
    let tree = outer.tree();
    let ul = &tree.children()[2];
    assert_eq!(names(ul), vec![Some("section"), Some("li")]);
    assert!(middle.current().same(&inner.tree()));
}

#[test]
fn test_sub_tree_after_parent_moved_fails() {
    let mut outer = cursor(DOCUMENT);
    let _ = outer.first_child().unwrap();
    let mut inner = outer.sub_tree();
    let _ = outer.next_sibling().unwrap();
    let before = outer.tree();
    assert_eq!(inner.mark_current_for_removal().unwrap_err(), CursorError::ConcurrentModification);
    assert!(outer.tree().same(&before));
    assert_eq!(inner.current().rendering(), Rendering::Default);
}
