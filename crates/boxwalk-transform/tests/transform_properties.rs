//! Property tests: the unwrap sweep and transformation steps over random
//! trees.

use std::rc::Rc;

use boxwalk_css::{CascadedStyle, UsedStyle};
use boxwalk_dom::{Attributes, QualName};
use boxwalk_transform::primitives::{is_html, unwrap_all};
use boxwalk_transform::{Fragment, Transformer};
use boxwalk_tree::{BoxCursor, BoxNode};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

fn style(declarations: &str) -> Rc<UsedStyle> {
    UsedStyle::resolve(Rc::new(CascadedStyle::parse(declarations)), None)
}

fn below(g: &mut Gen, n: usize) -> usize {
    usize::arbitrary(g) % n
}

fn inline_box(g: &mut Gen, depth: usize) -> BoxNode {
    let block_style = style("display: block");
    match below(g, 4) {
        0 => BoxNode::anonymous_inline(&block_style, "text".to_owned()),
        1 | 2 if depth > 0 => {
            let name = g.choose(&["em", "strong", "a"]).copied().unwrap_or("em");
            let children = (0..=below(g, 3)).map(|_| inline_box(g, depth - 1)).collect();
            BoxNode::inline(Some(QualName::html(name)), Attributes::new(), style(""), children).unwrap()
        }
        3 => BoxNode::inline_text(Some(QualName::html("em")), Attributes::new(), style(""), "e".to_owned()),
        _ => BoxNode::inline_text(Some(QualName::html("span")), Attributes::new(), style(""), "x".to_owned()),
    }
}

fn block_box(g: &mut Gen, depth: usize) -> BoxNode {
    let name = QualName::html(g.choose(&["div", "p", "ol", "li"]).copied().unwrap_or("div"));
    let own_style = style("display: block");
    let children = if depth == 0 || bool::arbitrary(g) {
        (0..=below(g, 3)).map(|_| inline_box(g, 2)).collect()
    } else {
        let mut children: Vec<BoxNode> = Vec::new();
        for _ in 0..=below(g, 3) {
            let previous_anonymous = children.last().is_some_and(BoxNode::is_anonymous);
            if previous_anonymous || bool::arbitrary(g) {
                children.push(block_box(g, depth - 1));
            } else {
                let inlines = (0..=below(g, 2)).map(|_| inline_box(g, 1)).collect();
                children.push(BoxNode::anonymous_block(&own_style, inlines).unwrap());
            }
        }
        children
    };
    BoxNode::block(Some(name), Attributes::new(), own_style, children).unwrap()
}

#[derive(Clone, Debug)]
struct Tree(BoxNode);

impl Arbitrary for Tree {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(block_box(g, 3))
    }
}

fn any_box(node: &BoxNode, filter: &dyn Fn(&BoxNode) -> bool) -> bool {
    filter(node) || node.children().iter().any(|child| any_box(child, filter))
}

fn well_formed(node: &BoxNode) -> bool {
    let children = node.children();
    let local = if node.is_block() {
        children.windows(2).all(|pair| pair[0].kind() == pair[1].kind())
            && children
                .windows(2)
                .all(|pair| !(pair[0].is_block() && pair[0].is_anonymous() && pair[1].is_block() && pair[1].is_anonymous()))
    } else {
        children.iter().all(BoxNode::is_inline)
    };
    local && children.iter().all(well_formed)
}

/// Run one step, picked by `op`, on `fragment`.
fn step(transformer: &mut Transformer, fragment: Fragment, op: u8) -> bool {
    let _ = transformer.move_to(fragment);
    let result = match op % 11 {
        0 => transformer.transform_table(op % 2 == 0),
        1 => transformer.markup_heading(&QualName::html("h1")),
        2 => transformer.remove_image(),
        3 => transformer.convert_to_list(&QualName::html("ul"), Attributes::new(), &QualName::html("li")),
        4 => transformer.convert_to_poem(),
        5 => transformer.transform_nav_list(),
        6 => transformer.wrap_list(usize::from(op % 3), &QualName::html("section")),
        7 => transformer.wrap_list_in_previous(),
        8 => transformer.wrap_in_figure(usize::from(op % 2), op % 4 < 2),
        9 => transformer.remove_hidden_box(),
        _ => transformer.markup_page_break(),
    };
    result.is_ok()
}

// ========== unwrap sweep ==========

#[quickcheck]
fn prop_unwrap_all_removes_every_match(tree: Tree) -> bool {
    let is_em = |node: &BoxNode| is_html(node, "em");
    let mut cursor = BoxCursor::new(tree.0);
    unwrap_all(&mut cursor, is_em).is_ok() && !any_box(&cursor.tree(), &is_em) && well_formed(&cursor.tree())
}

#[quickcheck]
fn prop_unwrap_all_is_idempotent(tree: Tree) -> bool {
    let is_em = |node: &BoxNode| is_html(node, "em");
    let mut cursor = BoxCursor::new(tree.0);
    if unwrap_all(&mut cursor, is_em).is_err() {
        return false;
    }
    let once = cursor.tree();
    unwrap_all(&mut cursor, is_em).is_ok() && cursor.tree().same(&once)
}

#[quickcheck]
fn prop_unwrap_all_keeps_text(tree: Tree) -> bool {
    fn text(node: &BoxNode, out: &mut String) {
        out.push_str(node.text().unwrap_or_default());
        for child in node.children() {
            text(child, out);
        }
    }
    let mut before = String::new();
    text(&tree.0, &mut before);
    let mut cursor = BoxCursor::new(tree.0);
    let is_strong = |node: &BoxNode| is_html(node, "strong");
    if unwrap_all(&mut cursor, is_strong).is_err() {
        return false;
    }
    let mut after = String::new();
    text(&cursor.tree(), &mut after);
    before == after
}

// ========== steps ==========

#[quickcheck]
fn prop_steps_keep_invariants_or_change_nothing(tree: Tree, steps: Vec<(u8, u8, u8, bool)>) -> bool {
    let mut transformer = Transformer::new(tree.0);
    steps.into_iter().all(|(op, start, size, inline)| {
        let before = transformer.get();
        let inline_index = inline.then_some(usize::from(size % 2));
        let Ok(fragment) = Fragment::new(usize::from(start % 6), inline_index, usize::from(size % 4) + 1) else {
            return false;
        };
        if step(&mut transformer, fragment, op) {
            well_formed(&transformer.get())
        } else {
            transformer.get().same(&before)
        }
    })
}
