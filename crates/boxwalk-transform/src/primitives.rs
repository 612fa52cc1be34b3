//! Addressing, counting and the generic wrap/unwrap sweeps the
//! transformations are built from.
//!
//! Every function works on the cursor it is given and reports a structure
//! it can not handle as [`TransformError::CanNotPerform`]. None of them
//! undo partial edits: callers run them on a working cursor and throw it
//! away on failure.

use boxwalk_dom::{Attributes, QualName};
use boxwalk_tree::{BoxCursor, BoxNode};

use crate::error::{TransformError, ensure};
use crate::fragment::Fragment;

/// A block with inline content only. Block indices count these.
#[must_use]
pub fn is_block_leaf(node: &BoxNode) -> bool {
    node.is_block_and_has_no_block_children()
}

/// A text box or a replaced element. Inline indices count these.
#[must_use]
pub fn has_text_or_is_replaced(node: &BoxNode) -> bool {
    node.has_text() || node.is_replaced()
}

/// Whether `node` is the XHTML element `local`.
#[must_use]
pub fn is_html(node: &BoxNode, local: &str) -> bool {
    node.name().is_some_and(|name| name.is_html(local))
}

/// White space as regular expressions know it (`\s`): no-break spaces are
/// content.
fn is_white_space(text: &str) -> bool {
    text.chars()
        .all(|c| matches!(c, ' ' | '\t' | '\n' | '\u{b}' | '\u{c}' | '\r'))
}

/// Number of boxes in the subtree of the current box, the box itself
/// included, that pass `filter`.
#[must_use]
pub fn count(cursor: &BoxCursor, filter: impl Fn(&BoxNode) -> bool) -> usize {
    let mut walker = BoxCursor::new(cursor.current());
    let mut count = usize::from(filter(&walker.current()));
    while walker.first_descendant(&filter).is_some() || walker.first_following_matching(&filter).is_some() {
        count += 1;
    }
    count
}

/// Move from the root to the first block of `fragment`, or to its first
/// inline unit if it has one.
///
/// # Errors
///
/// [`TransformError::CanNotPerform`] if the document has fewer blocks or
/// the block fewer inline units.
pub fn move_to_range(cursor: &mut BoxCursor, fragment: &Fragment) -> Result<(), TransformError> {
    let root = cursor.root();
    if is_block_leaf(&root) {
        ensure(fragment.start_block_index() == 0, "the document is a single block")?;
    } else {
        move_n_blocks(cursor, fragment.start_block_index() + 1)?;
    }
    if let Some(inline_index) = fragment.start_inline_index() {
        ensure(
            inline_index < count(cursor, has_text_or_is_replaced),
            "the block has fewer inline units",
        )?;
        ensure(
            cursor.first_descendant(has_text_or_is_replaced).is_some(),
            "the block has no inline units",
        )?;
        for _ in 0..inline_index {
            ensure(
                cursor.first_following_matching(has_text_or_is_replaced).is_some(),
                "the block has fewer inline units",
            )?;
        }
    }
    Ok(())
}

/// Move `n` blocks forward in document order. A block below the current
/// box counts as the first.
///
/// # Errors
///
/// [`TransformError::CanNotPerform`] if there are not enough blocks.
pub fn move_n_blocks(cursor: &mut BoxCursor, n: usize) -> Result<(), TransformError> {
    if n == 0 {
        return Ok(());
    }
    let mut remaining = n;
    if cursor.first_descendant(is_block_leaf).is_some() {
        remaining -= 1;
    }
    for _ in 0..remaining {
        ensure(
            cursor.first_following_matching(is_block_leaf).is_some(),
            "not enough blocks follow",
        )?;
    }
    Ok(())
}

/// Move `n` blocks backward in document order. A block above the current
/// box counts as the first.
///
/// # Errors
///
/// [`TransformError::CanNotPerform`] if there are not enough blocks.
pub fn move_n_blocks_back(cursor: &mut BoxCursor, n: usize) -> Result<(), TransformError> {
    if n == 0 {
        return Ok(());
    }
    let mut remaining = n;
    if cursor.first_parent(is_block_leaf).is_some() {
        remaining -= 1;
    }
    for _ in 0..remaining {
        ensure(
            cursor.first_preceding_matching(is_block_leaf).is_some(),
            "not enough blocks precede",
        )?;
    }
    Ok(())
}

/// Unwrap every named box in the subtree of the current box that `select`
/// matches, until none is left. Anonymous boxes are never selected. The
/// cursor stays on the subtree root.
///
/// # Errors
///
/// Fails if the subtree root itself matches and has children, or if
/// unwrapping would mix block and inline siblings.
pub fn unwrap_all(cursor: &mut BoxCursor, select: impl Fn(&BoxNode) -> bool) -> Result<(), TransformError> {
    let mut subtree = cursor.sub_tree();
    loop {
        let current = subtree.current();
        if !current.is_anonymous() && select(&current) {
            if subtree.first_child().is_some() {
                let _ = subtree.unwrap_parent()?;
                continue;
            } else if subtree.previous_sibling().is_some() {
                let _ = subtree.unwrap_next_sibling()?;
                if subtree.first_following().is_some() {
                    continue;
                }
                break;
            } else if subtree.parent().is_some() {
                let _ = subtree.unwrap_first_child()?;
            } else {
                break;
            }
        }
        if subtree.first_child().is_none() && subtree.first_following().is_none() {
            break;
        }
    }
    Ok(())
}

/// Leave the cursor on a box spanning exactly `block_count` blocks from the
/// current one: the outermost ancestor that starts with the current block
/// and does not hold too many, or else a new anonymous box around the
/// siblings that make up the count.
///
/// # Errors
///
/// [`TransformError::CanNotPerform`] if the cursor is not on a block, or
/// the sibling boxes do not add up to `block_count` exactly.
pub fn wrap_if_needed(cursor: &mut BoxCursor, block_count: usize) -> Result<(), TransformError> {
    ensure(is_block_leaf(&cursor.current()), "the fragment does not start at a block")?;
    let mut first_box_blocks = 1;
    loop {
        let mut lookahead = cursor.clone();
        if lookahead.previous_sibling().is_some() || lookahead.parent().is_none() {
            break;
        }
        let blocks = count(&lookahead, is_block_leaf);
        if blocks > block_count {
            break;
        }
        *cursor = lookahead;
        first_box_blocks = blocks;
    }
    if first_box_blocks == block_count {
        return Ok(());
    }

    let mut remaining = block_count
        .checked_sub(first_box_blocks)
        .ok_or(TransformError::CanNotPerform("the blocks do not line up with boxes"))?;
    let mut boxes = 1;
    while remaining > 0 {
        ensure(cursor.next_sibling().is_some(), "the fragment runs past its parent")?;
        remaining = remaining
            .checked_sub(count(cursor, is_block_leaf))
            .ok_or(TransformError::CanNotPerform("the blocks do not line up with boxes"))?;
        boxes += 1;
    }
    for _ in 1..boxes {
        let _ = cursor.previous_sibling();
    }
    if cursor.previous_sibling().is_some() {
        let _ = cursor.wrap_next_siblings(boxes, None, Attributes::new())?;
        let _ = cursor.next_sibling();
    } else {
        let _ = cursor.parent();
        let _ = cursor.wrap_first_children(boxes, None, Attributes::new())?;
        let _ = cursor.first_child();
    }
    Ok(())
}

/// Unwrap every `name` element in the current box, but only when all of
/// its text sits inside such elements: a heading set entirely in bold
/// does not need the bold.
///
/// # Errors
///
/// As [`unwrap_all`].
pub fn remove_em_in_all_em_box(cursor: &mut BoxCursor, name: &QualName) -> Result<(), TransformError> {
    let mut walker = BoxCursor::new(cursor.current());
    let all_em = loop {
        let current = walker.current();
        if current.name() != Some(name) {
            if current.text().is_some_and(|text| !is_white_space(text)) {
                break false;
            }
            if walker.first_child().is_some() {
                continue;
            }
        }
        if walker.first_following().is_none() {
            break true;
        }
    };
    if all_em {
        unwrap_all(cursor, |node| node.name() == Some(name))?;
    }
    Ok(())
}
