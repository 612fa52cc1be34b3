//! The transformations. Each one starts with the cursor on the first block
//! (or inline unit) of its fragment, checks that the boxes around it have
//! the expected structure, and edits them. The cursor position afterwards
//! is unspecified.

use boxwalk_css::{Display, UsedVisibility};
use boxwalk_dom::{Attributes, QualName};
use boxwalk_tree::{BoxCursor, BoxNode};

use crate::error::{TransformError, ensure};
use crate::primitives::{
    count, is_block_leaf, is_html, move_n_blocks, move_n_blocks_back, remove_em_in_all_em_box, unwrap_all,
    wrap_if_needed,
};

/// Emphasis that means nothing once it covers a whole heading or caption.
const EMPHASIS: [&str; 3] = ["strong", "em", "small"];

fn display(cursor: &BoxCursor) -> Display {
    cursor.current().style().display()
}

fn is_hidden(node: &BoxNode) -> bool {
    node.style().visibility() == UsedVisibility::Hidden
}

fn is_link(node: &BoxNode) -> bool {
    is_html(node, "a") && node.attributes().get_local("href").is_some()
}

fn is_div_or_p(node: &BoxNode) -> bool {
    is_html(node, "div") || is_html(node, "p")
}

/// Rename the current box to the XHTML element `local`, without attributes.
fn rename(cursor: &mut BoxCursor, local: &str) -> Result<(), TransformError> {
    let _ = cursor.rename_current(Some(QualName::html(local)), Attributes::new())?;
    Ok(())
}

/// Whether the current box is the only child of its parent.
fn is_only_child(cursor: &BoxCursor) -> bool {
    let mut parent = cursor.clone();
    parent.parent().is_some_and(|parent| parent.children().len() == 1)
}

fn ensure_block(cursor: &BoxCursor) -> Result<(), TransformError> {
    ensure(is_block_leaf(&cursor.current()), "the fragment does not start at a block")
}

/// Climb to the outermost ancestor that starts with the current box and
/// spans no more than `block_count` blocks, stopping early at one that
/// spans exactly `block_count` and passes `accept`.
fn climb_to_list(
    cursor: &mut BoxCursor,
    block_count: usize,
    accept: impl Fn(&BoxNode) -> bool,
) -> Result<(), TransformError> {
    loop {
        let mut probe = cursor.clone();
        ensure(
            probe.previous_sibling().is_none() && probe.parent().is_some(),
            "no list spans the fragment",
        )?;
        let blocks = count(&probe, is_block_leaf);
        ensure(blocks <= block_count, "no list spans the fragment")?;
        *cursor = probe;
        if blocks == block_count && accept(&cursor.current()) {
            return Ok(());
        }
    }
}

/// Flatten a table whose `block_count` cells make up the fragment into
/// nested `div`s, and drop the table box itself.
///
/// # Errors
///
/// Fails unless the fragment starts at the first cell of the first row and
/// spans the whole table, the table has no header or footer group, and,
/// with `single_row`, the table has one row.
pub fn transform_table(cursor: &mut BoxCursor, block_count: usize, single_row: bool) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    loop {
        ensure(cursor.previous_sibling().is_none(), "the fragment does not start at the first cell")?;
        match display(cursor) {
            Display::TableCell => break,
            Display::Block => return Err(TransformError::CanNotPerform("the fragment is not in a table cell")),
            _ => ensure(cursor.parent().is_some(), "the fragment is not in a table cell")?,
        }
    }
    rename(cursor, "div")?;
    while cursor.next_sibling().is_some() {
        ensure(display(cursor) == Display::TableCell, "a row holds something other than cells")?;
        rename(cursor, "div")?;
    }

    ensure(cursor.parent().is_some(), "the cell has no row")?;
    ensure(display(cursor) == Display::TableRow, "the cell has no row")?;
    rename(cursor, "div")?;
    ensure(cursor.previous_sibling().is_none(), "the fragment does not start at the first row")?;
    if single_row {
        ensure(cursor.next_sibling().is_none(), "the table has more than one row")?;
    } else {
        while cursor.next_sibling().is_some() {
            ensure(display(cursor) == Display::TableRow, "a table holds something other than rows")?;
            rename(cursor, "div")?;
            ensure(cursor.first_child().is_some(), "a row is empty")?;
            loop {
                ensure(display(cursor) == Display::TableCell, "a row holds something other than cells")?;
                rename(cursor, "div")?;
                if cursor.next_sibling().is_none() {
                    break;
                }
            }
            let _ = cursor.parent();
        }
    }

    ensure(cursor.parent().is_some(), "the rows are not in a table")?;
    if display(cursor) == Display::TableRowGroup {
        let mut siblings = cursor.clone();
        ensure(
            siblings.next_sibling().is_none() && siblings.previous_sibling().is_none(),
            "the table has more than one row group",
        )?;
        rename(cursor, "div")?;
        ensure(cursor.parent().is_some(), "the rows are not in a table")?;
    }
    ensure(display(cursor) == Display::Table, "the rows are not in a table")?;
    ensure(
        count(cursor, is_block_leaf) == block_count,
        "the fragment does not span the table",
    )?;
    let _ = cursor.first_child();
    let _ = cursor.unwrap_parent()?;
    Ok(())
}

/// Turn the `block_count` blocks of the fragment into one `heading`
/// element. Emphasis covering the whole heading is removed, and `div`, `p`
/// and `span` inside it become `span`s marked for unwrapping.
///
/// # Errors
///
/// Fails if the blocks do not line up with whole boxes.
pub fn markup_heading(cursor: &mut BoxCursor, block_count: usize, heading: &QualName) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    wrap_if_needed(cursor, block_count)?;
    let _ = cursor.rename_current(Some(heading.clone()), Attributes::new())?;
    for local in EMPHASIS {
        remove_em_in_all_em_box(cursor, &QualName::html(local))?;
    }
    let is_div_or_p_or_span = |node: &BoxNode| is_div_or_p(node) || is_html(node, "span");
    let mut inner = cursor.sub_tree();
    while inner.first_descendant(is_div_or_p_or_span).is_some()
        || inner.first_following_matching(is_div_or_p_or_span).is_some()
    {
        if !is_html(&inner.current(), "span") {
            rename(&mut inner, "span")?;
        }
        let _ = inner.mark_current_for_unwrap()?;
    }
    Ok(())
}

/// Leave out the image the fragment addresses, along with every ancestor
/// it is the only content of.
///
/// # Errors
///
/// Fails unless the fragment is one inline unit and that unit is an `img`.
pub fn remove_image(cursor: &mut BoxCursor, size: usize) -> Result<(), TransformError> {
    ensure(size == 1, "the fragment is more than one image")?;
    let current = cursor.current();
    ensure(
        is_html(&current, "img") && current.is_replaced(),
        "the fragment is not an image",
    )?;
    let _ = cursor.mark_current_for_removal()?;
    while is_only_child(cursor) {
        let _ = cursor.parent();
        let _ = cursor.mark_current_for_removal()?;
    }
    Ok(())
}

/// Turn the `block_count` blocks of the fragment into a `list` element
/// with one `item` per child box. A single block becomes the one item of
/// a new list.
///
/// # Errors
///
/// Fails if the blocks do not line up with whole boxes.
pub fn convert_to_list(
    cursor: &mut BoxCursor,
    block_count: usize,
    list: &QualName,
    list_attributes: Attributes,
    item: &QualName,
) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    wrap_if_needed(cursor, block_count)?;
    if is_block_leaf(&cursor.current()) {
        let _ = cursor.wrap_current(Some(list.clone()), list_attributes)?;
    } else {
        let _ = cursor.rename_current(Some(list.clone()), list_attributes)?;
        let _ = cursor.first_child();
    }
    loop {
        let _ = cursor.rename_current(Some(item.clone()), Attributes::new())?;
        if cursor.next_sibling().is_none() {
            return Ok(());
        }
    }
}

/// [`convert_to_list`] into a `div` marked as a poem, with a `p` per line.
///
/// # Errors
///
/// As [`convert_to_list`].
pub fn convert_to_poem(cursor: &mut BoxCursor, block_count: usize) -> Result<(), TransformError> {
    let poem = std::iter::once((QualName::epub("type"), "z3998:poem".to_owned())).collect();
    convert_to_list(cursor, block_count, &QualName::html("div"), poem, &QualName::html("p"))
}

/// Bring the `ol` spanning the fragment into the shape of an EPUB
/// navigation list: every `li` holds one `a` (or a `span` when it has no
/// link), optionally followed by a nested `ol`. Links inside a label are
/// merged into it, and `div` and `p` inside the list are marked for
/// unwrapping.
///
/// # Errors
///
/// Fails if no `ol` spans exactly the fragment, or an item has no label or
/// a label without a link and without a nested list.
pub fn transform_nav_list(cursor: &mut BoxCursor, block_count: usize) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    climb_to_list(cursor, block_count, |node| is_html(node, "ol"))?;
    nav_list(cursor)?;
    let mut toc = cursor.sub_tree();
    while toc.first_descendant(is_div_or_p).is_some() || toc.first_following_matching(is_div_or_p).is_some() {
        rename(&mut toc, "span")?;
        let _ = toc.mark_current_for_unwrap()?;
    }
    Ok(())
}

/// Process the items of the list the cursor is on, and return to it.
fn nav_list(list: &mut BoxCursor) -> Result<(), TransformError> {
    ensure(list.first_child().is_some(), "a navigation list is empty")?;
    loop {
        ensure(is_html(&list.current(), "li"), "a navigation list holds something other than li")?;
        nav_list_item(list)?;
        if list.next_sibling().is_none() {
            break;
        }
    }
    let _ = list.parent();
    Ok(())
}

/// Process the `li` the cursor is on. The cursor ends on it again.
fn nav_list_item(item: &mut BoxCursor) -> Result<(), TransformError> {
    ensure(item.first_child().is_some(), "a list item is empty")?;
    let mut children = 1;
    while item.next_sibling().is_some() {
        children += 1;
    }
    if children == 1 && is_link(&item.current()) {
        let _ = item.parent();
        return Ok(());
    }

    if is_html(&item.current(), "ol") {
        ensure(children > 1, "a list item holds only a nested list")?;
        nav_list(item)?;
        if children == 2 {
            let _ = item.previous_sibling();
            if is_link(&item.current()) {
                let _ = item.parent();
                return Ok(());
            }
        } else {
            let _ = item.parent();
            let _ = item.wrap_first_children(children - 1, Some(QualName::html("span")), Attributes::new())?;
            children = 2;
            let _ = item.first_child();
        }
    } else if children > 1 {
        let _ = item.parent();
        let _ = item.wrap_children(Some(QualName::html("span")), Attributes::new())?;
        children = 1;
        let _ = item.first_child();
    }

    // the cursor is on the label
    let mut label = item.sub_tree();
    if label.first_descendant(is_link).is_none() {
        ensure(children == 2, "a list item has no link and no nested list")?;
        let _ = item.parent();
        return Ok(());
    }
    let link = label.current();
    let href = link.attributes().get_local("href").unwrap_or_default().to_owned();
    let _ = label.root();
    unwrap_all(&mut label, |node| {
        is_html(node, "a") && node.attributes().get_local("href") == Some(href.as_str())
    })?;
    let _ = label.rename_current(link.name().cloned(), link.attributes().clone())?;
    let _ = item.parent();
    Ok(())
}

/// Wrap the list ending the fragment together with the
/// `pre_content_blocks` blocks before it in a `wrapper` element.
///
/// # Errors
///
/// Fails unless the last `block_count - pre_content_blocks` blocks are
/// exactly an `ol` or `ul`, and the blocks before it line up with whole
/// boxes next to it.
pub fn wrap_list(
    cursor: &mut BoxCursor,
    block_count: usize,
    pre_content_blocks: usize,
    wrapper: &QualName,
) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    let list_blocks = block_count
        .checked_sub(pre_content_blocks)
        .ok_or(TransformError::CanNotPerform("the fragment has no list"))?;
    move_n_blocks(cursor, pre_content_blocks)?;
    climb_to_list(cursor, list_blocks, |node| is_html(node, "ol") || is_html(node, "ul"))?;

    let list_has_next_sibling = cursor.next_sibling().is_some();
    if list_has_next_sibling {
        let _ = cursor.previous_sibling();
    }
    let mut children = 1;
    let mut remaining = pre_content_blocks;
    while remaining > 0 {
        ensure(cursor.previous_sibling().is_some(), "the list has too little before it")?;
        children += 1;
        remaining = remaining
            .checked_sub(count(cursor, is_block_leaf))
            .ok_or(TransformError::CanNotPerform("the content before the list does not line up with boxes"))?;
    }

    if cursor.previous_sibling().is_some() {
        let _ = cursor.wrap_next_siblings(children, Some(wrapper.clone()), Attributes::new())?;
        let _ = cursor.next_sibling();
    } else if list_has_next_sibling {
        let _ = cursor.parent();
        let _ = cursor.wrap_first_children(children, Some(wrapper.clone()), Attributes::new())?;
        let _ = cursor.first_child();
    } else {
        ensure(cursor.parent().is_some(), "the list is the whole document")?;
        let current = cursor.current();
        if current.name() != Some(wrapper) {
            if is_html(&current, "div") {
                let _ = cursor.rename_current(Some(wrapper.clone()), Attributes::new())?;
            } else {
                let _ = cursor.wrap_children(Some(wrapper.clone()), Attributes::new())?;
                let _ = cursor.first_child();
            }
        }
    }
    Ok(())
}

/// Move the list ending the fragment into the block before it: the two
/// are wrapped in an element named like that block, which keeps its
/// content as an anonymous box.
///
/// # Errors
///
/// As [`wrap_list`] with one block of pre-content.
pub fn wrap_list_in_previous(cursor: &mut BoxCursor, block_count: usize) -> Result<(), TransformError> {
    wrap_list(cursor, block_count, 1, &QualName::local("_"))?;
    let previous = cursor
        .first_child()
        .ok_or(TransformError::CanNotPerform("the wrapper is empty"))?;
    let _ = cursor.rename_current(None, Attributes::new())?;
    let _ = cursor.parent();
    let _ = cursor.rename_current(previous.name().cloned(), previous.attributes().clone())?;
    Ok(())
}

/// Wrap the `block_count` blocks of the fragment in a `figure`. The first
/// or last `caption_blocks` of them become its `figcaption`; there is no
/// caption when it is 0.
///
/// # Errors
///
/// Fails if the caption does not leave any content, or the blocks do not
/// line up with whole boxes.
pub fn wrap_in_figure(
    cursor: &mut BoxCursor,
    block_count: usize,
    caption_blocks: usize,
    caption_before: bool,
) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    ensure(block_count > caption_blocks, "the figure has no content besides its caption")?;
    let content_blocks = block_count - caption_blocks;
    if caption_blocks > 0 {
        if !caption_before {
            move_n_blocks(cursor, content_blocks)?;
        }
        wrap_if_needed(cursor, caption_blocks)?;
        rename(cursor, "figcaption")?;
        for local in EMPHASIS {
            remove_em_in_all_em_box(cursor, &QualName::html(local))?;
        }
        if !caption_before {
            move_n_blocks_back(cursor, content_blocks)?;
        } else if !is_block_leaf(&cursor.current()) {
            let _ = cursor.first_descendant(is_block_leaf);
        }
    }
    wrap_if_needed(cursor, block_count)?;
    rename(cursor, "figure")?;
    if content_blocks == 1 && caption_blocks > 0 {
        let _ = cursor.first_child();
        if caption_before {
            let _ = cursor.next_sibling();
        }
        if is_div_or_p(&cursor.current()) {
            let _ = cursor.mark_current_for_unwrap()?;
        }
    }
    Ok(())
}

/// Leave out the hidden block the fragment addresses, along with every
/// hidden ancestor it is the only content of.
///
/// # Errors
///
/// Fails unless the fragment is one block and that block and everything
/// in it is hidden.
pub fn remove_hidden_box(cursor: &mut BoxCursor, size: usize) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    ensure(size == 1, "the fragment is more than one block")?;
    ensure(is_hidden(&cursor.current()), "the block is visible")?;
    let mut inner = BoxCursor::new(cursor.current());
    while inner.first_child().is_some() || inner.first_following().is_some() {
        ensure(is_hidden(&inner.current()), "the block has visible content")?;
    }
    let _ = cursor.mark_current_for_removal()?;
    while is_only_child(cursor) {
        let _ = cursor.parent();
        if !is_hidden(&cursor.current()) {
            break;
        }
        let _ = cursor.mark_current_for_removal()?;
    }
    Ok(())
}

/// Turn the block the fragment addresses into an EPUB page break marker.
///
/// # Errors
///
/// Fails unless the fragment is one block.
pub fn markup_page_break(cursor: &mut BoxCursor, size: usize) -> Result<(), TransformError> {
    ensure_block(cursor)?;
    ensure(size == 1, "the fragment is more than one block")?;
    let pagebreak = std::iter::once((QualName::epub("type"), "pagebreak".to_owned())).collect();
    let _ = cursor.rename_current(Some(QualName::html("div")), pagebreak)?;
    Ok(())
}
