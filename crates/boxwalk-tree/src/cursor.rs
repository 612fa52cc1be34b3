//! A persistent cursor over the box tree.
//!
//! [`BoxCursor`] is a zipper: it holds the root of the tree it spans plus
//! the path from that root down to the current box, one sibling list and
//! index per level. Navigation only moves the path. An edit builds a new
//! current box, then copies every box on the path above it with one child
//! replaced, ending in a new root. Boxes are never changed in place, so
//! other cursors and earlier clones keep seeing the tree as it was.
//!
//! Navigation returns `None` and leaves the cursor where it was when the
//! move is impossible. Edits return a [`CursorError`] when their
//! preconditions fail, and leave the cursor untouched.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use boxwalk_css::{CascadedStyle, UsedStyle};
use boxwalk_dom::{Attributes, QualName};

use crate::box_node::{BoxNode, Rendering};
use crate::error::{CursorError, StructureError};

/// One level of the path: the children of the box above, and which of them
/// the path goes through.
#[derive(Clone)]
struct PathFrame {
    siblings: Rc<[BoxNode]>,
    index: usize,
}

/// Where a cursor is. Cloning copies the path, never the boxes.
#[derive(Clone)]
struct Position {
    root: BoxNode,
    path: Vec<PathFrame>,
}

/// Called with the old and new root whenever an edit replaces a
/// sub-cursor's root, to carry the edit into the cursor it came from.
type RootListener = Rc<dyn Fn(&BoxNode, &BoxNode) -> Result<(), CursorError>>;

impl Position {
    fn current(&self) -> BoxNode {
        self.path
            .last()
            .map_or_else(|| self.root.clone(), |frame| frame.siblings[frame.index].clone())
    }

    /// The box at `depth` on the path: 0 is the root, `path.len()` the
    /// current box.
    fn box_at(&self, depth: usize) -> BoxNode {
        match depth.checked_sub(1) {
            None => self.root.clone(),
            Some(level) => {
                let frame = &self.path[level];
                frame.siblings[frame.index].clone()
            }
        }
    }

    fn parent(&mut self) -> Option<BoxNode> {
        let _ = self.path.pop()?;
        Some(self.current())
    }

    fn first_child(&mut self) -> Option<BoxNode> {
        let current = self.current();
        if current.children().is_empty() {
            return None;
        }
        self.path.push(PathFrame {
            siblings: current.shared_children(),
            index: 0,
        });
        Some(self.current())
    }

    fn last_child(&mut self) -> Option<BoxNode> {
        let current = self.current();
        let index = current.children().len().checked_sub(1)?;
        self.path.push(PathFrame {
            siblings: current.shared_children(),
            index,
        });
        Some(self.current())
    }

    fn next_sibling(&mut self) -> Option<BoxNode> {
        let frame = self.path.last_mut()?;
        if frame.index + 1 >= frame.siblings.len() {
            return None;
        }
        frame.index += 1;
        Some(self.current())
    }

    fn previous_sibling(&mut self) -> Option<BoxNode> {
        let frame = self.path.last_mut()?;
        frame.index = frame.index.checked_sub(1)?;
        Some(self.current())
    }

    fn first_following(&mut self) -> Option<BoxNode> {
        let level = (0..self.path.len())
            .rev()
            .find(|&level| self.path[level].index + 1 < self.path[level].siblings.len())?;
        self.path.truncate(level + 1);
        self.path[level].index += 1;
        Some(self.current())
    }

    fn first_preceding(&mut self) -> Option<BoxNode> {
        let level = (0..self.path.len()).rev().find(|&level| self.path[level].index > 0)?;
        self.path.truncate(level + 1);
        self.path[level].index -= 1;
        while self.last_child().is_some() {}
        Some(self.current())
    }

    /// Move to the next box in document order without leaving the subtree
    /// of the box at depth `floor`.
    fn next_within(&mut self, floor: usize) -> bool {
        if self.first_child().is_some() {
            return true;
        }
        while self.path.len() > floor {
            if self.next_sibling().is_some() {
                return true;
            }
            let _ = self.path.pop();
        }
        false
    }

    fn first_descendant(&mut self, filter: &dyn Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        let saved = self.path.clone();
        let floor = self.path.len();
        while self.next_within(floor) {
            let current = self.current();
            if filter(&current) {
                return Some(current);
            }
        }
        self.path = saved;
        None
    }

    fn first_following_matching(&mut self, filter: &dyn Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        let saved = self.path.clone();
        while let Some(next) = self.first_following() {
            if filter(&next) {
                return Some(next);
            }
            if let Some(found) = self.first_descendant(filter) {
                return Some(found);
            }
        }
        self.path = saved;
        None
    }

    fn first_preceding_matching(&mut self, filter: &dyn Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        let saved = self.path.clone();
        // The first step never stops on an ancestor of the start box.
        let Some(first) = self.first_preceding() else {
            self.path = saved;
            return None;
        };
        if filter(&first) {
            return Some(first);
        }
        loop {
            let moved = if self.previous_sibling().is_some() {
                while self.last_child().is_some() {}
                true
            } else {
                self.parent().is_some()
            };
            if !moved {
                self.path = saved;
                return None;
            }
            let current = self.current();
            if filter(&current) {
                return Some(current);
            }
        }
    }

    fn first_parent(&mut self, filter: &dyn Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        let depth = (0..self.path.len()).rev().find(|&depth| filter(&self.box_at(depth)))?;
        self.path.truncate(depth);
        Some(self.current())
    }

    /// Replace the box at `depth` with `replacement` and copy every box
    /// above it. Returns the new root and the path down to `depth`.
    fn rebuild(&self, depth: usize, replacement: BoxNode) -> Result<(BoxNode, Vec<PathFrame>), StructureError> {
        let mut path = self.path[..depth].to_vec();
        let mut child = replacement;
        for level in (0..depth).rev() {
            let frame = &mut path[level];
            let mut siblings = frame.siblings.to_vec();
            siblings[frame.index] = child;
            let parent = self.box_at(level).with_children(siblings)?;
            frame.siblings = parent.shared_children();
            child = parent;
        }
        Ok((child, path))
    }

    /// Style for a new wrapper box that will sit at `depth`.
    fn wrapper_style(&self, depth: usize, block: bool) -> Rc<UsedStyle> {
        let container = if depth > 0 {
            Rc::clone(self.box_at(depth - 1).style())
        } else {
            self.root
                .style()
                .parent()
                .cloned()
                .unwrap_or_else(|| UsedStyle::resolve(Rc::new(CascadedStyle::parse("display: block")), None))
        };
        if block {
            UsedStyle::anonymous_block(&container)
        } else {
            UsedStyle::anonymous_inline(&container)
        }
    }
}

/// What unwrapping `node` leaves in its place: its children, or for a box
/// that carries text, an anonymous copy of itself.
fn unwrapped(node: &BoxNode) -> Vec<BoxNode> {
    if node.has_text() {
        vec![node.renamed(None, Attributes::new())]
    } else {
        node.children().to_vec()
    }
}

/// A box around `children`, block or inline as they are.
fn wrapper(
    name: Option<QualName>,
    attributes: Attributes,
    style: Rc<UsedStyle>,
    children: Vec<BoxNode>,
) -> Result<BoxNode, StructureError> {
    if children.first().is_some_and(BoxNode::is_block) {
        BoxNode::block(name, attributes, style, children)
    } else {
        BoxNode::inline(name, attributes, style, children)
    }
}

/// A cursor over a box tree. See the [module docs](self).
pub struct BoxCursor {
    position: Rc<RefCell<Position>>,
    on_root_replaced: Option<RootListener>,
}

impl BoxCursor {
    /// A cursor at `root`.
    #[must_use]
    pub fn new(root: BoxNode) -> Self {
        Self {
            position: Rc::new(RefCell::new(Position { root, path: Vec::new() })),
            on_root_replaced: None,
        }
    }

    /// A cursor whose root is the current box. Edits made through it are
    /// carried into this cursor's tree, as long as this cursor is still on
    /// that box when they happen; otherwise they fail with
    /// [`CursorError::ConcurrentModification`].
    #[must_use]
    pub fn sub_tree(&self) -> Self {
        let outer = Rc::clone(&self.position);
        let outer_listener = self.on_root_replaced.clone();
        let listener: RootListener = Rc::new(move |old_root: &BoxNode, new_root: &BoxNode| {
            let mut position = outer
                .try_borrow_mut()
                .map_err(|_| CursorError::ConcurrentModification)?;
            if !position.current().same(old_root) {
                return Err(CursorError::ConcurrentModification);
            }
            let (root, path) = position.rebuild(position.path.len(), new_root.clone())?;
            if let Some(listener) = &outer_listener {
                listener(&position.root, &root)?;
            }
            position.root = root;
            position.path = path;
            Ok(())
        });
        Self {
            position: Rc::new(RefCell::new(Position {
                root: self.current(),
                path: Vec::new(),
            })),
            on_root_replaced: Some(listener),
        }
    }

    // ===== navigation =====

    /// The box the cursor is on.
    #[must_use]
    pub fn current(&self) -> BoxNode {
        self.position.borrow().current()
    }

    /// The root of the tree the cursor spans, without moving.
    #[must_use]
    pub fn tree(&self) -> BoxNode {
        self.position.borrow().root.clone()
    }

    /// How many levels the current box is below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.position.borrow().path.len()
    }

    /// Move to the root and return it.
    pub fn root(&mut self) -> BoxNode {
        let mut position = self.position.borrow_mut();
        position.path.clear();
        position.root.clone()
    }

    /// Move to the parent box.
    pub fn parent(&mut self) -> Option<BoxNode> {
        self.position.borrow_mut().parent()
    }

    /// Move to the first child box.
    pub fn first_child(&mut self) -> Option<BoxNode> {
        self.position.borrow_mut().first_child()
    }

    /// Move to the next sibling.
    pub fn next_sibling(&mut self) -> Option<BoxNode> {
        self.position.borrow_mut().next_sibling()
    }

    /// Move to the previous sibling.
    pub fn previous_sibling(&mut self) -> Option<BoxNode> {
        self.position.borrow_mut().previous_sibling()
    }

    /// Move to the first box after the current one and its descendants, in
    /// document order: the next sibling of the nearest box on the path that
    /// has one.
    pub fn first_following(&mut self) -> Option<BoxNode> {
        self.position.borrow_mut().first_following()
    }

    /// Move to the last box before the current one in document order that
    /// is not one of its ancestors: the deepest last descendant of the
    /// previous sibling of the nearest box on the path that has one.
    pub fn first_preceding(&mut self) -> Option<BoxNode> {
        self.position.borrow_mut().first_preceding()
    }

    /// Move to the nearest ancestor matching `filter`.
    pub fn first_parent(&mut self, filter: impl Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        self.position.borrow_mut().first_parent(&filter)
    }

    /// Move to the first descendant matching `filter`, in document order.
    pub fn first_descendant(&mut self, filter: impl Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        self.position.borrow_mut().first_descendant(&filter)
    }

    /// Move to the first box after the current one and its descendants
    /// matching `filter`, in document order.
    pub fn first_following_matching(&mut self, filter: impl Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        self.position.borrow_mut().first_following_matching(&filter)
    }

    /// Move to the nearest box before the current one in document order
    /// matching `filter`. The search starts at [`first_preceding`] and walks
    /// backwards from there, parents included, so an ancestor of the current
    /// box is only found if it is also an ancestor of that first preceding
    /// box. Nothing is found when no box precedes the current one.
    ///
    /// [`first_preceding`]: Self::first_preceding
    pub fn first_preceding_matching(&mut self, filter: impl Fn(&BoxNode) -> bool) -> Option<BoxNode> {
        self.position.borrow_mut().first_preceding_matching(&filter)
    }

    // ===== edits =====

    /// Replace the box at `depth` with `replacement`, propagate the new root
    /// and leave the cursor at `depth`, or one level further down at child
    /// `descend` of the replacement.
    fn commit(&mut self, depth: usize, replacement: BoxNode, descend: Option<usize>) -> Result<BoxNode, CursorError> {
        let mut position = self
            .position
            .try_borrow_mut()
            .map_err(|_| CursorError::ConcurrentModification)?;
        let (root, mut path) = position.rebuild(depth, replacement.clone())?;
        if let Some(index) = descend {
            path.push(PathFrame {
                siblings: replacement.shared_children(),
                index,
            });
        }
        if let Some(listener) = &self.on_root_replaced {
            listener(&position.root, &root)?;
        }
        position.root = root;
        position.path = path;
        Ok(position.current())
    }

    fn snapshot(&self) -> Position {
        self.position.borrow().clone()
    }

    /// Give the current box another name and attributes. `None` makes it
    /// anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Structure`] if an anonymous block would end
    /// up next to another one.
    pub fn rename_current(&mut self, name: Option<QualName>, attributes: Attributes) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let renamed = position.current().renamed(name, attributes);
        self.commit(position.path.len(), renamed, None)
    }

    /// Ask output writers to leave the current element out where it adds
    /// nothing.
    ///
    /// # Errors
    ///
    /// Only [`CursorError::ConcurrentModification`] for a stale sub-cursor.
    pub fn mark_current_for_unwrap(&mut self) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let marked = position.current().with_rendering(Rendering::PreferUnwrap);
        self.commit(position.path.len(), marked, None)
    }

    /// Ask output writers to leave the current box and its subtree out.
    ///
    /// # Errors
    ///
    /// Only [`CursorError::ConcurrentModification`] for a stale sub-cursor.
    pub fn mark_current_for_removal(&mut self) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let marked = position.current().with_rendering(Rendering::Skip);
        self.commit(position.path.len(), marked, None)
    }

    /// Remove the first child of the current box.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoChildren`] if there is none.
    pub fn delete_first_child(&mut self) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let current = position.current();
        let Some((_, rest)) = current.children().split_first() else {
            return Err(CursorError::NoChildren);
        };
        let updated = current.with_children(rest.to_vec())?;
        self.commit(position.path.len(), updated, None)
    }

    /// Replace the first child of the current box by its children. A child
    /// carrying text becomes anonymous instead.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoChildren`] if there is none, or
    /// [`CursorError::Structure`] if the result mixes block and inline boxes.
    pub fn unwrap_first_child(&mut self) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let current = position.current();
        let Some((first, rest)) = current.children().split_first() else {
            return Err(CursorError::NoChildren);
        };
        let mut children = unwrapped(first);
        children.extend_from_slice(rest);
        let updated = current.with_children(children)?;
        self.commit(position.path.len(), updated, None)
    }

    /// Replace the next sibling by its children, as
    /// [`unwrap_first_child`](Self::unwrap_first_child) does. The cursor
    /// stays on the current box.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoNextSibling`] if the current box is the last one.
    pub fn unwrap_next_sibling(&mut self) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let depth = position.path.len();
        let Some(frame) = position.path.last() else {
            return Err(CursorError::NoNextSibling);
        };
        let index = frame.index;
        let Some(next) = frame.siblings.get(index + 1) else {
            return Err(CursorError::NoNextSibling);
        };
        let mut siblings = frame.siblings[..=index].to_vec();
        siblings.extend(unwrapped(next));
        siblings.extend_from_slice(&frame.siblings[index + 2..]);
        let parent = position.box_at(depth - 1).with_children(siblings)?;
        self.commit(depth - 1, parent, Some(index))
    }

    /// Replace the parent of the current box by its children. The cursor
    /// stays on the current box.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoParent`] at the root, [`CursorError::UnwrapRoot`]
    /// when the parent is the root.
    pub fn unwrap_parent(&mut self) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let depth = position.path.len();
        match depth {
            0 => return Err(CursorError::NoParent),
            1 => return Err(CursorError::UnwrapRoot),
            _ => {}
        }
        let index = position.path[depth - 1].index;
        let outer = &position.path[depth - 2];
        let parent = position.box_at(depth - 1);
        let mut children = outer.siblings[..outer.index].to_vec();
        children.extend_from_slice(parent.children());
        children.extend_from_slice(&outer.siblings[outer.index + 1..]);
        let grandparent = position.box_at(depth - 2).with_children(children)?;
        self.commit(depth - 2, grandparent, Some(outer.index + index))
    }

    /// Wrap the current box in a new box of the same kind, anonymous unless
    /// `name` is given. The cursor stays on the current box, now one level
    /// deeper.
    ///
    /// # Errors
    ///
    /// [`CursorError::Structure`] if an anonymous wrapper would end up next
    /// to another anonymous block.
    pub fn wrap_current(&mut self, name: Option<QualName>, attributes: Attributes) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let depth = position.path.len();
        let current = position.current();
        let style = position.wrapper_style(depth, current.is_block());
        let wrapped = wrapper(name, attributes, style, vec![current])?;
        self.commit(depth, wrapped, Some(0))
    }

    /// Wrap all children of the current box in one new box.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoChildren`] if there are none.
    pub fn wrap_children(&mut self, name: Option<QualName>, attributes: Attributes) -> Result<BoxNode, CursorError> {
        let count = self.current().children().len();
        if count == 0 {
            return Err(CursorError::NoChildren);
        }
        self.wrap_first_children(count, name, attributes)
    }

    /// Wrap the first `count` children of the current box in one new box.
    /// The cursor stays on the current box.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoChildren`] or [`CursorError::NotEnoughChildren`].
    pub fn wrap_first_children(
        &mut self,
        count: usize,
        name: Option<QualName>,
        attributes: Attributes,
    ) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let depth = position.path.len();
        let current = position.current();
        let children = current.children();
        if children.is_empty() {
            return Err(CursorError::NoChildren);
        }
        if count == 0 || count > children.len() {
            return Err(CursorError::NotEnoughChildren { requested: count });
        }
        let style = position.wrapper_style(depth + 1, children[0].is_block());
        let mut updated = vec![wrapper(name, attributes, style, children[..count].to_vec())?];
        updated.extend_from_slice(&children[count..]);
        let updated = current.with_children(updated)?;
        self.commit(depth, updated, None)
    }

    /// Wrap the `count` siblings following the current box in one new box.
    /// The cursor stays on the current box.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoParent`] at the root, or
    /// [`CursorError::NotEnoughSiblings`].
    pub fn wrap_next_siblings(
        &mut self,
        count: usize,
        name: Option<QualName>,
        attributes: Attributes,
    ) -> Result<BoxNode, CursorError> {
        let position = self.snapshot();
        let depth = position.path.len();
        let Some(frame) = position.path.last() else {
            return Err(CursorError::NoParent);
        };
        let first = frame.index + 1;
        if count == 0 || first + count > frame.siblings.len() {
            return Err(CursorError::NotEnoughSiblings { requested: count });
        }
        let style = position.wrapper_style(depth, frame.siblings[first].is_block());
        let mut siblings = frame.siblings[..first].to_vec();
        siblings.push(wrapper(name, attributes, style, frame.siblings[first..first + count].to_vec())?);
        siblings.extend_from_slice(&frame.siblings[first + count..]);
        let parent = position.box_at(depth - 1).with_children(siblings)?;
        self.commit(depth - 1, parent, Some(frame.index))
    }
}

/// An independent cursor at the same position. Edits through either one do
/// not move the other. A clone of a sub-cursor still carries its edits into
/// the cursor the original came from.
impl Clone for BoxCursor {
    fn clone(&self) -> Self {
        Self {
            position: Rc::new(RefCell::new(self.snapshot())),
            on_root_replaced: self.on_root_replaced.clone(),
        }
    }
}

impl fmt::Debug for BoxCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxCursor")
            .field("depth", &self.depth())
            .field("current", &self.current())
            .field("sub_tree", &self.on_root_replaced.is_some())
            .finish()
    }
}
