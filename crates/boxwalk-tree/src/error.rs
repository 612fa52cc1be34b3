use thiserror::Error;

/// A box tree that would break one of the structural invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Block and inline boxes can not be siblings.
    #[error("block and inline boxes can not be siblings")]
    MixedChildren,
    /// Two anonymous block boxes can not be adjacent.
    #[error("two anonymous block boxes can not be adjacent")]
    AdjacentAnonymousBlocks,
    /// A block box can not be a descendant of an inline box.
    #[error("a block box can not be a descendant of an inline box")]
    BlockInInline,
}

/// A cursor edit whose preconditions do not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The current box has no children to work on.
    #[error("there are no children")]
    NoChildren,
    /// The current box is the last of its siblings.
    #[error("there is no next sibling")]
    NoNextSibling,
    /// The current box is the cursor's root.
    #[error("there is no parent")]
    NoParent,
    /// The parent of the current box is the cursor's root.
    #[error("root can not be unwrapped")]
    UnwrapRoot,
    /// Fewer children than requested.
    #[error("there are no {requested} children")]
    NotEnoughChildren {
        /// How many were asked for.
        requested: usize,
    },
    /// Fewer following siblings than requested.
    #[error("there are no {requested} following siblings")]
    NotEnoughSiblings {
        /// How many were asked for.
        requested: usize,
    },
    /// The edit produced an invalid tree.
    #[error(transparent)]
    Structure(#[from] StructureError),
    /// A sub-cursor was edited after its parent cursor moved off the
    /// sub-cursor's root, or while the parent cursor was in use.
    #[error("the parent cursor was modified after this sub-cursor was created")]
    ConcurrentModification,
}
