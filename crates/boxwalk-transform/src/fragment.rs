use std::fmt;

use crate::error::TransformError;

/// A run of blocks, or of inline units within one block, addressed by
/// position in document order.
///
/// Blocks are counted as boxes with inline content only. Inline units are
/// text boxes and replaced elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    start_block_index: usize,
    start_inline_index: Option<usize>,
    size: usize,
}

impl Fragment {
    /// `size` blocks, or inline units when `start_inline_index` is given,
    /// starting at block `start_block_index`.
    ///
    /// # Errors
    ///
    /// [`TransformError::EmptyFragment`] if `size` is 0.
    pub const fn new(
        start_block_index: usize,
        start_inline_index: Option<usize>,
        size: usize,
    ) -> Result<Self, TransformError> {
        if size == 0 {
            return Err(TransformError::EmptyFragment);
        }
        Ok(Self {
            start_block_index,
            start_inline_index,
            size,
        })
    }

    /// The single block at `index`.
    #[must_use]
    pub const fn block(index: usize) -> Self {
        Self {
            start_block_index: index,
            start_inline_index: None,
            size: 1,
        }
    }

    /// `size` blocks from block `start`.
    ///
    /// # Errors
    ///
    /// [`TransformError::EmptyFragment`] if `size` is 0.
    pub const fn blocks(start: usize, size: usize) -> Result<Self, TransformError> {
        Self::new(start, None, size)
    }

    /// 0-based index of the first block.
    #[must_use]
    pub const fn start_block_index(&self) -> usize {
        self.start_block_index
    }

    /// 0-based index of the first inline unit within the first block.
    #[must_use]
    pub const fn start_inline_index(&self) -> Option<usize> {
        self.start_inline_index
    }

    /// Number of blocks or inline units.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start_inline_index {
            Some(inline) => write!(f, "block {} inline {} (+{})", self.start_block_index, inline, self.size),
            None => write!(f, "block {} (+{})", self.start_block_index, self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fragment_rejected() {
        assert_eq!(Fragment::new(0, None, 0), Err(TransformError::EmptyFragment));
        assert_eq!(Fragment::blocks(3, 0), Err(TransformError::EmptyFragment));
    }

    #[test]
    fn test_display() {
        assert_eq!(Fragment::block(2).to_string(), "block 2 (+1)");
        assert_eq!(Fragment::new(1, Some(0), 1).unwrap().to_string(), "block 1 inline 0 (+1)");
    }
}
