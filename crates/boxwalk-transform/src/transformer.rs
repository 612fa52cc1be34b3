use boxwalk_dom::{Attributes, QualName};
use boxwalk_tree::{BoxCursor, BoxNode};

use crate::error::TransformError;
use crate::fragment::Fragment;
use crate::primitives::move_to_range;
use crate::transformations;

/// Applies transformations to a box tree one fragment at a time.
///
/// Every step works on a copy of the current tree and only replaces it when
/// the whole transformation succeeded, so a failed step leaves the tree as
/// it was and the chain can go on.
///
/// ```ignore
/// let mut transformer = Transformer::new(root);
/// transformer
///     .move_to(Fragment::blocks(0, 3)?)
///     .transform_table(true)?
///     .move_to(Fragment::block(3))
///     .markup_heading(&QualName::html("h1"))?;
/// let result = transformer.get();
/// ```
#[derive(Debug, Clone)]
pub struct Transformer {
    root: BoxNode,
    fragment: Option<Fragment>,
}

impl Transformer {
    /// A transformer over the tree rooted at `root`, with no fragment
    /// selected yet.
    #[must_use]
    pub const fn new(root: BoxNode) -> Self {
        Self { root, fragment: None }
    }

    /// The tree with every successful step applied.
    #[must_use]
    pub fn get(&self) -> BoxNode {
        self.root.clone()
    }

    /// Select the fragment the following steps work on.
    pub const fn move_to(&mut self, fragment: Fragment) -> &mut Self {
        self.fragment = Some(fragment);
        self
    }

    fn apply(
        &mut self,
        step: impl FnOnce(&mut BoxCursor, &Fragment) -> Result<(), TransformError>,
    ) -> Result<&mut Self, TransformError> {
        let fragment = self
            .fragment
            .ok_or(TransformError::CanNotPerform("no fragment selected"))?;
        let mut cursor = BoxCursor::new(self.root.clone());
        move_to_range(&mut cursor, &fragment)?;
        step(&mut cursor, &fragment)?;
        self.root = cursor.tree();
        Ok(self)
    }

    /// See [`transformations::transform_table`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn transform_table(&mut self, single_row: bool) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::transform_table(cursor, fragment.size(), single_row))
    }

    /// See [`transformations::markup_heading`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn markup_heading(&mut self, heading: &QualName) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::markup_heading(cursor, fragment.size(), heading))
    }

    /// See [`transformations::remove_image`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn remove_image(&mut self) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::remove_image(cursor, fragment.size()))
    }

    /// See [`transformations::convert_to_list`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn convert_to_list(
        &mut self,
        list: &QualName,
        list_attributes: Attributes,
        item: &QualName,
    ) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| {
            transformations::convert_to_list(cursor, fragment.size(), list, list_attributes, item)
        })
    }

    /// See [`transformations::convert_to_poem`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn convert_to_poem(&mut self) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::convert_to_poem(cursor, fragment.size()))
    }

    /// See [`transformations::transform_nav_list`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn transform_nav_list(&mut self) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::transform_nav_list(cursor, fragment.size()))
    }

    /// See [`transformations::wrap_list`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn wrap_list(&mut self, pre_content_blocks: usize, wrapper: &QualName) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| {
            transformations::wrap_list(cursor, fragment.size(), pre_content_blocks, wrapper)
        })
    }

    /// See [`transformations::wrap_list_in_previous`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn wrap_list_in_previous(&mut self) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::wrap_list_in_previous(cursor, fragment.size()))
    }

    /// See [`transformations::wrap_in_figure`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn wrap_in_figure(&mut self, caption_blocks: usize, caption_before: bool) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| {
            transformations::wrap_in_figure(cursor, fragment.size(), caption_blocks, caption_before)
        })
    }

    /// See [`transformations::remove_hidden_box`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn remove_hidden_box(&mut self) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::remove_hidden_box(cursor, fragment.size()))
    }

    /// See [`transformations::markup_page_break`].
    ///
    /// # Errors
    ///
    /// The step's [`TransformError`]; the tree is left unchanged.
    pub fn markup_page_break(&mut self) -> Result<&mut Self, TransformError> {
        self.apply(|cursor, fragment| transformations::markup_page_break(cursor, fragment.size()))
    }
}
