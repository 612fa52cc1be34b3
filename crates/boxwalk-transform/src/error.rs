use boxwalk_tree::CursorError;
use thiserror::Error;

/// Why a transformation was not applied. The tree it was asked to change is
/// left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The addressed boxes do not have the structure the transformation
    /// expects.
    #[error("can not perform transformation: {0}")]
    CanNotPerform(&'static str),
    /// A fragment must span at least one block or inline unit.
    #[error("a fragment spans at least one block")]
    EmptyFragment,
    /// A cursor edit inside the transformation failed.
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

/// Fail with [`TransformError::CanNotPerform`] unless `condition` holds.
pub(crate) const fn ensure(condition: bool, reason: &'static str) -> Result<(), TransformError> {
    if condition {
        Ok(())
    } else {
        Err(TransformError::CanNotPerform(reason))
    }
}
