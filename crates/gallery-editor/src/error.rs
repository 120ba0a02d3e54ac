use gallery_core::ObjectId;
use thiserror::Error;

/// A rejected editor operation. Nothing here is fatal: the canvas is left
/// untouched and the caller reports the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),
    #[error("object id already in use: {0}")]
    DuplicateId(ObjectId),
    #[error("grouping needs at least 2 objects, got {0}")]
    TooFewToGroup(usize),
    #[error("object {0} is not a group")]
    NotAGroup(ObjectId),
    #[error("object {0} is inside a group; only top-level objects can be grouped")]
    NotTopLevel(ObjectId),
}

impl EditError {
    /// Validation-class errors come from a bad request (wrong target type,
    /// wrong selection size) rather than a stale id.
    pub fn is_validation(&self) -> bool {
        !matches!(self, EditError::NotFound(_))
    }
}
