/// Errors from resource store operations.
///
/// Each variant carries the human-readable message shown to API clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Unknown id, unknown parent, or unknown resource type.
    #[error("{0}")]
    NotFound(String),

    /// Another live resource of the same kind already has this name.
    #[error("{0}")]
    DuplicateResource(String),

    /// The resource still has live children.
    #[error("{0}")]
    DeleteParent(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
