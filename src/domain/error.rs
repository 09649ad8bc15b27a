use thiserror::Error;

/// Error taxonomy for the listing core.
///
/// Every failure is scoped to a single call; nothing here is fatal to the
/// process. `Transient` failures may succeed if the same trigger is retried.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("transient i/o failure: {0}")]
    Transient(String),
}

impl ListError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ListError::InvalidArgument(message.into())
    }

    pub fn transient(message: impl Into<String>) -> Self {
        ListError::Transient(message.into())
    }

    /// Whether the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, ListError::Transient(_))
    }
}

pub type ListResult<T> = Result<T, ListError>;
