//! Store Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Store command failed: {message}")]
    Command { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// True when the failure means the store could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Result type for store primitives
pub type StoreResult<T> = Result<T, StoreError>;
