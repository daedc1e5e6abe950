//! Queue Error Types

use crate::core::error_handling::ContextualError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Invalid {kind} identifier '{value}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid message TTL: {reason}")]
    InvalidTtl { reason: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl QueueError {
    pub fn invalid_identifier(kind: &'static str, value: &str, reason: String) -> Self {
        Self::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason,
        }
    }

    /// True when the store could not be reached
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

impl From<StoreError> for QueueError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable { message } => Self::StoreUnavailable { message },
            StoreError::Command { message } => Self::OperationFailed { message },
        }
    }
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::InvalidTtl { .. } | Self::Config { .. }
        )
    }

    fn user_message(&self) -> Option<String> {
        match self {
            // Full text, so the user learns which identifier was rejected
            Self::InvalidIdentifier { .. } => Some(self.to_string()),
            Self::InvalidTtl { reason } => Some(reason.clone()),
            Self::Config { message } => Some(message.clone()),
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
