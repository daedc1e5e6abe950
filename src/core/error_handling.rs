//! Error reporting helpers
//!
//! Errors that reach the top of the binary are reported differently depending
//! on who can fix them: a bad queue name or config value is shown to the user
//! as-is, while a store failure gets a short context line with the details at
//! debug level.

/// Errors that can tell user mistakes apart from system failures
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the user can correct the problem (invalid input or configuration)
    fn is_user_actionable(&self) -> bool;

    /// The message to show for user-actionable errors
    fn user_message(&self) -> Option<String>;
}

/// Log a fatal error with a detail level suited to its kind
///
/// # Examples
/// ```rust,no_run
/// # use rpsqueue::core::error_handling::log_error_with_context;
/// # use rpsqueue::queue::QueueError;
/// let err = QueueError::StoreUnavailable { message: "connection refused".to_string() };
/// log_error_with_context(&err, "Publishing message");
/// // Logs: "FATAL: Publishing message", details at debug level
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueError;

    #[test]
    fn test_invalid_identifier_is_user_actionable() {
        let error = QueueError::invalid_identifier(
            "queue",
            "orders.eu",
            "'orders.eu' contains the reserved key separator '.'".to_string(),
        );

        assert!(error.is_user_actionable());
        let message = error.user_message().unwrap();
        assert!(message.contains("orders.eu"));
    }

    #[test]
    fn test_store_unavailable_is_a_system_error() {
        let error = QueueError::StoreUnavailable {
            message: "Connection refused".to_string(),
        };

        assert!(!error.is_user_actionable());
        assert_eq!(error.user_message(), None);

        // Must not panic for either kind
        log_error_with_context(&error, "Publishing message");
        let ttl_error = QueueError::InvalidTtl {
            reason: "Message TTL must be at least 1 second".to_string(),
        };
        log_error_with_context(&ttl_error, "Publishing message");
    }
}
