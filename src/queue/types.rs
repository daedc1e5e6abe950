//! Type definitions for the queue system

use std::time::Duration;

/// Queue-scoped message identifier allocated by the store's atomic counter
pub type MessageId = u64;

/// Default lifetime of a stored message payload, in seconds
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// How a consume call waits for a message
///
/// The default blocks until a message arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeOptions {
    /// Wait for a message instead of returning immediately on an empty queue
    pub block: bool,
    /// Total wall-clock budget when blocking; zero waits forever
    pub timeout: Duration,
}

impl Default for ConsumeOptions {
    fn default() -> Self {
        Self {
            block: true,
            timeout: Duration::ZERO,
        }
    }
}

impl ConsumeOptions {
    /// Return immediately when nothing is queued
    pub fn non_blocking() -> Self {
        Self {
            block: false,
            timeout: Duration::ZERO,
        }
    }

    /// Wait at most `timeout` in total (zero waits forever)
    pub fn blocking(timeout: Duration) -> Self {
        Self {
            block: true,
            timeout,
        }
    }

    /// Wait until a message arrives
    pub fn forever() -> Self {
        Self::default()
    }
}
