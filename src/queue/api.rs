//! Public API for the queue system
//!
//! External modules should import from here rather than directly from the
//! internal modules. See the module documentation for the key layout and
//! the consume protocol.

// Coordinator and per-consumer sessions
pub use crate::queue::coordinator::QueueCoordinator;
pub use crate::queue::session::ConsumerSession;

// Key derivation
pub use crate::queue::keys::{validate_identifier, KeyBuilder};

// Options and identifiers
pub use crate::queue::types::{ConsumeOptions, MessageId, DEFAULT_TTL_SECONDS};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Store abstraction the coordinator is built on
pub use crate::store::{KeyValueStore, MemoryStore, RedisStore};
