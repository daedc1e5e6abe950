//! Key-value store abstraction
//!
//! The queue layer never talks to a concrete client directly. It is handed a
//! connected store exposing a small set of primitives (counters, strings with
//! expiry, sets, lists) and builds the whole publish/subscribe protocol on top
//! of them.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`]: in-process store with TTL expiry and blocking pops,
//!   used by the test suites and the `memory` backend of the CLI
//! - [`RedisStore`]: a synchronous Redis connection
//!
//! Connection establishment, authentication and reconnection are the
//! responsibility of whoever builds the store; the queue layer only asks
//! [`KeyValueStore::is_connected`] before acting.

mod error;
mod memory;
mod redis_store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use std::time::Duration;

/// Primitive operations the queue layer requires from a backing store
///
/// All methods take `&self`; implementations are responsible for their own
/// internal synchronisation. Sharing one store between a coordinator and its
/// sessions does not serialise whole queue operations, only individual
/// primitive calls.
pub trait KeyValueStore: Send + Sync {
    /// Liveness check used as the precondition guard before every queue operation
    fn is_connected(&self) -> bool;

    /// Atomically increment `key`, returning the new value (1 for an absent key)
    fn increment(&self, key: &str) -> StoreResult<i64>;

    /// Store `value` under `key`, removing it automatically after `ttl`
    fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Read a string value; `None` for missing or expired keys
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Add `member` to the set at `key` (no-op when already present)
    fn add_to_set(&self, key: &str, member: &str) -> StoreResult<()>;

    /// Remove `member` from the set at `key` (no-op when absent)
    fn remove_from_set(&self, key: &str, member: &str) -> StoreResult<()>;

    /// Snapshot of the set at `key`
    fn members(&self, key: &str) -> StoreResult<Vec<String>>;

    /// Append `value` to the tail of the list at `key`
    fn push_tail(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Pop the head of the list at `key`; `None` when the list is empty
    fn pop_head(&self, key: &str) -> StoreResult<Option<String>>;

    /// Pop the head of the list at `key`, waiting up to `timeout` for an element
    ///
    /// A zero `timeout` blocks indefinitely. Returns `Ok(None)` when the wait
    /// timed out, otherwise the `(key, value)` pair that was popped.
    fn blocking_pop_head(&self, key: &str, timeout: Duration)
        -> StoreResult<Option<(String, String)>>;

    /// Remove `key` outright, whatever its type
    fn delete_key(&self, key: &str) -> StoreResult<()>;
}
