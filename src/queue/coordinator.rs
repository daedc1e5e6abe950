//! QueueCoordinator - publish and subscription management for one namespace
//!
//! The coordinator owns the write side of the protocol. Publishing allocates
//! a message id from the queue's atomic counter, stores the payload once with
//! a TTL, then appends the id to the delivery queue of every consumer in the
//! subscriber set at that moment.

use crate::core::validation::validate_ttl_seconds;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::keys::{validate_identifier, KeyBuilder};
use crate::queue::session::ConsumerSession;
use crate::queue::types::{MessageId, DEFAULT_TTL_SECONDS};
use crate::store::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// Fail fast when the store reports it is not connected
pub(crate) fn ensure_connected(store: &dyn KeyValueStore) -> QueueResult<()> {
    if store.is_connected() {
        Ok(())
    } else {
        log::warn!("Store is not connected, refusing queue operation");
        Err(QueueError::StoreUnavailable {
            message: "store is not connected".to_string(),
        })
    }
}

/// Entry point for publishing to and subscribing to queues in a namespace
///
/// Queues and consumers have no creation step: they exist as soon as a
/// subscribe or publish touches their keys.
///
/// # Thread Safety
///
/// The coordinator holds the store behind an `Arc` and can be shared across
/// threads. Sessions it creates hold a clone of the same handle, so a session
/// blocked in [`ConsumerSession::consume`] occupies that store. With a store
/// that serialises commands, such as [`RedisStore`](crate::store::RedisStore),
/// publishing through the same store waits until the consume returns: build
/// blocking consumers on their own store.
///
/// # Example
///
/// ```rust
/// use rpsqueue::queue::{ConsumeOptions, QueueCoordinator};
/// use rpsqueue::store::MemoryStore;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let coordinator = QueueCoordinator::new("n", Arc::new(MemoryStore::new()))?;
///
/// let session = coordinator.subscribe("orders", "c1")?;
/// coordinator.publish("orders", "hello", 3600)?;
///
/// assert_eq!(session.consume(ConsumeOptions::non_blocking())?.as_deref(), Some("hello"));
/// assert_eq!(session.consume(ConsumeOptions::non_blocking())?, None);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone)]
pub struct QueueCoordinator {
    keys: KeyBuilder,
    store: Arc<dyn KeyValueStore>,
    default_ttl_seconds: u64,
}

impl QueueCoordinator {
    pub fn new(namespace: impl Into<String>, store: Arc<dyn KeyValueStore>) -> QueueResult<Self> {
        Ok(Self {
            keys: KeyBuilder::new(namespace)?,
            store,
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
        })
    }

    /// Replace the TTL used by [`publish_with_default_ttl`](Self::publish_with_default_ttl)
    pub fn with_default_ttl(mut self, ttl_seconds: u64) -> QueueResult<Self> {
        self.default_ttl_seconds = check_ttl(ttl_seconds)?;
        Ok(self)
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn default_ttl_seconds(&self) -> u64 {
        self.default_ttl_seconds
    }

    /// The store handle shared with every session
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    /// Add `consumer_id` to the subscribers of `queue` and return its session
    ///
    /// Subscribing an existing member is a no-op on the store; its pending
    /// deliveries are kept. Only messages published after this call are
    /// delivered to a new member.
    pub fn subscribe(&self, queue: &str, consumer_id: &str) -> QueueResult<ConsumerSession> {
        let session = self.session(queue, consumer_id)?;
        ensure_connected(self.store.as_ref())?;

        self.store
            .add_to_set(&self.keys.subscriptions_key(queue), consumer_id)?;
        log::debug!(
            "Subscribed consumer '{}' to queue '{}' in namespace '{}'",
            consumer_id,
            queue,
            self.namespace()
        );

        Ok(session)
    }

    /// Build a session for an existing subscription without touching membership
    pub fn session(&self, queue: &str, consumer_id: &str) -> QueueResult<ConsumerSession> {
        validate_identifier("queue", queue)?;
        validate_identifier("consumer", consumer_id)?;
        Ok(ConsumerSession::new(
            self.keys.clone(),
            Arc::clone(&self.store),
            queue.to_string(),
            consumer_id.to_string(),
        ))
    }

    /// Publish `payload` to every current subscriber of `queue`
    ///
    /// Returns the allocated message id. Ids are strictly increasing per
    /// queue but not gap-free: a failure after the counter increment loses
    /// that id. Nothing is rolled back or retried.
    pub fn publish(&self, queue: &str, payload: &str, ttl_seconds: u64) -> QueueResult<MessageId> {
        validate_identifier("queue", queue)?;
        let ttl_seconds = check_ttl(ttl_seconds)?;
        ensure_connected(self.store.as_ref())?;

        let raw_id = self.store.increment(&self.keys.next_id_key())?;
        let message_id = MessageId::try_from(raw_id).map_err(|_| QueueError::OperationFailed {
            message: format!("message id counter for '{}' returned {}", queue, raw_id),
        })?;

        self.store.set_with_expiry(
            &self.keys.message_key(queue, message_id),
            payload,
            Duration::from_secs(ttl_seconds),
        )?;

        // Snapshot read; not atomic with the increment above
        let consumers = self.store.members(&self.keys.subscriptions_key(queue))?;
        let id_text = message_id.to_string();
        for consumer in &consumers {
            self.store
                .push_tail(&self.keys.delivery_queue_key(queue, consumer), &id_text)?;
        }

        if consumers.is_empty() {
            log::debug!(
                "Published message {} on '{}' with no subscribers",
                message_id,
                queue
            );
        } else {
            log::debug!(
                "Published message {} on '{}' to {} consumer(s)",
                message_id,
                queue,
                consumers.len()
            );
        }

        Ok(message_id)
    }

    /// Publish with the coordinator's default TTL
    pub fn publish_with_default_ttl(&self, queue: &str, payload: &str) -> QueueResult<MessageId> {
        self.publish(queue, payload, self.default_ttl_seconds)
    }

    /// Sorted snapshot of the consumers subscribed to `queue`
    pub fn subscribers(&self, queue: &str) -> QueueResult<Vec<String>> {
        validate_identifier("queue", queue)?;
        ensure_connected(self.store.as_ref())?;

        let mut members = self.store.members(&self.keys.subscriptions_key(queue))?;
        members.sort();
        Ok(members)
    }

    pub fn subscriber_count(&self, queue: &str) -> QueueResult<usize> {
        Ok(self.subscribers(queue)?.len())
    }
}

fn check_ttl(ttl_seconds: u64) -> QueueResult<u64> {
    validate_ttl_seconds(ttl_seconds).map_err(|reason| QueueError::InvalidTtl { reason })
}
