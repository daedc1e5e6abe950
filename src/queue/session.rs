//! ConsumerSession - the read side for one (queue, consumer) pair
//!
//! A session pops message ids from its delivery queue and resolves them to
//! payloads. Payloads can expire before their id is popped; such ids are
//! skipped silently and the session moves on to the next one.

use crate::queue::coordinator::ensure_connected;
use crate::queue::error::QueueResult;
use crate::queue::keys::KeyBuilder;
use crate::queue::types::{ConsumeOptions, MessageId};
use crate::store::KeyValueStore;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Remaining budgets shorter than this are served by a non-blocking pop
pub const MIN_BLOCKING_WAIT: Duration = Duration::from_millis(1);

/// Fixed end point of a blocking consume call
#[derive(Debug, Clone, Copy)]
enum Deadline {
    Never,
    At(Instant),
}

impl Deadline {
    /// A budget too large to represent as an instant is treated as unbounded
    fn after(timeout: Duration) -> Self {
        if timeout.is_zero() {
            return Self::Never;
        }
        match Instant::now().checked_add(timeout) {
            Some(at) => Self::At(at),
            None => Self::Never,
        }
    }

    /// Time left before the deadline; `None` when unbounded
    fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::At(at) => Some(at.saturating_duration_since(Instant::now())),
        }
    }
}

/// Handle for consuming messages delivered to one consumer of one queue
///
/// Sessions are created by
/// [`QueueCoordinator::subscribe`](crate::queue::QueueCoordinator::subscribe) or
/// [`QueueCoordinator::session`](crate::queue::QueueCoordinator::session).
/// Dropping a session does not unsubscribe; membership lives in the store
/// until [`unsubscribe`](Self::unsubscribe) is called.
///
/// # Example
///
/// ```rust
/// # use rpsqueue::queue::{ConsumeOptions, QueueCoordinator};
/// # use rpsqueue::store::MemoryStore;
/// # use std::sync::Arc;
/// # use std::time::Duration;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let coordinator = QueueCoordinator::new("n", Arc::new(MemoryStore::new()))?;
/// let session = coordinator.subscribe("orders", "c1")?;
///
/// // Waits at most 2 seconds in total, however many expired ids are skipped
/// match session.consume(ConsumeOptions::blocking(Duration::from_secs(2)))? {
///     Some(payload) => println!("Received: {}", payload),
///     None => println!("Nothing arrived in time"),
/// }
///
/// session.unsubscribe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConsumerSession {
    keys: KeyBuilder,
    store: Arc<dyn KeyValueStore>,
    queue: String,
    consumer_id: String,
    delivery_key: String,
}

impl std::fmt::Debug for ConsumerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerSession")
            .field("keys", &self.keys)
            .field("queue", &self.queue)
            .field("consumer_id", &self.consumer_id)
            .field("delivery_key", &self.delivery_key)
            .finish_non_exhaustive()
    }
}

impl ConsumerSession {
    pub(crate) fn new(
        keys: KeyBuilder,
        store: Arc<dyn KeyValueStore>,
        queue: String,
        consumer_id: String,
    ) -> Self {
        let delivery_key = keys.delivery_queue_key(&queue, &consumer_id);
        Self {
            keys,
            store,
            queue,
            consumer_id,
            delivery_key,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn consumer_id(&self) -> &str {
        &self.consumer_id
    }

    /// Receive the next live payload addressed to this consumer
    ///
    /// Returns `Ok(None)` when nothing is available: immediately for a
    /// non-blocking call, or once the timeout budget is spent for a blocking
    /// one. Expired payloads are never returned.
    ///
    /// A blocking call occupies the store for the whole wait when the store
    /// serialises its commands (as [`RedisStore`](crate::store::RedisStore)
    /// does). Give blocking consumers their own store connection rather than
    /// sharing the publisher's.
    pub fn consume(&self, options: ConsumeOptions) -> QueueResult<Option<String>> {
        ensure_connected(self.store.as_ref())?;

        if !options.block {
            return self.next_live_payload();
        }

        self.consume_until(Deadline::after(options.timeout))
    }

    fn consume_until(&self, deadline: Deadline) -> QueueResult<Option<String>> {
        loop {
            let wait = match deadline.remaining() {
                None => Duration::ZERO,
                Some(left) if left >= MIN_BLOCKING_WAIT => left,
                // Budget spent: one last non-blocking pass
                Some(_) => return self.next_live_payload(),
            };

            let message_id = match self.store.blocking_pop_head(&self.delivery_key, wait)? {
                Some((_, message_id)) => message_id,
                None => {
                    log::trace!(
                        "Consume timed out for '{}' on '{}'",
                        self.consumer_id,
                        self.queue
                    );
                    return Ok(None);
                }
            };

            if let Some(payload) = self.resolve(&message_id)? {
                return Ok(Some(payload));
            }
        }
    }

    /// Non-blocking consume
    pub fn try_consume(&self) -> QueueResult<Option<String>> {
        self.consume(ConsumeOptions::non_blocking())
    }

    /// Drain up to `max` live payloads without blocking
    pub fn consume_batch(&self, max: usize) -> QueueResult<Vec<String>> {
        ensure_connected(self.store.as_ref())?;

        let mut batch = Vec::with_capacity(max.min(64));
        while batch.len() < max {
            match self.next_live_payload()? {
                Some(payload) => batch.push(payload),
                None => break,
            }
        }
        Ok(batch)
    }

    /// Whether this consumer is currently in the queue's subscriber set
    pub fn is_subscribed(&self) -> QueueResult<bool> {
        ensure_connected(self.store.as_ref())?;

        let members = self
            .store
            .members(&self.keys.subscriptions_key(&self.queue))?;
        Ok(members.iter().any(|member| member == &self.consumer_id))
    }

    /// Leave the queue and discard every pending delivery
    ///
    /// Abandoned payloads stay in the store until their TTL runs out.
    /// Calling this again is harmless.
    pub fn unsubscribe(&self) -> QueueResult<()> {
        ensure_connected(self.store.as_ref())?;

        self.store
            .remove_from_set(&self.keys.subscriptions_key(&self.queue), &self.consumer_id)?;
        self.store.delete_key(&self.delivery_key)?;
        log::debug!(
            "Unsubscribed consumer '{}' from queue '{}'",
            self.consumer_id,
            self.queue
        );
        Ok(())
    }

    /// Pop ids until one resolves to a live payload or the queue is empty
    fn next_live_payload(&self) -> QueueResult<Option<String>> {
        while let Some(message_id) = self.store.pop_head(&self.delivery_key)? {
            if let Some(payload) = self.resolve(&message_id)? {
                return Ok(Some(payload));
            }
        }
        Ok(None)
    }

    fn resolve(&self, message_id: &str) -> QueueResult<Option<String>> {
        let message_id = match message_id.parse::<MessageId>() {
            Ok(id) => id,
            Err(_) => {
                log::warn!(
                    "Skipping malformed message id '{}' in delivery queue '{}'",
                    message_id,
                    self.delivery_key
                );
                return Ok(None);
            }
        };

        let payload = self
            .store
            .get(&self.keys.message_key(&self.queue, message_id))?;
        if payload.is_none() {
            log::trace!(
                "Message {} on '{}' expired before '{}' consumed it",
                message_id,
                self.queue,
                self.consumer_id
            );
        }
        Ok(payload)
    }
}
