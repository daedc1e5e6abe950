//! Namespaced key derivation
//!
//! Every key the queue system touches is built here from a namespace followed
//! by path segments joined with [`KEY_SEPARATOR`]:
//!
//! ```text
//! {ns}.nextid                        message id counter (whole namespace)
//! {ns}.{queue}.consumers             subscriber set
//! {ns}.{queue}.messages.{id}         stored payload (with TTL)
//! {ns}.{queue}.{consumer}.messages   consumer delivery queue
//! ```
//!
//! Identifiers must not contain the separator; [`validate_identifier`] is
//! applied at every public entry point so two different tuples can never
//! map to the same key.

use crate::core::validation;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::MessageId;

/// Separator between key segments
pub const KEY_SEPARATOR: char = '.';

/// Check a namespace, queue or consumer identifier; `kind` names it in errors
pub fn validate_identifier(kind: &'static str, value: &str) -> QueueResult<()> {
    validation::validate_identifier(value, KEY_SEPARATOR)
        .map_err(|reason| QueueError::invalid_identifier(kind, value, reason))
}

/// Pure key derivation for one namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    namespace: String,
}

impl KeyBuilder {
    pub fn new(namespace: impl Into<String>) -> QueueResult<Self> {
        let namespace = namespace.into();
        validate_identifier("namespace", &namespace)?;
        Ok(Self { namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn join(&self, segments: &[&str]) -> String {
        let capacity = self.namespace.len() + segments.iter().map(|s| s.len() + 1).sum::<usize>();
        let mut key = String::with_capacity(capacity);
        key.push_str(&self.namespace);
        for segment in segments {
            key.push(KEY_SEPARATOR);
            key.push_str(segment);
        }
        key
    }

    /// Set of consumer ids subscribed to `queue`
    pub fn subscriptions_key(&self, queue: &str) -> String {
        self.join(&[queue, "consumers"])
    }

    /// Counter allocating message ids for every queue of the namespace
    ///
    /// Queue keys always have at least three segments, so a queue named
    /// `nextid` cannot collide with it.
    pub fn next_id_key(&self) -> String {
        self.join(&["nextid"])
    }

    /// Stored payload of message `message_id` on `queue`
    pub fn message_key(&self, queue: &str, message_id: MessageId) -> String {
        self.join(&[queue, "messages", &message_id.to_string()])
    }

    /// Pending message ids for `consumer` on `queue`
    pub fn delivery_queue_key(&self, queue: &str, consumer: &str) -> String {
        self.join(&[queue, consumer, "messages"])
    }
}
