//! Namespaced Fan-out Queue
//!
//! A multi-consumer publish/subscribe queue built entirely from key-value
//! store primitives. Every published message is stored once with a TTL, and
//! a reference to it is fanned out to the personal delivery queue of every
//! consumer subscribed at publish time.
//!
//! # Overview
//!
//! - **Namespaces**: all keys are prefixed, so independent buses can share a store
//! - **Fan-out**: every subscribed consumer receives every message (not a work queue)
//! - **Atomic ids**: a per-queue counter orders concurrent publishers
//! - **TTL-bounded payloads**: undelivered messages expire; consumers skip them
//! - **Deadline-accurate blocking**: a blocking consume never waits past its budget
//!
//! # Architecture
//!
//! ```text
//!   publish("orders", payload)
//!          │
//!          ▼
//! ┌──────────────────────┐  INCR n.nextid               ──► id = 7
//! │   QueueCoordinator   │  SETEX n.orders.messages.7   ──► payload (TTL)
//! └──────────┬───────────┘  SMEMBERS n.orders.consumers ──► {c1, c2}
//!            │ RPUSH 7
//!      ┌─────┴──────────────────┐
//!      ▼                        ▼
//! n.orders.c1.messages    n.orders.c2.messages
//!  [5, 6, 7]               [7]
//!      │ LPOP / BLPOP           │
//!      ▼                        ▼
//! ┌──────────────┐        ┌──────────────┐
//! │ Session (c1) │        │ Session (c2) │   GET n.orders.messages.{id}
//! └──────────────┘        └──────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use rpsqueue::queue::{ConsumeOptions, QueueCoordinator};
//! use rpsqueue::store::MemoryStore;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = QueueCoordinator::new("shop", Arc::new(MemoryStore::new()))?;
//!
//! let billing = coordinator.subscribe("orders", "billing")?;
//! let shipping = coordinator.subscribe("orders", "shipping")?;
//!
//! coordinator.publish("orders", "order #1", 3600)?;
//!
//! // Both consumers get their own copy
//! assert_eq!(billing.try_consume()?.as_deref(), Some("order #1"));
//! assert_eq!(shipping.try_consume()?.as_deref(), Some("order #1"));
//! assert_eq!(billing.consume(ConsumeOptions::non_blocking())?, None);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod api;
mod coordinator;
mod error;
mod keys;
mod session;
mod types;

pub use coordinator::QueueCoordinator;
pub use error::{QueueError, QueueResult};
pub use keys::{validate_identifier, KeyBuilder, KEY_SEPARATOR};
pub use session::{ConsumerSession, MIN_BLOCKING_WAIT};
pub use types::{ConsumeOptions, MessageId, DEFAULT_TTL_SECONDS};

#[cfg(test)]
mod tests;
