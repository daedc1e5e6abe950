//! Namespaced fan-out publish/subscribe queue over key-value store primitives
//!
//! See [`queue`] for the coordinator and consumer sessions and [`store`] for
//! the backends they run on.

pub mod app;
pub mod core;
pub mod queue;
pub mod store;
