//! Test modules for the queue system
//!
//! All suites run against `MemoryStore`. Tests are organized by functional area.

mod core_functionality;
mod edge_cases;

use crate::queue::QueueCoordinator;
use crate::store::MemoryStore;
use std::sync::Arc;

/// Fresh store plus a coordinator for namespace "n"
pub(super) fn setup() -> (Arc<MemoryStore>, QueueCoordinator) {
    let store = Arc::new(MemoryStore::new());
    let coordinator = QueueCoordinator::new("n", store.clone()).unwrap();
    (store, coordinator)
}
