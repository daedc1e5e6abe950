//! Common test utilities and helpers

#![allow(dead_code)]

use rpsqueue::queue::QueueCoordinator;
use rpsqueue::store::{KeyValueStore, MemoryStore, RedisStore};
use std::sync::Arc;

/// Coordinator over a fresh in-memory store
pub fn memory_coordinator(namespace: &str) -> (Arc<MemoryStore>, QueueCoordinator) {
    let store = Arc::new(MemoryStore::new());
    let coordinator = QueueCoordinator::new(namespace, store.clone()).unwrap();
    (store, coordinator)
}

/// Redis URL for the live-server tests, from `RPSQ_REDIS_URL`
pub fn redis_url() -> String {
    std::env::var("RPSQ_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
}

/// Coordinator over a live redis server with the namespace's keys cleared
pub fn redis_coordinator(namespace: &str) -> QueueCoordinator {
    let url = redis_url();
    let client = redis::Client::open(url.as_str()).unwrap();
    let mut connection = client.get_connection().unwrap();

    let stale: Vec<String> = redis::cmd("KEYS")
        .arg(format!("{}.*", namespace))
        .query(&mut connection)
        .unwrap();
    if !stale.is_empty() {
        redis::cmd("DEL")
            .arg(&stale)
            .query::<()>(&mut connection)
            .unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(RedisStore::from_connection(connection));
    QueueCoordinator::new(namespace, store).unwrap()
}
