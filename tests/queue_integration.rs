//! Queue integration tests through the public API

mod common;

use common::memory_coordinator;
use rpsqueue::queue::{ConsumeOptions, KeyBuilder, QueueCoordinator, QueueError};
use rpsqueue::store::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_publish_without_reader_is_not_delivered() {
    let (_store, coordinator) = memory_coordinator("itest");

    coordinator
        .publish("test", "test message content", 3600)
        .unwrap();
    let session = coordinator.subscribe("test", "consumer").unwrap();

    assert_eq!(session.consume(ConsumeOptions::non_blocking()).unwrap(), None);
}

#[test]
fn test_publish_with_reader_is_delivered() {
    let (_store, coordinator) = memory_coordinator("itest");

    let session = coordinator.subscribe("test", "consumer").unwrap();
    coordinator
        .publish("test", "test message content", 3600)
        .unwrap();

    assert_eq!(
        session.consume(ConsumeOptions::non_blocking()).unwrap(),
        Some("test message content".to_string())
    );
}

#[test]
fn test_store_layout_matches_key_builder() {
    let (store, coordinator) = memory_coordinator("shop");
    let keys = KeyBuilder::new("shop").unwrap();

    coordinator.subscribe("orders", "billing").unwrap();
    let id = coordinator.publish("orders", "order #1", 60).unwrap();

    assert_eq!(keys.next_id_key(), "shop.nextid");
    assert_eq!(
        store.get(&keys.next_id_key()).unwrap(),
        Some(id.to_string())
    );
    assert_eq!(
        store.get(&keys.message_key("orders", id)).unwrap().as_deref(),
        Some("order #1")
    );
    assert_eq!(
        store.members(&keys.subscriptions_key("orders")).unwrap(),
        vec!["billing".to_string()]
    );
    assert_eq!(
        store
            .pop_head(&keys.delivery_queue_key("orders", "billing"))
            .unwrap(),
        Some(id.to_string())
    );
}

#[test]
fn test_two_coordinators_share_one_bus() {
    let store = Arc::new(MemoryStore::new());
    let publisher = QueueCoordinator::new("bus", store.clone()).unwrap();
    let consumer_side = QueueCoordinator::new("bus", store.clone()).unwrap();
    let other_bus = QueueCoordinator::new("other", store).unwrap();

    let session = consumer_side.subscribe("events", "c1").unwrap();
    let stranger = other_bus.subscribe("events", "c1").unwrap();

    publisher.publish("events", "hello", 60).unwrap();

    assert_eq!(session.try_consume().unwrap().as_deref(), Some("hello"));
    assert_eq!(stranger.try_consume().unwrap(), None);
}

#[test]
fn test_blocking_consume_across_threads() {
    let (_store, coordinator) = memory_coordinator("itest");
    let session = coordinator.subscribe("jobs", "worker").unwrap();

    let publisher = coordinator.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        publisher.publish("jobs", "job-1", 60).unwrap();
    });

    let start = Instant::now();
    let payload = session
        .consume(ConsumeOptions::blocking(Duration::from_secs(5)))
        .unwrap();
    handle.join().unwrap();

    assert_eq!(payload.as_deref(), Some("job-1"));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_unavailable_store_is_reported_as_connectivity_error() {
    let (store, coordinator) = memory_coordinator("itest");
    store.set_connected(false);

    let error = coordinator.publish("jobs", "lost", 60).unwrap_err();
    assert!(matches!(error, QueueError::StoreUnavailable { .. }));
}
