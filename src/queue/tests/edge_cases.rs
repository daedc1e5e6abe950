//! Edge case and error condition tests for the queue system

#[cfg(test)]
mod tests {
    use crate::queue::api::{ConsumeOptions, QueueCoordinator, QueueError};
    use crate::queue::tests::setup;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_invalid_identifiers_are_rejected() {
        let (store, coordinator) = setup();

        assert!(matches!(
            coordinator.subscribe("orders.eu", "c1"),
            Err(QueueError::InvalidIdentifier { kind: "queue", .. })
        ));
        assert!(matches!(
            coordinator.subscribe("orders", "c.1"),
            Err(QueueError::InvalidIdentifier {
                kind: "consumer",
                ..
            })
        ));
        assert!(matches!(
            coordinator.publish("", "payload", 3600),
            Err(QueueError::InvalidIdentifier { kind: "queue", .. })
        ));
        assert!(matches!(
            QueueCoordinator::new("a.b", store.clone()),
            Err(QueueError::InvalidIdentifier {
                kind: "namespace",
                ..
            })
        ));

        // Nothing was written by the rejected calls
        assert!(!store.contains_key("n.orders.consumers").unwrap());
        assert!(!store.contains_key("n.nextid").unwrap());
    }

    #[test]
    fn test_zero_ttl_is_rejected_before_allocating_an_id() {
        let (store, coordinator) = setup();

        assert!(matches!(
            coordinator.publish("orders", "payload", 0),
            Err(QueueError::InvalidTtl { .. })
        ));
        assert!(!store.contains_key("n.nextid").unwrap());
    }

    #[test]
    fn test_unrepresentable_ttl_fails_without_storing() {
        let (_store, coordinator) = setup();
        let session = coordinator.subscribe("orders", "c1").unwrap();

        assert!(matches!(
            coordinator.publish("orders", "forever", u64::MAX),
            Err(QueueError::OperationFailed { .. })
        ));
        assert_eq!(session.try_consume().unwrap(), None);
    }

    #[test]
    fn test_empty_and_large_payloads() {
        let (_store, coordinator) = setup();
        let session = coordinator.subscribe("bulk", "c1").unwrap();

        let large = "x".repeat(1024 * 1024);
        coordinator.publish("bulk", "", 3600).unwrap();
        coordinator.publish("bulk", &large, 3600).unwrap();

        // An empty payload is still a live message
        assert_eq!(session.try_consume().unwrap().as_deref(), Some(""));
        assert_eq!(session.try_consume().unwrap(), Some(large));
    }

    #[test]
    fn test_consume_from_never_used_queue() {
        let (_store, coordinator) = setup();
        let session = coordinator.session("ghost", "nobody").unwrap();

        assert_eq!(session.consume(ConsumeOptions::non_blocking()).unwrap(), None);
        assert!(session.consume_batch(10).unwrap().is_empty());
        session.unsubscribe().unwrap();
    }

    #[test]
    fn test_consume_batch_limits() {
        let (_store, coordinator) = setup();
        let session = coordinator.subscribe("orders", "c1").unwrap();

        for i in 0..5 {
            coordinator
                .publish("orders", &format!("m{}", i), 3600)
                .unwrap();
        }

        assert!(session.consume_batch(0).unwrap().is_empty());
        assert_eq!(session.consume_batch(2).unwrap(), vec!["m0", "m1"]);
        assert_eq!(session.consume_batch(10).unwrap(), vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_many_small_messages_flood() {
        let (_store, coordinator) = setup();
        let session = coordinator.subscribe("flood", "c1").unwrap();

        let message_count = 5000;
        for i in 0..message_count {
            coordinator
                .publish("flood", &format!("msg-{}", i), 3600)
                .unwrap();
        }

        let mut read_count = 0;
        while let Some(payload) = session.try_consume().unwrap() {
            assert_eq!(payload, format!("msg-{}", read_count));
            read_count += 1;
        }
        assert_eq!(read_count, message_count);
    }

    #[test]
    fn test_store_type_conflict_surfaces_as_operation_failure() {
        let store = Arc::new(MemoryStore::new());
        // Something else already owns the subscriber key
        store
            .set_with_expiry("n.orders.consumers", "oops", std::time::Duration::from_secs(60))
            .unwrap();
        let coordinator = QueueCoordinator::new("n", store.clone()).unwrap();

        assert!(matches!(
            coordinator.subscribe("orders", "c1"),
            Err(QueueError::OperationFailed { .. })
        ));
    }
}
