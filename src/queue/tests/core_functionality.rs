//! Core Functionality Tests - publish, subscribe and consume essentials

#[cfg(test)]
mod tests {
    use crate::queue::api::{ConsumeOptions, QueueError};
    use crate::queue::tests::setup;
    use crate::store::KeyValueStore;

    #[test]
    fn test_subscribe_publish_consume_scenario() {
        let (_store, coordinator) = setup();

        let session = coordinator.subscribe("orders", "c1").unwrap();
        coordinator.publish("orders", "hello", 3600).unwrap();

        let first = session.consume(ConsumeOptions::non_blocking()).unwrap();
        assert_eq!(first.as_deref(), Some("hello"));

        let second = session.consume(ConsumeOptions::non_blocking()).unwrap();
        assert!(second.is_none(), "Second consume should find nothing");
    }

    #[test]
    fn test_publish_without_subscriber_is_not_delivered_later() {
        let (_store, coordinator) = setup();

        coordinator
            .publish("test", "test message content", 3600)
            .unwrap();
        let session = coordinator.subscribe("test", "consumer").unwrap();

        assert_eq!(session.try_consume().unwrap(), None);
    }

    #[test]
    fn test_publish_with_reader() {
        let (_store, coordinator) = setup();

        let session = coordinator.subscribe("test", "consumer").unwrap();
        coordinator
            .publish_with_default_ttl("test", "test message content")
            .unwrap();

        assert_eq!(
            session.try_consume().unwrap().as_deref(),
            Some("test message content")
        );
    }

    #[test]
    fn test_message_ids_strictly_increase_across_namespace() {
        let (_store, coordinator) = setup();

        let ids: Vec<u64> = (0..3)
            .map(|i| {
                coordinator
                    .publish("orders", &format!("m{}", i), 3600)
                    .unwrap()
            })
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);

        // One counter serves every queue of the namespace
        assert_eq!(coordinator.publish("invoices", "x", 3600).unwrap(), 4);
        assert_eq!(coordinator.publish("orders", "m3", 3600).unwrap(), 5);
    }

    #[test]
    fn test_delivery_preserves_publish_order() {
        let (_store, coordinator) = setup();
        let session = coordinator.subscribe("orders", "c1").unwrap();

        for i in 0..10 {
            coordinator
                .publish("orders", &format!("order-{}", i), 3600)
                .unwrap();
        }

        for i in 0..10 {
            assert_eq!(
                session.try_consume().unwrap(),
                Some(format!("order-{}", i))
            );
        }
        assert_eq!(session.try_consume().unwrap(), None);
    }

    #[test]
    fn test_stored_payload_and_delivery_keys() {
        let (store, coordinator) = setup();
        let _session = coordinator.subscribe("orders", "c1").unwrap();

        let id = coordinator.publish("orders", "hello", 3600).unwrap();

        assert_eq!(
            store.get("n.orders.messages.1").unwrap().as_deref(),
            Some("hello")
        );
        assert_eq!(id, 1);
        assert_eq!(store.list_len("n.orders.c1.messages").unwrap(), 1);
        assert_eq!(
            store.members("n.orders.consumers").unwrap(),
            vec!["c1".to_string()]
        );
    }

    #[test]
    fn test_default_ttl_configuration() {
        let (_store, coordinator) = setup();
        assert_eq!(coordinator.default_ttl_seconds(), 3600);

        let coordinator = coordinator.with_default_ttl(60).unwrap();
        assert_eq!(coordinator.default_ttl_seconds(), 60);

        assert!(matches!(
            coordinator.with_default_ttl(0),
            Err(QueueError::InvalidTtl { .. })
        ));
    }

    #[test]
    fn test_coordinator_accessors() {
        let (_store, coordinator) = setup();
        assert_eq!(coordinator.namespace(), "n");
        assert!(coordinator.store().is_connected());
        assert_eq!(coordinator.keys().next_id_key(), "n.nextid");

        let session = coordinator.subscribe("orders", "c1").unwrap();
        assert_eq!(session.queue(), "orders");
        assert_eq!(session.consumer_id(), "c1");
    }
}
