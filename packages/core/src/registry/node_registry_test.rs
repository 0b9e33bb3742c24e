//! Tests for the in-memory node registry

#[cfg(test)]
mod tests {
    use crate::models::{Connection, NodeData, NodeKind};
    use crate::registry::{InMemoryRegistry, NodeRegistry};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_data(label: &str) -> NodeData {
        NodeData::new(NodeKind::Input, label, "form-input", "📝")
    }

    // ========================================================================
    // Registration & Lookup Tests
    // ========================================================================

    #[test]
    fn test_register_and_lookup() {
        let mut registry = InMemoryRegistry::new();
        registry.register_node("n1", sample_data("Form"), None);

        let data = registry.node_data("n1").expect("node should be registered");
        assert_eq!(data.meta.label, "Form");
        assert!(registry.node_data("missing").is_none());
        assert_eq!(registry.node_ids(), vec!["n1".to_string()]);
    }

    #[test]
    fn test_connections_snapshot_is_detached() {
        let mut registry = InMemoryRegistry::new();
        registry.insert_connection("c1", Connection::new("n1", "n2"));

        let mut snapshot = registry.connections();
        snapshot.insert("c2".to_string(), Connection::new("n2", "n3"));

        // Mutating the snapshot never touches the live map
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.connections().len(), 1);
    }

    #[test]
    fn test_update_callback_fires_on_writes() {
        let mut registry = InMemoryRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        registry.register_node(
            "n1",
            sample_data("Form"),
            Some(Box::new(move |id, data| {
                assert_eq!(id, "n1");
                assert!(!data.meta.label.is_empty());
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );
        // register_node writes once; a later insert_node fires again
        registry.insert_node("n1", sample_data("Form v2"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.node_data("n1").unwrap().meta.label, "Form v2");
    }

    #[test]
    fn test_register_from_value_validates_at_boundary() {
        use crate::registry::RegistryError;
        use serde_json::json;

        let mut registry = InMemoryRegistry::new();
        let valid = sample_data("Form").to_value().unwrap();
        registry
            .register_node_from_value("n1", valid, None)
            .unwrap();
        assert!(registry.node_data("n1").is_some());

        let result = registry.register_node_from_value("n2", json!({"meta": {}}), None);
        assert!(matches!(
            result,
            Err(RegistryError::RegistrationRejected { id, .. }) if id == "n2"
        ));
        assert!(registry.node_data("n2").is_none());
    }

    // ========================================================================
    // Lifecycle Tests
    // ========================================================================

    #[tokio::test]
    async fn test_initialize_marks_registry_usable() {
        let mut registry = InMemoryRegistry::new();
        assert!(!registry.is_initialized());
        registry.initialize().await.unwrap();
        assert!(registry.is_initialized());
    }

    #[tokio::test]
    async fn test_cleanup_drops_all_state() {
        let mut registry = InMemoryRegistry::new();
        registry.initialize().await.unwrap();
        registry.register_node("n1", sample_data("Form"), Some(Box::new(|_, _| {})));
        registry.insert_connection("c1", Connection::new("n1", "n2"));

        registry.cleanup().await.unwrap();

        assert_eq!(registry.node_count(), 0);
        assert_eq!(registry.connection_count(), 0);
        assert!(!registry.is_initialized());
        assert!(registry.node_data("n1").is_none());
    }
}
