//! Tests for the state restorer

#[cfg(test)]
mod tests {
    use crate::models::time::MockTimeProvider;
    use crate::models::{
        Connection, ConnectionMap, EnhancedMetadata, EnhancedNode, NodeData, NodeKind, Position,
        SnapshotSource,
    };
    use crate::registry::{InMemoryRegistry, NodeRegistry, UpdateCallback};
    use crate::sync::error::SyncError;
    use crate::sync::restore::StateRestorer;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;

    fn snapshot_node(id: &str, source: SnapshotSource, data: Option<serde_json::Value>) -> EnhancedNode {
        EnhancedNode {
            id: id.to_string(),
            node_type: "process".to_string(),
            position: Position::default(),
            selected: false,
            data,
            dragging: None,
            width: None,
            height: None,
            enhanced_metadata: Some(EnhancedMetadata {
                last_sync: Utc::now(),
                source,
                has_connections: false,
                connection_count: 0,
                data_version: 1,
                warning: None,
            }),
        }
    }

    fn valid_payload(label: &str) -> serde_json::Value {
        NodeData::new(NodeKind::Process, label, "aggregate", "🧮")
            .to_value()
            .unwrap()
    }

    /// Registry whose initialize hook fails after a successful cleanup,
    /// leaving the registry freshly reset.
    struct BrokenInitRegistry {
        inner: InMemoryRegistry,
    }

    #[async_trait]
    impl NodeRegistry for BrokenInitRegistry {
        fn node_data(&self, id: &str) -> Option<NodeData> {
            self.inner.node_data(id)
        }
        fn node_ids(&self) -> Vec<String> {
            self.inner.node_ids()
        }
        fn connections(&self) -> ConnectionMap {
            self.inner.connections()
        }
        fn insert_node(&mut self, id: &str, data: NodeData) {
            self.inner.insert_node(id, data)
        }
        fn insert_connection(&mut self, id: &str, connection: Connection) {
            self.inner.insert_connection(id, connection)
        }
        fn register_node(&mut self, id: &str, data: NodeData, callback: Option<UpdateCallback>) {
            self.inner.register_node(id, data, callback)
        }
        async fn initialize(&mut self) -> anyhow::Result<()> {
            Err(anyhow!("event plumbing unavailable"))
        }
        async fn cleanup(&mut self) -> anyhow::Result<()> {
            self.inner.cleanup().await
        }
    }

    // ========================================================================
    // Destructive-Then-Additive Ordering Tests
    // ========================================================================

    #[tokio::test]
    async fn test_restore_replaces_all_prior_registry_state() {
        let mut registry = InMemoryRegistry::new();
        registry.insert_node("stale-1", NodeData::new(NodeKind::Input, "Old", "form-input", "📝"));
        registry.insert_node("stale-2", NodeData::new(NodeKind::Output, "Old", "render", "🖥️"));
        registry.insert_connection("stale-conn", Connection::new("stale-1", "stale-2"));

        let nodes = vec![snapshot_node(
            "n1",
            SnapshotSource::NodeDataManager,
            Some(valid_payload("Fresh")),
        )];
        let outcome = StateRestorer::new()
            .restore(&nodes, &ConnectionMap::new(), &mut registry)
            .await
            .unwrap();

        // Exactly the restored node survives; nothing from before the call
        assert!(outcome.success);
        assert_eq!(registry.node_ids(), vec!["n1".to_string()]);
        assert_eq!(registry.connection_count(), 0);
        assert_eq!(outcome.stats.restored_nodes, 1);
        assert_eq!(outcome.stats.restored_connections, 0);
    }

    #[tokio::test]
    async fn test_fallback_nodes_never_reach_the_registry() {
        let mut registry = InMemoryRegistry::new();
        let nodes = vec![
            snapshot_node("kept", SnapshotSource::NodeDataManager, Some(valid_payload("Kept"))),
            snapshot_node("fallback", SnapshotSource::ReactFlow, Some(json!({"label": "x"}))),
            snapshot_node("empty", SnapshotSource::NodeDataManager, None),
        ];

        let outcome = StateRestorer::new()
            .restore(&nodes, &ConnectionMap::new(), &mut registry)
            .await
            .unwrap();

        assert_eq!(outcome.stats.restored_nodes, 1);
        assert!(registry.node_data("kept").is_some());
        assert!(registry.node_data("fallback").is_none());
        assert!(registry.node_data("empty").is_none());
    }

    // ========================================================================
    // Connection Repopulation Tests
    // ========================================================================

    #[tokio::test]
    async fn test_connections_inserted_without_shape_validation() {
        let mut registry = InMemoryRegistry::new();
        let mut connection_map = ConnectionMap::new();
        // Deliberately malformed: no sourceNodeId, no meta
        connection_map.insert("malformed".to_string(), Connection::default());
        connection_map.insert("ok".to_string(), Connection::new("n1", "n2"));

        let pinned = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let restorer =
            StateRestorer::with_time_provider(Arc::new(MockTimeProvider::with_time(pinned)));
        let outcome = restorer
            .restore(&[], &connection_map, &mut registry)
            .await
            .unwrap();

        assert_eq!(outcome.stats.restored_connections, 2);
        let live = registry.connections();
        assert!(live.contains_key("malformed"));
        assert_eq!(live["malformed"].restored_at, Some(pinned));
        assert_eq!(live["ok"].restored_at, Some(pinned));
        // Source map entries were not mutated
        assert!(connection_map["ok"].restored_at.is_none());
    }

    // ========================================================================
    // Failure Path Tests
    // ========================================================================

    #[tokio::test]
    async fn test_lifecycle_failure_leaves_registry_reset() {
        let mut inner = InMemoryRegistry::new();
        inner.insert_node("stale", NodeData::new(NodeKind::Input, "Old", "form-input", "📝"));
        let mut registry = BrokenInitRegistry { inner };

        let nodes = vec![snapshot_node(
            "n1",
            SnapshotSource::NodeDataManager,
            Some(valid_payload("Fresh")),
        )];
        let result = StateRestorer::new()
            .restore(&nodes, &ConnectionMap::new(), &mut registry)
            .await;

        match result {
            Err(SyncError::Restore { context }) => {
                assert!(context.contains("initialize failed"));
            }
            other => panic!("expected restore error, got {other:?}"),
        }
        // Cleanup ran, repopulation never did: freshly reset, never partial
        assert!(registry.node_ids().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_node_payload_aborts() {
        let mut registry = InMemoryRegistry::new();
        let nodes = vec![snapshot_node(
            "n1",
            SnapshotSource::NodeDataManager,
            Some(json!({"meta": {"kind": "widget"}})),
        )];

        let result = StateRestorer::new()
            .restore(&nodes, &ConnectionMap::new(), &mut registry)
            .await;

        assert!(matches!(result, Err(SyncError::Restore { .. })));
        assert_eq!(registry.node_count(), 0);
    }

    #[tokio::test]
    async fn test_outcome_stats() {
        let mut registry = InMemoryRegistry::new();
        let mut connection_map = ConnectionMap::new();
        connection_map.insert("c1".to_string(), Connection::new("a", "b"));

        let nodes = vec![
            snapshot_node("n1", SnapshotSource::NodeDataManager, Some(valid_payload("A"))),
            snapshot_node("n2", SnapshotSource::NodeDataManager, Some(valid_payload("B"))),
        ];
        let outcome = StateRestorer::new()
            .restore(&nodes, &connection_map, &mut registry)
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.stats.restored_nodes, 2);
        assert_eq!(outcome.stats.restored_connections, 1);
        assert!(registry.is_initialized());
    }
}
