//! Tests for the splitter

#[cfg(test)]
mod tests {
    use crate::models::{Connection, Edge, GraphNode, NodeData, NodeKind};
    use crate::registry::{InMemoryRegistry, NodeRegistry};
    use crate::sync::merge::MergeEngine;
    use crate::sync::split::split_merge_result;

    fn registry_with(entries: &[(&str, NodeData)]) -> InMemoryRegistry {
        let mut registry = InMemoryRegistry::new();
        for (id, data) in entries {
            registry.insert_node(id, data.clone());
        }
        registry
    }

    // ========================================================================
    // Positional Projection Tests
    // ========================================================================

    #[test]
    fn test_split_projects_minimal_positional_nodes() {
        let registry = registry_with(&[(
            "n1",
            NodeData::new(NodeKind::Input, "Form", "form-input", "📝"),
        )]);

        let mut node = GraphNode::new("n1", "form");
        node.position.x = 7.0;
        node.selected = true;
        node.height = Some(120.0);

        let mut engine = MergeEngine::new();
        let merge = engine.merge(&[node], &[], &registry).unwrap();
        let split = split_merge_result(&merge);

        assert_eq!(split.nodes.len(), 1);
        let positional = &split.nodes[0];
        assert_eq!(positional.id, "n1");
        assert_eq!(positional.position.x, 7.0);
        assert!(positional.selected);
        assert_eq!(positional.height, Some(120.0));
        assert!(positional.width.is_none());
    }

    // ========================================================================
    // Semantic Map Tests
    // ========================================================================

    #[test]
    fn test_node_data_map_round_trips_registry_state() {
        let mut data = NodeData::new(NodeKind::Process, "Sum", "aggregate", "🧮");
        data.input
            .connections
            .insert("c1".to_string(), Connection::new("up", "n1"));
        data.output.data = serde_json::json!({"total": 12});
        let registry = registry_with(&[("n1", data.clone())]);

        let mut engine = MergeEngine::new();
        let merge = engine
            .merge(&[GraphNode::new("n1", "process")], &[], &registry)
            .unwrap();
        let split = split_merge_result(&merge);

        let payload = split.node_data_map.get("n1").expect("resolved node present");
        let restored = NodeData::from_value(payload.clone()).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_fallback_nodes_excluded_from_node_data_map() {
        let registry = registry_with(&[(
            "known",
            NodeData::new(NodeKind::Input, "Form", "form-input", "📝"),
        )]);

        let mut engine = MergeEngine::new();
        let merge = engine
            .merge(
                &[GraphNode::new("known", "form"), GraphNode::new("ghost", "form")],
                &[],
                &registry,
            )
            .unwrap();
        let split = split_merge_result(&merge);

        // Consistent with restore: fallback nodes never re-enter the registry
        assert!(split.node_data_map.contains_key("known"));
        assert!(!split.node_data_map.contains_key("ghost"));
        // But the positional view keeps every node
        assert_eq!(split.nodes.len(), 2);
    }

    // ========================================================================
    // Pass-Through Tests
    // ========================================================================

    #[test]
    fn test_edges_connections_and_stats_pass_through() {
        let mut registry = registry_with(&[]);
        registry.insert_connection("c1", Connection::new("n1", "n2"));
        let edges = vec![Edge::new("e1", "n1", "n2")];

        let mut engine = MergeEngine::new();
        let merge = engine.merge(&[], &edges, &registry).unwrap();
        let split = split_merge_result(&merge);

        assert_eq!(split.edges, merge.edges);
        assert_eq!(split.connection_map, merge.connection_map);
        assert_eq!(split.stats.as_ref(), Some(&merge.stats));
    }
}
