//! Splitter
//!
//! Pure, inverse-leaning decomposition of a full snapshot back into the two
//! live views: minimal positional nodes for the rendering layer and a
//! semantic `node_data_map` for the registry. Edges, the connection map, and
//! stats pass through unchanged.
//!
//! Consistent with restore, only registry-sourced nodes contribute to
//! `node_data_map`; positional fallback nodes are excluded. The splitter
//! assumes the caller already ran the integrity validator and defines no
//! failure modes of its own.

use std::collections::BTreeMap;

use crate::models::{ConnectionMap, Edge, EnhancedNode, MergeResult, MergeStats, SplitResult};

/// Decompose snapshot parts into positional-only and semantic-only views.
pub fn split_snapshot(
    nodes: &[EnhancedNode],
    edges: &[Edge],
    connection_map: &ConnectionMap,
    stats: Option<&MergeStats>,
) -> SplitResult {
    let mut node_data_map = BTreeMap::new();
    let mut positional_nodes = Vec::with_capacity(nodes.len());

    for node in nodes {
        positional_nodes.push(node.to_graph_node());

        if node.is_registry_sourced() {
            if let Some(payload) = node.data.as_ref() {
                node_data_map.insert(node.id.clone(), payload.clone());
            }
        }
    }

    SplitResult {
        nodes: positional_nodes,
        edges: edges.to_vec(),
        node_data_map,
        connection_map: connection_map.clone(),
        stats: stats.cloned(),
    }
}

/// Decompose a merge result. Convenience over [`split_snapshot`].
pub fn split_merge_result(result: &MergeResult) -> SplitResult {
    split_snapshot(
        &result.nodes,
        &result.edges,
        &result.connection_map,
        Some(&result.stats),
    )
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "split_test.rs"]
mod split_test;
