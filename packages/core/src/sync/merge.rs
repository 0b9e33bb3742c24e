//! Merge Engine
//!
//! Combines the positional graph (renderer-owned nodes/edges) with the
//! semantic graph (registry-owned `NodeData` and connections) into one
//! full-fidelity [`MergeResult`] snapshot.
//!
//! For every positional node the engine resolves `NodeData` by id from the
//! registry. Resolved nodes carry the full semantic payload with provenance
//! `nodeDataManager`; unresolved nodes fall back to their positional form
//! with provenance `reactFlow` and a warning, and are excluded from
//! fidelity-complete accounting. The registry's live connection map is
//! snapshotted verbatim, each entry stamped `exportedAt`. Edges pass through
//! unchanged.
//!
//! The merge is a read-only traversal: it never mutates the registry.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::time::{SystemTimeProvider, TimeProvider};
use crate::models::{
    Edge, EnhancedMetadata, EnhancedNode, GraphNode, MergeResult, MergeStats, SnapshotSource,
    FALLBACK_WARNING,
};
use crate::registry::NodeRegistry;
use crate::sync::error::SyncError;

/// Record of the last merge failure, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeFailure {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Merges positional and semantic graph state into snapshots.
///
/// Stateless with respect to graph data — every call recomputes from its
/// inputs — but keeps the stats and failure record of the most recent call
/// for later retrieval by the embedding application.
pub struct MergeEngine {
    time: Arc<dyn TimeProvider>,
    last_stats: Option<MergeStats>,
    last_error: Option<MergeFailure>,
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeEngine {
    pub fn new() -> Self {
        Self::with_time_provider(Arc::new(SystemTimeProvider))
    }

    /// Create an engine with an explicit clock (deterministic stamps in tests)
    pub fn with_time_provider(time: Arc<dyn TimeProvider>) -> Self {
        Self {
            time,
            last_stats: None,
            last_error: None,
        }
    }

    /// Stats of the most recent successful merge
    pub fn last_stats(&self) -> Option<&MergeStats> {
        self.last_stats.as_ref()
    }

    /// Record of the most recent merge failure
    pub fn last_error(&self) -> Option<&MergeFailure> {
        self.last_error.as_ref()
    }

    /// Merge positional nodes/edges with registry state into a snapshot.
    ///
    /// Read-only on the registry. On failure no partial result is returned:
    /// the failure is recorded (message + timestamp) and re-thrown wrapped
    /// with context.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Merge` when a resolved node's semantic payload
    /// cannot be serialized into the snapshot.
    pub fn merge(
        &mut self,
        nodes: &[GraphNode],
        edges: &[Edge],
        registry: &dyn NodeRegistry,
    ) -> Result<MergeResult, SyncError> {
        let started = Instant::now();
        tracing::debug!(
            "Merging {} positional node(s), {} edge(s) against registry",
            nodes.len(),
            edges.len()
        );

        match self.merge_inner(nodes, edges, registry, started) {
            Ok(result) => {
                self.last_stats = Some(result.stats.clone());
                tracing::info!(
                    "Merge complete: {}/{} node(s) resolved, {} connection(s) snapshotted in {}ms",
                    result
                        .nodes
                        .iter()
                        .filter(|n| n.is_registry_sourced())
                        .count(),
                    result.stats.total_nodes,
                    result.stats.connections_map_size,
                    result.stats.processing_time_ms
                );
                Ok(result)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Merge failed: {}", message);
                self.last_error = Some(MergeFailure {
                    message: message.clone(),
                    timestamp: self.time.now(),
                });
                Err(SyncError::merge_failed(message))
            }
        }
    }

    fn merge_inner(
        &self,
        nodes: &[GraphNode],
        edges: &[Edge],
        registry: &dyn NodeRegistry,
        started: Instant,
    ) -> Result<MergeResult, SyncError> {
        let now = self.time.now();
        let mut enhanced_nodes = Vec::with_capacity(nodes.len());
        let mut nodes_with_connections = 0usize;
        let mut total_connections = 0usize;

        for node in nodes {
            match registry.node_data(&node.id) {
                Some(data) => {
                    let connection_count = data.connection_count();
                    if connection_count > 0 {
                        nodes_with_connections += 1;
                    }
                    total_connections += connection_count;

                    let data_version = data.meta.version;
                    let payload = serde_json::to_value(&data)?;
                    enhanced_nodes.push(EnhancedNode {
                        id: node.id.clone(),
                        node_type: node.node_type.clone(),
                        position: node.position,
                        selected: node.selected,
                        data: Some(payload),
                        dragging: node.dragging,
                        width: node.width,
                        height: node.height,
                        enhanced_metadata: Some(EnhancedMetadata {
                            last_sync: now,
                            source: SnapshotSource::NodeDataManager,
                            has_connections: connection_count > 0,
                            connection_count,
                            data_version,
                            warning: None,
                        }),
                    });
                }
                None => {
                    tracing::warn!(
                        "Node '{}' has no registry entry, falling back to positional data",
                        node.id
                    );
                    enhanced_nodes.push(EnhancedNode {
                        id: node.id.clone(),
                        node_type: node.node_type.clone(),
                        position: node.position,
                        selected: node.selected,
                        data: node.data.clone(),
                        dragging: node.dragging,
                        width: node.width,
                        height: node.height,
                        enhanced_metadata: Some(EnhancedMetadata {
                            last_sync: now,
                            source: SnapshotSource::ReactFlow,
                            has_connections: false,
                            connection_count: 0,
                            data_version: 0,
                            warning: Some(FALLBACK_WARNING.to_string()),
                        }),
                    });
                }
            }
        }

        // Verbatim snapshot of the live connection map, stamped per entry
        let mut connection_map = registry.connections();
        for connection in connection_map.values_mut() {
            connection.exported_at = Some(now);
        }

        let stats = MergeStats {
            total_nodes: nodes.len(),
            nodes_with_connections,
            total_connections,
            connections_map_size: connection_map.len(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            timestamp: now,
        };

        Ok(MergeResult {
            nodes: enhanced_nodes,
            edges: edges.to_vec(),
            connection_map,
            stats,
            validation_errors: Vec::new(),
        })
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "merge_test.rs"]
mod merge_test;
