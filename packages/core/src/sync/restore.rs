//! State Restorer
//!
//! The one operation in this crate with side effects on shared state:
//! repopulates the live node registry from a persisted snapshot, strictly
//! destructive-then-additive.
//!
//! 1. Full reset: `cleanup().await` then `initialize().await`, both complete
//!    before any repopulation begins.
//! 2. Every connection-map entry is inserted into the registry's live map,
//!    stamped `restoredAt`. No shape validation happens here — a malformed
//!    entry is inserted as-is; shape checking is exclusively the integrity
//!    validator's job, run before persistence.
//! 3. Only registry-sourced nodes (`enhancedMetadata.source ==
//!    "nodeDataManager"`) with a `data` payload are written back; positional
//!    fallback nodes are intentionally skipped.
//!
//! Any failure aborts the restore, is logged, and is re-thrown wrapped. The
//! registry may then be left freshly reset (empty) — never partially
//! populated and silently successful.

use std::sync::Arc;
use std::time::Instant;

use crate::models::time::{SystemTimeProvider, TimeProvider};
use crate::models::{ConnectionMap, EnhancedNode, NodeData, RestoreOutcome, RestoreStats};
use crate::registry::NodeRegistry;
use crate::sync::error::SyncError;

/// Restores registry state from persisted snapshots.
pub struct StateRestorer {
    time: Arc<dyn TimeProvider>,
}

impl Default for StateRestorer {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRestorer {
    pub fn new() -> Self {
        Self::with_time_provider(Arc::new(SystemTimeProvider))
    }

    /// Create a restorer with an explicit clock (deterministic stamps in tests)
    pub fn with_time_provider(time: Arc<dyn TimeProvider>) -> Self {
        Self { time }
    }

    /// Destructively reset the registry and repopulate it from a snapshot.
    ///
    /// The connection map must already be in canonical form; persisted
    /// documents are normalized by the single adapter at deserialization
    /// time (see
    /// [`connection_map_from_value`](crate::models::connection_map_from_value)),
    /// so no shape branching happens here.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Restore` when a registry lifecycle hook fails or
    /// a registry-sourced node's payload cannot be parsed into `NodeData`.
    /// Treat any error as fatal to the load operation: the registry is at
    /// worst freshly reset, and callers must start over.
    pub async fn restore(
        &self,
        nodes: &[EnhancedNode],
        connection_map: &ConnectionMap,
        registry: &mut dyn NodeRegistry,
    ) -> Result<RestoreOutcome, SyncError> {
        let started = Instant::now();
        tracing::debug!(
            "Restoring registry from snapshot: {} node(s), {} connection(s)",
            nodes.len(),
            connection_map.len()
        );

        match self
            .restore_inner(nodes, connection_map, registry, started)
            .await
        {
            Ok(outcome) => {
                tracing::info!(
                    "Restore complete: {} node(s), {} connection(s) in {}ms",
                    outcome.stats.restored_nodes,
                    outcome.stats.restored_connections,
                    outcome.stats.processing_time_ms
                );
                Ok(outcome)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Restore failed, registry left reset: {}", message);
                Err(SyncError::restore_failed(message))
            }
        }
    }

    async fn restore_inner(
        &self,
        nodes: &[EnhancedNode],
        connection_map: &ConnectionMap,
        registry: &mut dyn NodeRegistry,
        started: Instant,
    ) -> Result<RestoreOutcome, SyncError> {
        // Full reset must complete before any repopulation begins
        registry
            .cleanup()
            .await
            .map_err(|e| SyncError::restore_failed(format!("registry cleanup failed: {e}")))?;
        registry
            .initialize()
            .await
            .map_err(|e| SyncError::restore_failed(format!("registry initialize failed: {e}")))?;

        let now = self.time.now();
        let mut restored_connections = 0usize;

        for (id, connection) in connection_map {
            let mut connection = connection.clone();
            connection.restored_at = Some(now);
            registry.insert_connection(id, connection);
            restored_connections += 1;
        }

        let mut restored_nodes = 0usize;
        for node in nodes {
            if !node.is_registry_sourced() {
                continue;
            }
            let Some(payload) = node.data.as_ref() else {
                continue;
            };
            let data = NodeData::from_value(payload.clone()).map_err(|e| {
                SyncError::restore_failed(format!("node '{}' payload rejected: {e}", node.id))
            })?;
            registry.insert_node(&node.id, data);
            restored_nodes += 1;
        }

        Ok(RestoreOutcome {
            success: true,
            stats: RestoreStats {
                restored_nodes,
                restored_connections,
                processing_time_ms: started.elapsed().as_millis() as u64,
                timestamp: now,
            },
        })
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "restore_test.rs"]
mod restore_test;
