//! Graph Synchronization Pipeline
//!
//! The core of Flowgraph: keeps the positional graph (renderer-owned) and
//! the semantic graph (registry-owned) consistent through one persistable
//! snapshot format.
//!
//! - [`MergeEngine`] - combine positional + semantic state into a snapshot
//! - [`validate_merge_result`] - integrity validation with fidelity scoring
//! - [`StateRestorer`] - destructive repopulation of the registry
//! - [`split_snapshot`] / [`split_merge_result`] - decompose a snapshot back
//!   into its two live views
//! - [`save_snapshot`] / [`load_snapshot`] - the two sequenced paths:
//!   merge → validate → document, and document → restore → split (with a
//!   positional-only fallback for legacy documents)
//!
//! The pipeline is stateless except for the restorer's destructive reset
//! checkpoint. Save and load must never interleave against the same
//! registry instance; no internal locking exists, matching the embedding
//! UI's single-threaded cooperative model.

pub mod error;
pub mod merge;
pub mod restore;
pub mod split;
pub mod validate;

pub use error::SyncError;
pub use merge::{MergeEngine, MergeFailure};
pub use restore::StateRestorer;
pub use split::{split_merge_result, split_snapshot};
pub use validate::{validate_merge_result, LOW_FIDELITY_THRESHOLD};

use std::collections::BTreeMap;

use crate::models::{
    ConnectionMap, DocumentMetadata, Edge, GraphNode, RestoreStats, SnapshotDocument,
    SNAPSHOT_FORMAT_VERSION,
};
use crate::registry::NodeRegistry;

/// Graph state produced by [`load_snapshot`], ready to hand to the
/// positional setters and (already applied to) the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGraph {
    pub nodes: Vec<GraphNode>,

    pub edges: Vec<Edge>,

    /// Semantic payloads by node id; empty for legacy documents
    pub node_data_map: BTreeMap<String, serde_json::Value>,

    pub connection_map: ConnectionMap,

    /// Present only when the enhanced path ran the state restorer
    pub restore_stats: Option<RestoreStats>,
}

/// Save path: merge → validate → document.
///
/// Validation errors block the save; warnings (low fidelity, fallback
/// nodes) do not. The returned document is what the persistence layer
/// stores verbatim.
///
/// # Errors
///
/// - `SyncError::Merge` when the merge itself fails
/// - `SyncError::Validation` when the validator finds schema errors
pub fn save_snapshot(
    engine: &mut MergeEngine,
    nodes: &[GraphNode],
    edges: &[Edge],
    registry: &dyn NodeRegistry,
) -> Result<SnapshotDocument, SyncError> {
    let result = engine.merge(nodes, edges, registry)?;
    let validation = validate_merge_result(&result);

    if !validation.is_valid {
        tracing::warn!(
            "Snapshot rejected: {} validation error(s)",
            validation.errors.len()
        );
        return Err(SyncError::validation_failed(validation.errors));
    }

    let saved_at = result.stats.timestamp;
    let data_fidelity = validation.stats.data_fidelity_score;
    Ok(SnapshotDocument {
        nodes: result.nodes,
        edges: result.edges,
        connection_map: result.connection_map,
        enhanced_metadata: Some(DocumentMetadata {
            version: SNAPSHOT_FORMAT_VERSION.to_string(),
            saved_at,
            data_fidelity,
            stats: result.stats,
            validation,
        }),
    })
}

/// Load path: document → restore → split.
///
/// Enhanced documents (`enhancedMetadata.version == "2.0.0"`) run the
/// destructive restore and return both views plus restore stats. Legacy
/// documents bypass the state restorer entirely and load positional data
/// only — the registry is not touched.
///
/// # Errors
///
/// Returns `SyncError::Restore` when the enhanced path fails; the registry
/// is then at worst freshly reset, and the caller must treat the load as
/// failed outright.
pub async fn load_snapshot(
    restorer: &StateRestorer,
    document: &SnapshotDocument,
    registry: &mut dyn NodeRegistry,
) -> Result<LoadedGraph, SyncError> {
    if !document.is_enhanced() {
        tracing::info!(
            "Legacy document ({} node(s)): loading positional data only",
            document.nodes.len()
        );
        return Ok(LoadedGraph {
            nodes: document.nodes.iter().map(|n| n.to_graph_node()).collect(),
            edges: document.edges.clone(),
            node_data_map: BTreeMap::new(),
            connection_map: ConnectionMap::new(),
            restore_stats: None,
        });
    }

    let outcome = restorer
        .restore(&document.nodes, &document.connection_map, registry)
        .await?;

    let stats = document.enhanced_metadata.as_ref().map(|m| &m.stats);
    let split = split_snapshot(&document.nodes, &document.edges, &document.connection_map, stats);

    Ok(LoadedGraph {
        nodes: split.nodes,
        edges: split.edges,
        node_data_map: split.node_data_map,
        connection_map: split.connection_map,
        restore_stats: Some(outcome.stats),
    })
}
