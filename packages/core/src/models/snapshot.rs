//! Snapshot Data Structures
//!
//! Types produced and consumed by the synchronization pipeline:
//!
//! - [`EnhancedNode`]: a positional node merged with its semantic payload
//!   plus provenance metadata.
//! - [`MergeResult`] / [`MergeStats`]: ephemeral output of one merge call.
//! - [`ValidationResult`]: outcome of integrity validation, including the
//!   data fidelity score.
//! - [`SnapshotDocument`]: the single JSON document handed to the
//!   persistence layer. `enhancedMetadata.version == "2.0.0"` marks the
//!   full-fidelity format; a document without it is legacy and is loaded
//!   through the positional-only fallback path.
//! - [`SplitResult`]: the decomposition of a snapshot back into
//!   positional-only and semantic-only views.
//!
//! Snapshots are ephemeral until persisted; node payloads inside them stay
//! pure JSON (`serde_json::Value`) and only become typed
//! [`NodeData`](crate::models::NodeData) again at the registry boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::connection::{deserialize_connection_map, ConnectionMap};
use crate::models::node::{Edge, GraphNode, Position};

/// Document format marker for full-fidelity snapshots.
pub const SNAPSHOT_FORMAT_VERSION: &str = "2.0.0";

/// Warning attached to nodes that could not be resolved from the registry.
pub const FALLBACK_WARNING: &str = "Missing NodeData - using fallback";

/// Provenance of a snapshot node's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotSource {
    /// Resolved from the live node registry (full semantic payload)
    #[serde(rename = "nodeDataManager")]
    NodeDataManager,
    /// Positional fallback: the registry had no entry for this node
    #[serde(rename = "reactFlow")]
    ReactFlow,
}

/// Provenance metadata stamped onto every merged node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedMetadata {
    /// When the merge produced this node
    pub last_sync: DateTime<Utc>,

    pub source: SnapshotSource,

    pub has_connections: bool,

    pub connection_count: usize,

    /// Semantic data version at merge time (0 for fallback nodes)
    #[serde(default)]
    pub data_version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// A positional node merged with its semantic payload and provenance.
///
/// `data` holds the full `NodeData` as pure JSON for registry-sourced nodes,
/// or the renderer's original payload for fallback nodes. Legacy documents
/// deserialize into this type too: their nodes simply carry no
/// `enhancedMetadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedNode {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub selected: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragging: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_metadata: Option<EnhancedMetadata>,
}

impl EnhancedNode {
    /// Whether this node's payload came from the live registry
    pub fn is_registry_sourced(&self) -> bool {
        matches!(
            self.enhanced_metadata.as_ref().map(|m| m.source),
            Some(SnapshotSource::NodeDataManager)
        )
    }

    /// Project back to the minimal positional node the rendering layer owns.
    ///
    /// `dragging`/`width`/`height` carry over only when present on the
    /// source; provenance metadata is dropped.
    pub fn to_graph_node(&self) -> GraphNode {
        GraphNode {
            id: self.id.clone(),
            node_type: self.node_type.clone(),
            position: self.position,
            selected: self.selected,
            data: self.data.clone(),
            dragging: self.dragging,
            width: self.width,
            height: self.height,
        }
    }
}

/// Counters computed by one merge call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub total_nodes: usize,

    /// Registry-resolved nodes carrying at least one connection
    pub nodes_with_connections: usize,

    /// Sum of per-node incoming connection counts across resolved nodes
    pub total_connections: usize,

    /// Size of the registry's live connection map at merge time
    pub connections_map_size: usize,

    pub processing_time_ms: u64,

    pub timestamp: DateTime<Utc>,
}

/// Ephemeral output of one merge call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub nodes: Vec<EnhancedNode>,

    pub edges: Vec<Edge>,

    #[serde(deserialize_with = "deserialize_connection_map")]
    pub connection_map: ConnectionMap,

    pub stats: MergeStats,

    /// Always empty as produced by the merge engine, which performs no
    /// schema checks. Validation errors block the save outright, so any
    /// persisted result carries an empty list; the field is here for
    /// callers composing merge and validation themselves
    #[serde(default)]
    pub validation_errors: Vec<String>,
}

/// Counters accumulated during integrity validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    /// Every node examined, valid or not
    pub nodes_validated: usize,

    /// Every connection-map entry examined, valid or not
    pub connections_validated: usize,

    /// 100 × (registry-resolved nodes) / (total nodes); 100 for an empty graph
    pub data_fidelity_score: f64,
}

/// Outcome of integrity validation over a [`MergeResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,

    /// Schema errors; any entry forces `is_valid == false`
    pub errors: Vec<String>,

    /// Advisory findings; never affect `is_valid`
    pub warnings: Vec<String>,

    pub stats: ValidationStats,
}

/// Snapshot-level metadata embedded in the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Format marker; `"2.0.0"` for full-fidelity documents
    pub version: String,

    pub saved_at: DateTime<Utc>,

    /// Fidelity score at save time
    pub data_fidelity: f64,

    pub stats: MergeStats,

    pub validation: ValidationResult,
}

/// The single JSON document exchanged with the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub nodes: Vec<EnhancedNode>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(default, deserialize_with = "deserialize_connection_map")]
    pub connection_map: ConnectionMap,

    /// Absent on legacy documents written before the full-fidelity format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_metadata: Option<DocumentMetadata>,
}

impl SnapshotDocument {
    /// Whether this document carries the full-fidelity enhanced format.
    ///
    /// Anything else — no metadata block, or an unrecognized version — is
    /// loaded through the positional-only fallback path that bypasses the
    /// state restorer entirely.
    pub fn is_enhanced(&self) -> bool {
        self.enhanced_metadata
            .as_ref()
            .map(|m| m.version == SNAPSHOT_FORMAT_VERSION)
            .unwrap_or(false)
    }
}

/// Decomposition of a snapshot into positional-only and semantic-only views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResult {
    /// Minimal positional nodes for the rendering layer
    pub nodes: Vec<GraphNode>,

    pub edges: Vec<Edge>,

    /// Semantic payloads keyed by node id; registry-sourced nodes only
    pub node_data_map: BTreeMap<String, serde_json::Value>,

    #[serde(deserialize_with = "deserialize_connection_map")]
    pub connection_map: ConnectionMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<MergeStats>,
}

/// Counters returned by a successful restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreStats {
    pub restored_nodes: usize,

    pub restored_connections: usize,

    pub processing_time_ms: u64,

    pub timestamp: DateTime<Utc>,
}

/// Successful outcome of a state restoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOutcome {
    pub success: bool,

    pub stats: RestoreStats,
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;
