//! Data Models
//!
//! This module contains the core data structures used throughout Flowgraph:
//!
//! - `GraphNode` / `Edge` - positional (layout-only) graph owned by the renderer
//! - `NodeData` - semantic node state owned by the live registry
//! - `Connection` / `ConnectionMap` - inter-node links and their canonical map form
//! - Snapshot types (`EnhancedNode`, `MergeResult`, `SnapshotDocument`, ...)
//!
//! Semantic payloads inside snapshots stay pure JSON and become typed
//! `NodeData` only at the registry boundary.

mod connection;
mod node;
mod snapshot;
pub mod time;

pub use connection::{connection_map_from_value, Connection, ConnectionMap, ConnectionMeta};
pub use node::{
    Edge, ErrorSection, GraphNode, InputSection, NodeData, NodeError, NodeKind, NodeMeta,
    OutputMeta, OutputSection, OutputStatus, Position, ValidationError,
};
pub use snapshot::{
    DocumentMetadata, EnhancedMetadata, EnhancedNode, MergeResult, MergeStats, RestoreOutcome,
    RestoreStats, SnapshotDocument, SnapshotSource, SplitResult, ValidationResult,
    ValidationStats, FALLBACK_WARNING, SNAPSHOT_FORMAT_VERSION,
};
