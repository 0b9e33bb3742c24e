//! Graph Node Data Structures
//!
//! This module defines the two node representations the synchronization core
//! works with:
//!
//! - **Positional nodes** ([`GraphNode`], [`Edge`]): the lightweight,
//!   layout-only view owned by the rendering layer (position, selection,
//!   sizing — no semantic state).
//! - **Semantic node data** ([`NodeData`]): the live runtime state per node —
//!   configuration, aggregated inputs, outputs, and error state — owned by
//!   the node registry.
//!
//! # Architecture
//!
//! - **Closed node kinds**: `NodeData` carries a [`NodeKind`] tag
//!   (`Input | Process | Output`) instead of being probed structurally.
//! - **Single validation point**: untyped JSON becomes `NodeData` only
//!   through [`NodeData::from_value`], at the registry boundary. Snapshot
//!   payloads stay pure JSON until they cross that boundary.
//! - **Wire compatibility**: all types serialize camelCase to match the JSON
//!   snapshot document the editor persists.
//!
//! # Examples
//!
//! ```rust
//! use flowgraph_core::models::{NodeData, NodeKind};
//! use serde_json::json;
//!
//! let data = NodeData::new(NodeKind::Process, "Sum", "aggregate", "🧮");
//! assert_eq!(data.connection_count(), 0);
//!
//! // Boundary validation from untyped JSON
//! let parsed = NodeData::from_value(data.to_value().unwrap()).unwrap();
//! assert_eq!(parsed.meta.label, "Sum");
//! ```

use crate::models::connection::ConnectionMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default version value for serde deserialization (version 1)
fn default_version() -> i64 {
    1
}

/// Validation errors for graph node and node data operations
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid node data: {0}")]
    InvalidNodeData(String),

    #[error("Invalid connection map: {0}")]
    InvalidConnectionMap(String),

    #[error("Invalid node ID format: {0}")]
    InvalidId(String),
}

/// 2D layout position of a positional node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Positional (layout-only) node owned by the rendering layer.
///
/// Carries identity and layout, never semantic state. The optional `data`
/// payload is pure JSON and belongs to the renderer; this core passes it
/// through untouched except when merging in registry state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique identifier within a graph snapshot
    pub id: String,

    /// Renderer node type (e.g., "form", "process", "output")
    #[serde(rename = "type")]
    pub node_type: String,

    /// Layout position
    #[serde(default)]
    pub position: Position,

    /// Selection state
    #[serde(default)]
    pub selected: bool,

    /// Renderer-owned payload (pure JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Drag state, present only while the renderer tracks it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragging: Option<bool>,

    /// Measured width, present only after layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Measured height, present only after layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl GraphNode {
    /// Create a positional node with the given id and type at the origin
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            position: Position::default(),
            selected: false,
            data: None,
            dragging: None,
            width: None,
            height: None,
        }
    }

    /// Validate identity fields
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if `id` or `type` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }
        if self.node_type.is_empty() {
            return Err(ValidationError::MissingField("type".to_string()));
        }
        Ok(())
    }
}

/// Positional edge between two nodes. Pass-through for this core: merge,
/// restore, and split never inspect edge contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            animated: None,
        }
    }
}

/// Closed set of semantic node kinds.
///
/// Replaces structural probing ("does it look like an input node?") with a
/// tag validated once at the registry boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Source node: produces data from user configuration (forms, fetchers)
    Input,
    /// Transform node: aggregates upstream inputs and emits derived data
    Process,
    /// Sink node: renders or exports its aggregated input
    Output,
}

/// Descriptive metadata section of [`NodeData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    /// Human-readable label shown in the editor
    pub label: String,

    /// Behavior identifier resolved by the plugin engine
    pub function: String,

    /// Editor glyph
    #[serde(default)]
    pub emoji: String,

    /// Semantic data version, incremented by the runtime on node updates
    #[serde(default = "default_version")]
    pub version: i64,

    /// Closed node kind tag
    pub kind: NodeKind,

    /// Optional palette category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Input section: configuration plus aggregated upstream connections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSection {
    /// Node configuration (pure JSON, schema owned by the node's plugin)
    #[serde(default)]
    pub config: serde_json::Value,

    /// Incoming connections keyed by connection id
    #[serde(default)]
    pub connections: ConnectionMap,

    /// Last processed aggregate of all incoming values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<serde_json::Value>,
}

/// Processing status carried in [`OutputMeta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Bookkeeping metadata for a node's output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMeta {
    #[serde(default)]
    pub status: OutputStatus,

    /// When the output was last produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Output section: last emitted data plus status metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSection {
    /// Last emitted value (pure JSON)
    #[serde(default)]
    pub data: serde_json::Value,

    #[serde(default)]
    pub meta: OutputMeta,
}

/// A single recorded node error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeError {
    #[serde(default)]
    pub code: String,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Which stage produced the error (e.g., "processing", "validation")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Error section: current error state of a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSection {
    #[serde(default)]
    pub has_error: bool,

    #[serde(default)]
    pub errors: Vec<NodeError>,
}

/// Semantic node state held by the live runtime registry.
///
/// Four mandatory sections — `meta`, `input`, `output`, `error` — mirror the
/// snapshot document's per-node payload. A snapshot node whose provenance is
/// the registry must carry all four; the integrity validator enforces this
/// on untyped snapshot JSON, while typed `NodeData` guarantees it
/// structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub meta: NodeMeta,
    pub input: InputSection,
    pub output: OutputSection,
    pub error: ErrorSection,
}

impl NodeData {
    /// Create node data with empty sections
    pub fn new(
        kind: NodeKind,
        label: impl Into<String>,
        function: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            meta: NodeMeta {
                label: label.into(),
                function: function.into(),
                emoji: emoji.into(),
                version: 1,
                kind,
                category: None,
            },
            input: InputSection::default(),
            output: OutputSection::default(),
            error: ErrorSection::default(),
        }
    }

    /// Parse node data from untyped JSON.
    ///
    /// This is the single validation point where snapshot or caller JSON
    /// becomes typed registry state. Everything past this boundary can rely
    /// on the four sections being present and well-formed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidNodeData` when the value does not
    /// carry the four mandatory sections or a recognized `kind` tag.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::InvalidNodeData(e.to_string()))
    }

    /// Serialize into the pure-JSON form carried by snapshot nodes.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidNodeData` if serialization fails,
    /// which only happens for non-finite floats smuggled into a JSON payload.
    pub fn to_value(&self) -> Result<serde_json::Value, ValidationError> {
        serde_json::to_value(self).map_err(|e| ValidationError::InvalidNodeData(e.to_string()))
    }

    /// Number of incoming connections aggregated on this node
    pub fn connection_count(&self) -> usize {
        self.input.connections.len()
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
