//! NodeRegistry Trait - Live Runtime Registry Boundary
//!
//! This module defines the `NodeRegistry` trait that abstracts the live
//! runtime registry the synchronization core reads from and writes to. The
//! trait enables the embedding application to supply its own registry while
//! the core's merge/validate/restore/split operations stay backend-agnostic.
//!
//! # Architecture
//!
//! - **Abstraction point**: between the sync pipeline and the runtime's
//!   event/dispatch machinery (which is out of scope here)
//! - **Explicit injection**: every sync operation takes the registry as a
//!   parameter; there is no hidden global instance
//! - **Async lifecycle**: `initialize`/`cleanup` are async because real
//!   registries tear down and rebuild event plumbing around them
//!
//! # Mutation contract
//!
//! Only the state restorer and `register_node`/insert calls mutate a
//! registry. Merge and validation are read-only observers; they are safe for
//! repeated reads but not against an in-flight restore — callers must
//! serialize save and load operations against one registry instance.
//!
//! # Examples
//!
//! ```rust
//! use flowgraph_core::registry::{InMemoryRegistry, NodeRegistry};
//! use flowgraph_core::models::{NodeData, NodeKind};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let mut registry = InMemoryRegistry::new();
//! registry.initialize().await?;
//!
//! let data = NodeData::new(NodeKind::Input, "Form", "form-input", "📝");
//! registry.register_node("n1", data, None);
//!
//! assert!(registry.node_data("n1").is_some());
//! registry.cleanup().await?;
//! assert!(registry.node_data("n1").is_none());
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::models::{Connection, ConnectionMap, NodeData};
use crate::registry::error::RegistryError;

/// Callback invoked whenever a registered node's data is written.
///
/// Registered alongside a node via [`NodeRegistry::register_node`]; the
/// runtime uses these to push semantic updates back into live node views.
pub type UpdateCallback = Box<dyn Fn(&str, &NodeData) + Send + Sync>;

/// Abstraction over the live runtime node registry.
///
/// Implementations must be `Send + Sync` so a registry handle can be shared
/// with the embedding application's async runtime.
#[async_trait]
pub trait NodeRegistry: Send + Sync {
    /// Look up a node's semantic data by id.
    ///
    /// Returns a clone; the registry retains ownership of its live state.
    fn node_data(&self, id: &str) -> Option<NodeData>;

    /// Ids of all registered nodes
    fn node_ids(&self) -> Vec<String>;

    /// Verbatim snapshot of the live connection map.
    ///
    /// The merge engine persists exactly this — no additions, no omissions.
    fn connections(&self) -> ConnectionMap;

    /// Write a node's semantic data, keyed by id.
    ///
    /// Fires the node's update callback when one is registered.
    fn insert_node(&mut self, id: &str, data: NodeData);

    /// Insert a connection into the live connection map
    fn insert_connection(&mut self, id: &str, connection: Connection);

    /// Register a node with an optional update callback.
    ///
    /// This is the boundary where callers hand semantic state to the
    /// runtime; untyped JSON should be parsed with
    /// [`NodeData::from_value`](crate::models::NodeData::from_value) before
    /// reaching this call.
    fn register_node(&mut self, id: &str, data: NodeData, callback: Option<UpdateCallback>);

    /// Bring the registry to a usable empty state.
    ///
    /// Must be awaited to completion before any repopulation begins.
    async fn initialize(&mut self) -> Result<()>;

    /// Tear down all registry state (nodes, connections, callbacks).
    async fn cleanup(&mut self) -> Result<()>;
}

/// In-memory registry implementation.
///
/// The live-runtime stand-in used by tests and by embeddings that keep the
/// whole graph in process. State lives in ordered maps so traversal and
/// snapshots are deterministic.
#[derive(Default)]
pub struct InMemoryRegistry {
    nodes: BTreeMap<String, NodeData>,
    connections: ConnectionMap,
    callbacks: BTreeMap<String, UpdateCallback>,
    initialized: bool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether `initialize()` has completed since the last `cleanup()`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Register a node from an untyped JSON payload.
    ///
    /// This is the single point where caller JSON crosses into typed
    /// registry state; the payload is validated here and nowhere deeper.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RegistrationRejected` when the payload does
    /// not parse into `NodeData`.
    pub fn register_node_from_value(
        &mut self,
        id: &str,
        payload: serde_json::Value,
        callback: Option<UpdateCallback>,
    ) -> Result<(), RegistryError> {
        let data = NodeData::from_value(payload)
            .map_err(|e| RegistryError::registration_rejected(id, e))?;
        self.register_node(id, data, callback);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("nodes", &self.nodes.len())
            .field("connections", &self.connections.len())
            .field("callbacks", &self.callbacks.len())
            .field("initialized", &self.initialized)
            .finish()
    }
}

#[async_trait]
impl NodeRegistry for InMemoryRegistry {
    fn node_data(&self, id: &str) -> Option<NodeData> {
        self.nodes.get(id).cloned()
    }

    fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    fn connections(&self) -> ConnectionMap {
        self.connections.clone()
    }

    fn insert_node(&mut self, id: &str, data: NodeData) {
        if let Some(callback) = self.callbacks.get(id) {
            callback(id, &data);
        }
        self.nodes.insert(id.to_string(), data);
    }

    fn insert_connection(&mut self, id: &str, connection: Connection) {
        self.connections.insert(id.to_string(), connection);
    }

    fn register_node(&mut self, id: &str, data: NodeData, callback: Option<UpdateCallback>) {
        if let Some(callback) = callback {
            self.callbacks.insert(id.to_string(), callback);
        }
        tracing::debug!("Registered node '{}' ({:?})", id, data.meta.kind);
        self.insert_node(id, data);
    }

    async fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        tracing::debug!("InMemoryRegistry initialized");
        Ok(())
    }

    async fn cleanup(&mut self) -> Result<()> {
        let nodes = self.nodes.len();
        let connections = self.connections.len();
        self.nodes.clear();
        self.connections.clear();
        self.callbacks.clear();
        self.initialized = false;
        tracing::debug!(
            "InMemoryRegistry cleaned up ({} nodes, {} connections dropped)",
            nodes,
            connections
        );
        Ok(())
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "node_registry_test.rs"]
mod node_registry_test;
