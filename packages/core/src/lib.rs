//! Flowgraph Graph-State Synchronization Core
//!
//! This crate keeps the two parallel representations of a visual workflow
//! graph consistent: the **positional graph** (layout-only nodes/edges owned
//! by the rendering layer) and the **semantic graph** (per-node
//! configuration, inputs, outputs, errors, and connections owned by the live
//! node registry). It merges both into one full-fidelity persistable
//! snapshot, validates its integrity, and later restores/splits it back into
//! the two live views without data loss.
//!
//! # Architecture
//!
//! - **Pure JSON payloads**: semantic state inside snapshots stays
//!   `serde_json::Value` and becomes typed `NodeData` only at the registry
//!   boundary (single validation point)
//! - **Explicit registry injection**: merge/validate/restore/split all take
//!   the registry as a parameter; no hidden global instance
//! - **One canonical connection map**: persisted map shapes are normalized
//!   by a single adapter at the document boundary
//! - **Sequenced paths**: save is merge → validate → persist; load is
//!   restore → split; the two must never interleave on one registry
//!
//! This core does not render anything, does not execute node plugins, and
//! does not decide when to save or load.
//!
//! # Modules
//!
//! - [`models`] - Data structures (positional nodes, `NodeData`, snapshots)
//! - [`registry`] - Live runtime registry boundary and in-memory implementation
//! - [`sync`] - Merge engine, integrity validator, state restorer, splitter

pub mod models;
pub mod registry;
pub mod sync;

// Re-export commonly used types
pub use models::*;
pub use registry::{InMemoryRegistry, NodeRegistry, RegistryError, UpdateCallback};
pub use sync::{
    load_snapshot, save_snapshot, split_merge_result, split_snapshot, validate_merge_result,
    LoadedGraph, MergeEngine, StateRestorer, SyncError,
};
