//! Live Runtime Registry Boundary
//!
//! The registry owns the semantic graph: per-node `NodeData` and the live
//! connection map. This module defines the trait the sync pipeline consumes
//! ([`NodeRegistry`]) and an in-memory implementation used by tests and
//! in-process embeddings.

pub mod error;
pub mod node_registry;

pub use error::RegistryError;
pub use node_registry::{InMemoryRegistry, NodeRegistry, UpdateCallback};
