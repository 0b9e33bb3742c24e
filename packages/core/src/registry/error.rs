//! Registry Error Types
//!
//! This module defines error types for node registry operations. Most
//! registry calls are infallible in-memory writes; errors arise at the JSON
//! boundary where untyped payloads become typed `NodeData`, and in the async
//! lifecycle hooks (which report through `anyhow`, matching the trait).

use crate::models::ValidationError;
use thiserror::Error;

/// Node registry operation errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Registration payload failed boundary validation
    #[error("Node registration rejected for '{id}': {source}")]
    RegistrationRejected {
        id: String,
        source: ValidationError,
    },
}

impl RegistryError {
    /// Create a registration rejected error
    pub fn registration_rejected(id: impl Into<String>, source: ValidationError) -> Self {
        Self::RegistrationRejected {
            id: id.into(),
            source,
        }
    }
}
