//! Sync Layer Error Types
//!
//! This module defines the error taxonomy for the synchronization pipeline:
//!
//! - **Merge** — unexpected failure while combining graph state; fatal to
//!   the save operation and propagated to the caller.
//! - **Validation** — schema errors found by the integrity validator; the
//!   validator itself never fails, but the save orchestration treats its
//!   errors as blocking and surfaces them through this variant.
//! - **Restore** — any failure during state restoration; fatal to the load
//!   operation. The registry may be left freshly reset (empty), never
//!   partially populated and silently successful.
//!
//! Fidelity warnings are advisory and never become errors; they live in
//! [`ValidationResult`](crate::models::ValidationResult) warnings.

use thiserror::Error;

/// Synchronization pipeline errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// Failure while merging positional and semantic graph state
    #[error("Failed to merge graph state: {context}")]
    Merge { context: String },

    /// Failure while restoring registry state from a snapshot
    #[error("Failed to restore graph state: {context}")]
    Restore { context: String },

    /// Snapshot rejected by the integrity validator
    #[error("Snapshot failed integrity validation with {} error(s): {}", errors.len(), errors.join("; "))]
    Validation { errors: Vec<String> },

    /// Snapshot document (de)serialization failed
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Create a merge error with context
    pub fn merge_failed(context: impl Into<String>) -> Self {
        Self::Merge {
            context: context.into(),
        }
    }

    /// Create a restore error with context
    pub fn restore_failed(context: impl Into<String>) -> Self {
        Self::Restore {
            context: context.into(),
        }
    }

    /// Create a validation rejection from the validator's error list
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }
}
