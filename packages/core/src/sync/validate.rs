//! Integrity Validator
//!
//! Pure validation of a [`MergeResult`] against the snapshot schema and
//! connection invariants. The validator never mutates its input and never
//! fails: it is a total function that accumulates findings non-abortingly
//! and always returns a well-formed [`ValidationResult`].
//!
//! # Severity rules
//!
//! - **Errors** (flip `is_valid`): a registry-sourced node missing its
//!   `data` payload or any of the four mandatory sections; a connection
//!   entry missing `sourceNodeId` or `meta` — checked both on the top-level
//!   connection map and on every registry-sourced node's
//!   `input.connections` entries.
//! - **Warnings** (advisory only): missing enhanced metadata, positional
//!   fallback nodes, and a data fidelity score below
//!   [`LOW_FIDELITY_THRESHOLD`]. A low score never flips `is_valid` by
//!   itself — only structural errors do.
//!
//! The four-section check applies to registry-sourced nodes only: a
//! positional fallback node is a fidelity degradation, not a schema
//! violation, and validates clean. Each connection entry is checked
//! independently; one malformed entry never skips the rest.

use crate::models::{MergeResult, SnapshotSource, ValidationResult, ValidationStats};

/// Fidelity score below which a warning is emitted.
pub const LOW_FIDELITY_THRESHOLD: f64 = 80.0;

/// Mandatory sections of a registry-sourced node's snapshot payload.
const REQUIRED_SECTIONS: [&str; 4] = ["meta", "input", "output", "error"];

/// Validate a merge result against schema and connection invariants.
///
/// Pure and total: the input is never mutated, every node and connection is
/// examined (and counted) regardless of earlier findings, and the same
/// input always produces the same result.
pub fn validate_merge_result(result: &MergeResult) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut stats = ValidationStats::default();
    let mut resolved_nodes = 0usize;

    for node in &result.nodes {
        stats.nodes_validated += 1;

        let Some(metadata) = node.enhanced_metadata.as_ref() else {
            warnings.push(format!("Node '{}': missing enhanced metadata", node.id));
            continue;
        };

        match metadata.source {
            SnapshotSource::NodeDataManager => {
                resolved_nodes += 1;
                match node.data.as_ref() {
                    None => {
                        errors.push(format!("Node '{}': missing data object", node.id));
                    }
                    Some(payload) => {
                        for section in REQUIRED_SECTIONS {
                            if payload.get(section).is_none() {
                                errors.push(format!(
                                    "Node '{}': missing {} section",
                                    node.id, section
                                ));
                            }
                        }
                        validate_node_connections(&node.id, payload, &mut errors, &mut stats);
                    }
                }
            }
            SnapshotSource::ReactFlow => {
                warnings.push(format!(
                    "Node '{}': positional fallback, no registry data",
                    node.id
                ));
            }
        }
    }

    for (id, connection) in &result.connection_map {
        stats.connections_validated += 1;

        // Checked independently so one bad field never masks the other
        if connection.source_node_id.is_empty() {
            errors.push(format!("Connection '{id}': missing sourceNodeId"));
        }
        if connection.meta.is_none() {
            errors.push(format!("Connection '{id}': missing meta"));
        }
    }

    stats.data_fidelity_score = fidelity_score(resolved_nodes, result.nodes.len());
    if stats.data_fidelity_score < LOW_FIDELITY_THRESHOLD {
        warnings.push(format!(
            "Low data fidelity score: {:.1}",
            stats.data_fidelity_score
        ));
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        stats,
    }
}

/// Check the connection entries aggregated on a node's `input.connections`.
///
/// These are untyped snapshot JSON (documents from older writers may carry
/// arbitrary shapes), so each entry is probed for the two mandatory fields.
/// Every entry is counted and checked independently; a node whose `data` is
/// missing never reaches this pass.
fn validate_node_connections(
    node_id: &str,
    payload: &serde_json::Value,
    errors: &mut Vec<String>,
    stats: &mut ValidationStats,
) {
    let Some(connections) = payload
        .pointer("/input/connections")
        .and_then(|c| c.as_object())
    else {
        return;
    };

    for (connection_id, entry) in connections {
        stats.connections_validated += 1;

        let has_source = entry
            .get("sourceNodeId")
            .and_then(|v| v.as_str())
            .map(|s| !s.is_empty())
            .unwrap_or(false);
        if !has_source {
            errors.push(format!(
                "Node '{node_id}' connection '{connection_id}': missing sourceNodeId"
            ));
        }
        if entry.get("meta").is_none() {
            errors.push(format!(
                "Node '{node_id}' connection '{connection_id}': missing meta"
            ));
        }
    }
}

/// `100 × resolved / total`, with an empty graph scoring 100 (vacuously
/// complete). Deterministic per merge result.
fn fidelity_score(resolved: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    100.0 * resolved as f64 / total as f64
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;
