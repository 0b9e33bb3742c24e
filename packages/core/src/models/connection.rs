//! Connection Data Structures
//!
//! A [`Connection`] is a directed, per-handle link between two nodes carrying
//! the last transferred value and bookkeeping metadata. The registry owns the
//! live connection map; snapshots carry a verbatim copy of it, with each
//! entry stamped `exportedAt` on merge and `restoredAt` on restore.
//!
//! [`ConnectionMap`] is the one canonical map form used everywhere in this
//! crate: an ordered `BTreeMap` keyed by connection id. Persisted documents
//! written by older runtimes serialize the map either as a JSON object or as
//! an array of `[key, value]` pairs; [`connection_map_from_value`] is the
//! single adapter that normalizes both shapes at the interface boundary, so
//! no downstream logic ever branches on runtime shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::models::node::ValidationError;

/// Canonical ordered connection map, keyed by connection id.
pub type ConnectionMap = BTreeMap<String, Connection>;

/// Bookkeeping metadata for a connection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionMeta {
    /// When a value last moved across this connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed: Option<DateTime<Utc>>,

    /// Declared type of the transferred payload (e.g., "object", "text")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    #[serde(default)]
    pub bidirectional: bool,
}

/// Directed per-handle link between two nodes.
///
/// `source_node_id` is serde-defaulted rather than mandatory: malformed
/// persisted entries must still load, because shape checking is exclusively
/// the integrity validator's responsibility and restore performs none.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default)]
    pub source_node_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    /// Last value transferred across this connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ConnectionMeta>,

    /// Stamped by the merge engine when the connection enters a snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,

    /// Stamped by the state restorer when the connection re-enters the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored_at: Option<DateTime<Utc>>,
}

impl Connection {
    /// Create a connection between two nodes with default metadata
    pub fn new(source_node_id: impl Into<String>, target_node_id: impl Into<String>) -> Self {
        Self {
            source_node_id: source_node_id.into(),
            target_node_id: Some(target_node_id.into()),
            meta: Some(ConnectionMeta::default()),
            ..Self::default()
        }
    }

    /// Whether this entry satisfies the snapshot schema: a source node id
    /// and a metadata block must both be present.
    pub fn is_schema_valid(&self) -> bool {
        !self.source_node_id.is_empty() && self.meta.is_some()
    }
}

/// Normalize an untyped connection-map value into the canonical
/// [`ConnectionMap`].
///
/// Accepts either of the two shapes found in persisted documents:
///
/// - a JSON object: `{"conn-1": {...}, "conn-2": {...}}`
/// - an array of `[key, value]` pairs (the serialized form of a JS `Map`):
///   `[["conn-1", {...}], ["conn-2", {...}]]`
///
/// `null` normalizes to an empty map, matching a document saved with no
/// connections.
///
/// # Errors
///
/// Returns `ValidationError::InvalidConnectionMap` for any other shape, or
/// when an individual entry cannot be read as a connection.
pub fn connection_map_from_value(value: &serde_json::Value) -> Result<ConnectionMap, ValidationError> {
    match value {
        serde_json::Value::Null => Ok(ConnectionMap::new()),
        serde_json::Value::Object(entries) => {
            let mut map = ConnectionMap::new();
            for (id, entry) in entries {
                let connection: Connection = serde_json::from_value(entry.clone())
                    .map_err(|e| invalid_entry(id, &e))?;
                map.insert(id.clone(), connection);
            }
            Ok(map)
        }
        serde_json::Value::Array(pairs) => {
            let mut map = ConnectionMap::new();
            for pair in pairs {
                let (id, entry) = match pair.as_array().map(|p| p.as_slice()) {
                    Some([id, entry]) => match id.as_str() {
                        Some(id) => (id, entry),
                        None => {
                            return Err(ValidationError::InvalidConnectionMap(
                                "pair key is not a string".to_string(),
                            ))
                        }
                    },
                    _ => {
                        return Err(ValidationError::InvalidConnectionMap(
                            "array form must contain [key, value] pairs".to_string(),
                        ))
                    }
                };
                let connection: Connection = serde_json::from_value(entry.clone())
                    .map_err(|e| invalid_entry(id, &e))?;
                map.insert(id.to_string(), connection);
            }
            Ok(map)
        }
        other => Err(ValidationError::InvalidConnectionMap(format!(
            "expected object or [key, value] pairs, got {other}"
        ))),
    }
}

fn invalid_entry(id: &str, err: &serde_json::Error) -> ValidationError {
    ValidationError::InvalidConnectionMap(format!("entry '{id}': {err}"))
}

/// Serde deserializer for document fields holding a connection map in either
/// persisted shape. Delegates to [`connection_map_from_value`].
pub(crate) fn deserialize_connection_map<'de, D>(deserializer: D) -> Result<ConnectionMap, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    connection_map_from_value(&value).map_err(serde::de::Error::custom)
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;
