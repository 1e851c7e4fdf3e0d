// SPDX-License-Identifier: BUSL-1.1
//! In-memory identity records keyed by `request_id`, backed by DashMap.
//!
//! Records are stored as their serialized JSON bytes so the decode route
//! encrypts exactly what was seeded.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

/// Errors seeding the record store from disk.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("reading records file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("records file {path} is not a JSON object of request_id -> record: {reason}")]
    Format { path: String, reason: String },
}

/// Shared record store. Cheaply cloneable; all clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Arc<DashMap<String, Vec<u8>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `record` under `request_id`, replacing any previous one.
    pub fn insert(&self, request_id: impl Into<String>, record: &Value) {
        self.records
            .insert(request_id.into(), record.to_string().into_bytes());
    }

    /// Register raw plaintext bytes under `request_id`.
    pub fn insert_raw(&self, request_id: impl Into<String>, plaintext: Vec<u8>) {
        self.records.insert(request_id.into(), plaintext);
    }

    pub fn get(&self, request_id: &str) -> Option<Vec<u8>> {
        self.records.get(request_id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load records from a JSON file shaped `{"<request_id>": {...}, ...}`.
    pub fn load_file(&self, path: &Path) -> Result<usize, SeedError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: display.clone(),
            source,
        })?;
        self.load_json(&raw).map_err(|reason| SeedError::Format {
            path: display,
            reason,
        })
    }

    fn load_json(&self, raw: &str) -> Result<usize, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let Value::Object(map) = value else {
            return Err("top-level value must be an object".to_string());
        };
        let count = map.len();
        for (request_id, record) in map {
            self.insert(request_id, &record);
        }
        Ok(count)
    }
}
