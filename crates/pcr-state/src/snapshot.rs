use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};

/// Serializable copy of committed world state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: String,
    pub value: SnapshotValue,
}

/// A stored value. UTF-8 values are kept as text so snapshot files stay
/// readable; anything else is kept as a byte array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl SnapshotValue {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

impl SnapshotEntry {
    pub fn new(key: String, value: Vec<u8>) -> Self {
        let value = match String::from_utf8(value) {
            Ok(text) => SnapshotValue::Text(text),
            Err(err) => SnapshotValue::Bytes(err.into_bytes()),
        };
        Self { key, value }
    }
}

impl StateSnapshot {
    /// Read a snapshot from a JSON file. A missing file is an empty state.
    pub fn load(path: &Path) -> StateResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read(path)?;
        serde_json::from_slice(&data).map_err(|e| StateError::Serialization(e.to_string()))
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> StateResult<()> {
        let data =
            serde_json::to_vec_pretty(self).map_err(|e| StateError::Serialization(e.to_string()))?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
