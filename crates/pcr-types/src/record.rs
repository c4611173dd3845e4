use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::temporal::{nanos_to_timestamp, Timestamp};

/// Well-known record type discriminators.
///
/// The type field is free text for generic creation; these are the values the
/// role-gated and query paths fix.
pub mod kind {
    pub const CAREPLAN: &str = "careplan";
    pub const PRESCRIPTION: &str = "prescription";
    pub const APPOINTMENT: &str = "appointment";
}

/// Persisted JSON field names.
///
/// Selector queries address records by these names, so they are part of the
/// on-ledger format and must not change.
pub mod fields {
    pub const OWNER: &str = "userID";
    pub const TYPE: &str = "type";
}

/// A sensitive record entry.
///
/// Only the digest of the submitted payload is kept; the plaintext never
/// reaches the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Composite key `{type}_{ownerID}_{creationNanos}`. Assigned once.
    pub id: String,
    /// Subject the record concerns.
    #[serde(rename = "userID")]
    pub owner_id: String,
    /// Hex digest of the most recently accepted payload.
    pub data_hash: String,
    /// Type discriminator, see [`kind`].
    #[serde(rename = "type")]
    pub record_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Replay-protection token consumed by the last write.
    pub nonce: String,
}

impl Record {
    /// Build a freshly created record. `created_at` and `updated_at` are both
    /// set from `created_nanos`, which also forms the id suffix.
    pub fn new(
        owner_id: impl Into<String>,
        record_type: impl Into<String>,
        data_hash: impl Into<String>,
        nonce: impl Into<String>,
        created_nanos: i64,
    ) -> Self {
        let owner_id = owner_id.into();
        let record_type = record_type.into();
        let created_at = nanos_to_timestamp(created_nanos);
        Self {
            id: Self::compose_id(&record_type, &owner_id, created_nanos),
            owner_id,
            data_hash: data_hash.into(),
            record_type,
            created_at,
            updated_at: created_at,
            nonce: nonce.into(),
        }
    }

    /// The store key for a record of `record_type` owned by `owner_id`
    /// created at `created_nanos`.
    pub fn compose_id(record_type: &str, owner_id: &str, created_nanos: i64) -> String {
        format!("{record_type}_{owner_id}_{created_nanos}")
    }

    /// Replace the payload digest after an accepted update.
    ///
    /// `id`, `owner_id`, `record_type` and `created_at` are left untouched.
    pub fn apply_update(
        &mut self,
        data_hash: impl Into<String>,
        nonce: impl Into<String>,
        at: Timestamp,
    ) {
        self.data_hash = data_hash.into();
        self.nonce = nonce.into();
        self.updated_at = at;
    }

    /// Encode as the JSON stored under [`Record::id`].
    pub fn to_json(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Encode(e.to_string()))
    }

    /// Decode a stored JSON value.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Decode(e.to_string()))
    }
}
