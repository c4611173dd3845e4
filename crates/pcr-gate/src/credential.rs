use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

use crate::error::GateError;

/// Set of role claims held by a principal. Membership is exact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimSet(BTreeSet<String>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: impl Into<String>) {
        let role = role.into();
        let role = role.trim();
        if !role.is_empty() {
            self.0.insert(role.to_string());
        }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

/// Structured identity document.
///
/// Roles come from a `roles` array and from Fabric-CA style attributes,
/// where `attrs.role` / `attrs.roles` hold a comma-separated list.
#[derive(Deserialize)]
struct IdentityDocument {
    #[serde(default)]
    mspid: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    attrs: BTreeMap<String, Value>,
}

/// A parsed creator credential.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credential {
    /// Membership service the principal belongs to, when stated.
    pub msp_id: Option<String>,
    /// Principal name, when stated.
    pub subject: Option<String>,
    pub claims: ClaimSet,
    raw: Vec<u8>,
}

impl Credential {
    /// Parse a creator blob.
    ///
    /// Blobs that start with `{` must be valid identity documents. Anything
    /// else (PEM certificates, serialized protobufs) is kept as an opaque
    /// credential with no claims.
    pub fn parse(blob: &[u8]) -> Result<Self, GateError> {
        if !blob.trim_ascii_start().starts_with(b"{") {
            return Ok(Self {
                raw: blob.to_vec(),
                ..Self::default()
            });
        }

        let doc: IdentityDocument = serde_json::from_slice(blob)
            .map_err(|e| GateError::MalformedCredential(e.to_string()))?;

        let mut claims: ClaimSet = doc.roles.into_iter().collect();
        for key in ["role", "roles"] {
            match doc.attrs.get(key) {
                Some(Value::String(list)) => list.split(',').for_each(|r| claims.insert(r)),
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .for_each(|r| claims.insert(r)),
                Some(other) => {
                    return Err(GateError::MalformedCredential(format!(
                        "attrs.{key} must be a string or array, got {other}"
                    )))
                }
                None => {}
            }
        }

        Ok(Self {
            msp_id: doc.mspid,
            subject: doc.id,
            claims,
            raw: blob.to_vec(),
        })
    }

    /// The unparsed creator bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.claims.contains(role)
    }
}
