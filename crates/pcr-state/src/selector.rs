use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StateError, StateResult};

/// Equality selector over top-level JSON fields.
///
/// Serializes to the rich-query shape `{"selector":{"field":"value",...}}`.
/// A value matches when it is a JSON object whose named fields are all
/// strings equal to the selector's. Values that are not JSON objects (such
/// as nonce sentinels) never match, and an empty selector matches every
/// JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    selector: BTreeMap<String, String>,
}

impl Selector {
    /// An empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.selector.insert(field.into(), value.into());
        self
    }

    /// The field constraints, ordered by field name.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.selector
    }

    /// Parse a rich-query string.
    ///
    /// Only string equality constraints are supported; operators such as
    /// `$gt` or nested objects are rejected.
    pub fn parse(query: &str) -> StateResult<Self> {
        let root: Value =
            serde_json::from_str(query).map_err(|e| StateError::InvalidQuery(e.to_string()))?;
        let constraints = root
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| StateError::InvalidQuery("missing \"selector\" object".into()))?;

        let mut selector = Self::new();
        for (field, value) in constraints {
            let Some(expected) = value.as_str() else {
                return Err(StateError::InvalidQuery(format!(
                    "field '{field}' must be an equality on a string"
                )));
            };
            selector = selector.field(field.as_str(), expected);
        }
        Ok(selector)
    }

    /// Evaluate the selector against a stored value.
    pub fn matches(&self, value: &[u8]) -> bool {
        let Ok(Value::Object(doc)) = serde_json::from_slice::<Value>(value) else {
            return false;
        };
        self.selector.iter().all(|(field, expected)| {
            doc.get(field).and_then(Value::as_str) == Some(expected.as_str())
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&query)
    }
}
