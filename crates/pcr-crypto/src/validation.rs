use serde::{Deserialize, Serialize};

/// Rejection produced by [`validate_length`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Invalid input length: {field} must not be empty")]
    Empty { field: &'static str },

    #[error("Invalid input length: {field} is {actual} bytes, maximum is {max}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Upper bounds on caller-supplied fields, in bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    /// Owner identifiers.
    pub max_owner_len: usize,
    /// Plaintext payloads, checked before hashing.
    pub max_payload_len: usize,
    /// Record ids supplied to update and get.
    pub max_record_id_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_owner_len: 50,
            max_payload_len: 1024,
            max_record_id_len: 128,
        }
    }
}

impl FieldLimits {
    pub fn owner(&self, value: &str) -> Result<(), FieldError> {
        validate_length("ownerID", value, self.max_owner_len)
    }

    pub fn payload(&self, value: &str) -> Result<(), FieldError> {
        validate_length("payload", value, self.max_payload_len)
    }

    pub fn record_id(&self, value: &str) -> Result<(), FieldError> {
        validate_length("id", value, self.max_record_id_len)
    }
}

/// Fail when `value` is empty or longer than `max_len` bytes.
pub fn validate_length(field: &'static str, value: &str, max_len: usize) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Empty { field });
    }
    if value.len() > max_len {
        return Err(FieldError::TooLong {
            field,
            max: max_len,
            actual: value.len(),
        });
    }
    Ok(())
}
