//! Integrity hashing and input validation for the Patient Care Ledger.
//!
//! Payloads are reduced to a hex-encoded SHA-256 digest before anything is
//! persisted, and every caller-supplied field is length-checked first.
//!
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod hasher;
pub mod validation;

pub use hasher::PayloadHasher;
pub use validation::{validate_length, FieldError, FieldLimits};
