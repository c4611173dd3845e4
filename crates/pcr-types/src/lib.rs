//! Foundation types for the Patient Care Ledger (PCR).
//!
//! This crate provides the persisted record entity and the small vocabulary
//! shared by every other PCR crate.
//!
//! # Key Types
//!
//! - [`Record`]: the sole persisted entity, keyed by its composite id
//! - [`kind`]: well-known record type discriminators
//! - [`fields`]: persisted JSON field names used in selector queries

pub mod error;
pub mod record;
pub mod temporal;

pub use error::TypeError;
pub use record::{fields, kind, Record};
pub use temporal::{nanos_to_timestamp, Timestamp};
