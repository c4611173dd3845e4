//! Ledger world state for the Patient Care Ledger.
//!
//! The chaincode never touches storage directly. Every read, write and
//! selector query goes through the [`LedgerState`] trait, which a peer
//! runtime (or the in-memory reference backend here) supplies per
//! transaction.
//!
//! # Backends
//!
//! - [`InMemoryWorldState`] -- `BTreeMap`-based committed state with
//!   [`Transaction`]s that validate their read set at commit time
//!
//! # Design Rules
//!
//! 1. A transaction's writes become visible only when it commits.
//! 2. Commit fails if any key the transaction read has changed since
//!    (optimistic concurrency); a failed or dropped transaction applies nothing.
//! 3. Point reads see the transaction's own writes; selector queries see
//!    committed state only.
//! 4. Query results come back in key order.
//! 5. The store never interprets values except to evaluate selectors.

pub mod error;
pub mod memory;
pub mod selector;
pub mod snapshot;
pub mod traits;

pub use error::{StateError, StateResult};
pub use memory::{CommitSummary, InMemoryWorldState, Transaction};
pub use selector::Selector;
pub use snapshot::{SnapshotEntry, SnapshotValue, StateSnapshot};
pub use traits::{KeyValue, LedgerState, StateIter};
