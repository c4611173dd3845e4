use crate::error::StateResult;
use crate::selector::Selector;

/// A single key/value pair returned by a selector query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Iterator over query results. Items are fallible so that streaming
/// backends can report mid-iteration failures.
pub type StateIter<'a> = Box<dyn Iterator<Item = StateResult<KeyValue>> + 'a>;

/// Transaction-scoped view of the ledger world state.
///
/// Implementations track what the transaction reads so that the backend can
/// detect read-write conflicts when the transaction commits. Callers must
/// therefore read a key before writing it whenever the write depends on
/// the prior value.
pub trait LedgerState {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get_state(&mut self, key: &str) -> StateResult<Option<Vec<u8>>>;

    /// Write `value` under `key`. Visible to later reads in the same
    /// transaction, and to everyone else once it commits.
    fn put_state(&mut self, key: &str, value: &[u8]) -> StateResult<()>;

    /// Evaluate a selector query and return every matching entry.
    fn query(&mut self, selector: &Selector) -> StateResult<StateIter<'_>>;
}
