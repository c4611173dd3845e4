use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::selector::Selector;
use crate::snapshot::{SnapshotEntry, StateSnapshot};
use crate::traits::{KeyValue, LedgerState, StateIter};

#[derive(Clone, Debug)]
struct Versioned {
    value: Vec<u8>,
    version: u64,
}

#[derive(Debug, Default)]
struct Committed {
    entries: BTreeMap<String, Versioned>,
    /// Version assigned to the most recent committed write.
    version: u64,
}

/// In-memory committed world state.
///
/// Holds every committed key with the version of the write that produced
/// it. All access happens through [`Transaction`]s opened with
/// [`Self::begin`].
#[derive(Debug, Default)]
pub struct InMemoryWorldState {
    committed: RwLock<Committed>,
}

/// Outcome of a successful commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of keys written.
    pub writes: usize,
    /// Version stamped on those writes; unchanged for read-only commits.
    pub version: u64,
}

impl InMemoryWorldState {
    /// Create an empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transaction against the current committed state.
    pub fn begin(&self) -> Transaction<'_> {
        Transaction {
            world: self,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Number of committed keys.
    pub fn len(&self) -> StateResult<usize> {
        Ok(self.read_lock()?.entries.len())
    }

    /// Returns `true` if nothing has been committed.
    pub fn is_empty(&self) -> StateResult<bool> {
        Ok(self.read_lock()?.entries.is_empty())
    }

    /// Read a committed value outside any transaction.
    pub fn get_committed(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        Ok(self.read_lock()?.entries.get(key).map(|v| v.value.clone()))
    }

    /// All committed keys in key order.
    pub fn keys(&self) -> StateResult<Vec<String>> {
        Ok(self.read_lock()?.entries.keys().cloned().collect())
    }

    /// Copy the committed state into a serializable snapshot.
    pub fn export(&self) -> StateResult<StateSnapshot> {
        let committed = self.read_lock()?;
        let entries = committed
            .entries
            .iter()
            .map(|(key, v)| SnapshotEntry::new(key.clone(), v.value.clone()))
            .collect();
        Ok(StateSnapshot { entries })
    }

    /// Build a world state from a snapshot. Every imported key starts at
    /// version 1.
    pub fn import(snapshot: StateSnapshot) -> StateResult<Self> {
        let mut committed = Committed::default();
        for entry in snapshot.entries {
            if entry.key.is_empty() {
                return Err(StateError::EmptyKey);
            }
            committed.version = 1;
            committed.entries.insert(
                entry.key,
                Versioned {
                    value: entry.value.into_bytes(),
                    version: 1,
                },
            );
        }
        Ok(Self {
            committed: RwLock::new(committed),
        })
    }

    fn read_lock(&self) -> StateResult<RwLockReadGuard<'_, Committed>> {
        self.committed.read().map_err(|_| StateError::Poisoned)
    }

    fn write_lock(&self) -> StateResult<RwLockWriteGuard<'_, Committed>> {
        self.committed.write().map_err(|_| StateError::Poisoned)
    }
}

/// A single transaction over an [`InMemoryWorldState`].
///
/// Writes are buffered until [`Self::commit`]. Every point read records the
/// version it observed (`None` for an absent key); commit fails with
/// [`StateError::Conflict`] if any of those keys has moved on since. Dropping
/// the transaction discards its writes.
pub struct Transaction<'w> {
    world: &'w InMemoryWorldState,
    reads: BTreeMap<String, Option<u64>>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl Transaction<'_> {
    /// Number of buffered writes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Validate the read set and apply buffered writes atomically.
    pub fn commit(self) -> StateResult<CommitSummary> {
        let mut committed = self.world.write_lock()?;

        for (key, seen) in &self.reads {
            let current = committed.entries.get(key).map(|v| v.version);
            if current != *seen {
                debug!(key = %key, "read conflict, aborting commit");
                return Err(StateError::Conflict { key: key.clone() });
            }
        }

        if self.writes.is_empty() {
            return Ok(CommitSummary {
                writes: 0,
                version: committed.version,
            });
        }

        committed.version += 1;
        let version = committed.version;
        let writes = self.writes.len();
        for (key, value) in self.writes {
            committed.entries.insert(key, Versioned { value, version });
        }
        debug!(writes, version, "transaction committed");
        Ok(CommitSummary { writes, version })
    }
}

impl LedgerState for Transaction<'_> {
    fn get_state(&mut self, key: &str) -> StateResult<Option<Vec<u8>>> {
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }
        let world = self.world;
        let committed = world.read_lock()?;
        let entry = committed.entries.get(key);
        // The first observation is the one validated at commit.
        self.reads
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|v| v.version));
        Ok(entry.map(|v| v.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> StateResult<()> {
        if key.is_empty() {
            return Err(StateError::EmptyKey);
        }
        self.writes.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn query(&mut self, selector: &Selector) -> StateResult<StateIter<'_>> {
        let world = self.world;
        let committed = world.read_lock()?;
        let matches: Vec<KeyValue> = committed
            .entries
            .iter()
            .filter(|(_, v)| selector.matches(&v.value))
            .map(|(key, v)| KeyValue {
                key: key.clone(),
                value: v.value.clone(),
            })
            .collect();
        debug!(query = %selector, hits = matches.len(), "selector query evaluated");
        Ok(Box::new(matches.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(pairs: &[(&str, &str)]) -> InMemoryWorldState {
        let world = InMemoryWorldState::new();
        let mut tx = world.begin();
        for (k, v) in pairs {
            tx.put_state(k, v.as_bytes()).unwrap();
        }
        tx.commit().unwrap();
        world
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    #[test]
    fn writes_are_invisible_until_commit() {
        let world = InMemoryWorldState::new();
        let mut tx = world.begin();
        tx.put_state("k", b"v").unwrap();
        assert_eq!(world.get_committed("k").unwrap(), None);
        assert_eq!(tx.pending_writes(), 1);
        let summary = tx.commit().unwrap();
        assert_eq!(summary.writes, 1);
        assert_eq!(world.get_committed("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn reads_see_own_writes() {
        let world = InMemoryWorldState::new();
        let mut tx = world.begin();
        assert_eq!(tx.get_state("k").unwrap(), None);
        tx.put_state("k", b"v").unwrap();
        assert_eq!(tx.get_state("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn dropped_transaction_applies_nothing() {
        let world = InMemoryWorldState::new();
        {
            let mut tx = world.begin();
            tx.put_state("k", b"v").unwrap();
        }
        assert!(world.is_empty().unwrap());
    }

    #[test]
    fn empty_key_is_rejected() {
        let world = InMemoryWorldState::new();
        let mut tx = world.begin();
        assert!(matches!(tx.put_state("", b"v"), Err(StateError::EmptyKey)));
    }

    // -----------------------------------------------------------------------
    // Optimistic concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_claims_of_same_absent_key_conflict() {
        let world = InMemoryWorldState::new();
        let mut first = world.begin();
        let mut second = world.begin();

        assert_eq!(first.get_state("nonce-1").unwrap(), None);
        assert_eq!(second.get_state("nonce-1").unwrap(), None);
        first.put_state("nonce-1", b"used").unwrap();
        second.put_state("nonce-1", b"used").unwrap();

        first.commit().unwrap();
        let err = second.commit().unwrap_err();
        assert!(matches!(err, StateError::Conflict { key } if key == "nonce-1"));
    }

    #[test]
    fn stale_read_of_existing_key_conflicts() {
        let world = seeded(&[("rec", "v1")]);
        let mut reader = world.begin();
        reader.get_state("rec").unwrap();
        reader.put_state("rec", b"v2-from-reader").unwrap();

        let mut writer = world.begin();
        writer.put_state("rec", b"v2").unwrap();
        writer.commit().unwrap();

        assert!(matches!(reader.commit(), Err(StateError::Conflict { .. })));
        assert_eq!(world.get_committed("rec").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn blind_writes_do_not_conflict() {
        let world = seeded(&[("k", "a")]);
        let mut one = world.begin();
        let mut two = world.begin();
        one.put_state("k", b"b").unwrap();
        two.put_state("k", b"c").unwrap();
        one.commit().unwrap();
        two.commit().unwrap();
        assert_eq!(world.get_committed("k").unwrap(), Some(b"c".to_vec()));
    }

    #[test]
    fn versions_advance_per_commit() {
        let world = InMemoryWorldState::new();
        let mut tx = world.begin();
        tx.put_state("a", b"1").unwrap();
        tx.put_state("b", b"2").unwrap();
        assert_eq!(tx.commit().unwrap().version, 1);

        let tx = world.begin();
        assert_eq!(tx.commit().unwrap(), CommitSummary { writes: 0, version: 1 });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[test]
    fn query_returns_matches_in_key_order() {
        let world = seeded(&[
            ("b", r#"{"userID":"u","type":"appointment"}"#),
            ("a", r#"{"userID":"u","type":"appointment"}"#),
            ("c", r#"{"userID":"u","type":"careplan"}"#),
            ("nonce-u-1", "used"),
        ]);
        let mut tx = world.begin();
        let selector = Selector::new().field("userID", "u").field("type", "appointment");
        let keys: Vec<String> = tx
            .query(&selector)
            .unwrap()
            .map(|kv| kv.unwrap().key)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn query_ignores_uncommitted_writes() {
        let world = InMemoryWorldState::new();
        let mut tx = world.begin();
        tx.put_state("x", br#"{"userID":"u"}"#).unwrap();
        let hits = tx.query(&Selector::new().field("userID", "u")).unwrap().count();
        assert_eq!(hits, 0);
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    #[test]
    fn export_import_preserves_state() {
        let world = seeded(&[("k1", "used"), ("k2", r#"{"a":"b"}"#)]);
        let restored = InMemoryWorldState::import(world.export().unwrap()).unwrap();
        assert_eq!(restored.keys().unwrap(), vec!["k1", "k2"]);
        assert_eq!(restored.get_committed("k1").unwrap(), Some(b"used".to_vec()));
        assert_eq!(restored.len().unwrap(), 2);
    }
}
