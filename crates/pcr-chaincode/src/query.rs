use pcr_state::{LedgerState, Selector};
use pcr_types::{fields, kind, Record};
use serde::Serialize;
use tracing::debug;

use crate::error::ChaincodeResult;

/// Per-owner record counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub records: u64,
    pub appointments: u64,
    pub careplans: u64,
    pub prescriptions: u64,
}

/// Selector-based retrieval of record sets.
///
/// Results come back in the store's iteration order. A failing query or a
/// matching value that does not decode as a [`Record`] fails the whole call;
/// partial result sets are never returned.
pub struct QueryEngine;

impl QueryEngine {
    /// All records of `record_type` owned by `owner_id`.
    pub fn find_by_owner_and_type<S>(
        state: &mut S,
        owner_id: &str,
        record_type: &str,
    ) -> ChaincodeResult<Vec<Record>>
    where
        S: LedgerState + ?Sized,
    {
        let selector = Selector::new()
            .field(fields::OWNER, owner_id)
            .field(fields::TYPE, record_type);
        Self::collect(state, &selector)
    }

    /// Every record owned by `owner_id`, regardless of type.
    pub fn find_by_owner<S>(state: &mut S, owner_id: &str) -> ChaincodeResult<Vec<Record>>
    where
        S: LedgerState + ?Sized,
    {
        Self::collect(state, &Selector::new().field(fields::OWNER, owner_id))
    }

    /// Count `owner_id`'s records, overall and per well-known type.
    pub fn summarize_owner<S>(state: &mut S, owner_id: &str) -> ChaincodeResult<OwnerSummary>
    where
        S: LedgerState + ?Sized,
    {
        let mut summary = OwnerSummary::default();
        for record in Self::find_by_owner(state, owner_id)? {
            summary.records += 1;
            match record.record_type.as_str() {
                kind::APPOINTMENT => summary.appointments += 1,
                kind::CAREPLAN => summary.careplans += 1,
                kind::PRESCRIPTION => summary.prescriptions += 1,
                _ => {}
            }
        }
        Ok(summary)
    }

    fn collect<S>(state: &mut S, selector: &Selector) -> ChaincodeResult<Vec<Record>>
    where
        S: LedgerState + ?Sized,
    {
        let mut records = Vec::new();
        for item in state.query(selector)? {
            let kv = item?;
            records.push(Record::from_json(&kv.value)?);
        }
        debug!(query = %selector, count = records.len(), "records collected");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChaincodeError;
    use pcr_crypto::PayloadHasher;
    use pcr_state::{InMemoryWorldState, KeyValue, StateError, StateIter, StateResult};

    fn put_record(world: &InMemoryWorldState, owner: &str, record_type: &str, payload: &str, nanos: i64) {
        let record = Record::new(owner, record_type, PayloadHasher::digest(payload), "n", nanos);
        let mut tx = world.begin();
        tx.put_state(&record.id, &record.to_json().unwrap()).unwrap();
        tx.commit().unwrap();
    }

    /// Backend whose iterator fails after the first hit.
    struct FlakyState;

    impl LedgerState for FlakyState {
        fn get_state(&mut self, _key: &str) -> StateResult<Option<Vec<u8>>> {
            Ok(None)
        }
        fn put_state(&mut self, _key: &str, _value: &[u8]) -> StateResult<()> {
            Ok(())
        }
        fn query(&mut self, _selector: &Selector) -> StateResult<StateIter<'_>> {
            let first = Record::new("u", kind::APPOINTMENT, "00", "n", 1);
            let items = vec![
                Ok(KeyValue {
                    key: first.id.clone(),
                    value: first.to_json().unwrap(),
                }),
                Err(StateError::Backend("iterator closed".into())),
            ];
            Ok(Box::new(items.into_iter()))
        }
    }

    #[test]
    fn finds_exactly_the_owners_appointments() {
        let world = InMemoryWorldState::new();
        for i in 0..3 {
            put_record(&world, "U", kind::APPOINTMENT, &format!("appt{i}"), i);
        }
        put_record(&world, "U", kind::CAREPLAN, "plan", 10);
        put_record(&world, "U", "type1", "misc", 11);
        put_record(&world, "V", kind::APPOINTMENT, "other", 12);

        let mut tx = world.begin();
        let found = QueryEngine::find_by_owner_and_type(&mut tx, "U", kind::APPOINTMENT).unwrap();
        assert_eq!(found.len(), 3);
        for (i, record) in found.iter().enumerate() {
            assert_eq!(record.owner_id, "U");
            assert_eq!(record.record_type, kind::APPOINTMENT);
            assert_eq!(record.data_hash, PayloadHasher::digest(&format!("appt{i}")));
        }
    }

    #[test]
    fn no_matches_is_empty() {
        let world = InMemoryWorldState::new();
        let mut tx = world.begin();
        assert!(QueryEngine::find_by_owner_and_type(&mut tx, "U", kind::APPOINTMENT)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn undecodable_match_fails_whole_query() {
        let world = InMemoryWorldState::new();
        put_record(&world, "U", kind::APPOINTMENT, "ok", 1);
        let mut tx = world.begin();
        tx.put_state("foreign", br#"{"userID":"U","type":"appointment"}"#).unwrap();
        tx.commit().unwrap();

        let mut tx = world.begin();
        assert!(matches!(
            QueryEngine::find_by_owner_and_type(&mut tx, "U", kind::APPOINTMENT),
            Err(ChaincodeError::Codec(_))
        ));
    }

    #[test]
    fn iterator_failure_fails_whole_query() {
        assert!(matches!(
            QueryEngine::find_by_owner_and_type(&mut FlakyState, "u", kind::APPOINTMENT),
            Err(ChaincodeError::Store(StateError::Backend(_)))
        ));
    }

    #[test]
    fn summary_counts_by_type() {
        let world = InMemoryWorldState::new();
        put_record(&world, "U", kind::APPOINTMENT, "a", 1);
        put_record(&world, "U", kind::APPOINTMENT, "b", 2);
        put_record(&world, "U", kind::CAREPLAN, "c", 3);
        put_record(&world, "U", "lab", "d", 4);
        put_record(&world, "V", kind::PRESCRIPTION, "e", 5);

        let mut tx = world.begin();
        let summary = QueryEngine::summarize_owner(&mut tx, "U").unwrap();
        assert_eq!(
            summary,
            OwnerSummary {
                records: 4,
                appointments: 2,
                careplans: 1,
                prescriptions: 0,
            }
        );
    }
}
