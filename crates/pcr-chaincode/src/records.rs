use std::fmt;

use pcr_crypto::PayloadHasher;
use pcr_gate::{AccessGate, IdentityProvider};
use pcr_state::LedgerState;
use pcr_types::{kind, nanos_to_timestamp, Record};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::ChaincodeConfig;
use crate::error::{ChaincodeError, ChaincodeResult};
use crate::nonce::NonceGuard;

/// Acknowledgement returned by the owner-wide privacy operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Anonymized,
    Deleted,
}

impl Confirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymized => "Data anonymized",
            Self::Deleted => "Data deleted",
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of [`Record`]s: create, update, point read, and the role-gated
/// creation paths.
///
/// Every mutating call validates its input, then claims a fresh nonce, then
/// writes. Any failure leaves the enclosing transaction to be discarded, so
/// the nonce claim and the record write commit together or not at all.
pub struct RecordStore<'a> {
    config: &'a ChaincodeConfig,
    clock: &'a dyn Clock,
    gate: AccessGate,
}

impl<'a> RecordStore<'a> {
    pub fn new(config: &'a ChaincodeConfig, clock: &'a dyn Clock) -> Self {
        Self {
            config,
            clock,
            gate: AccessGate::new(config.access.mode),
        }
    }

    fn nonces(&self) -> NonceGuard<'a> {
        NonceGuard::new(&self.config.nonce)
    }

    /// Create a record of `record_type` for `owner_id` holding the digest of
    /// `payload`.
    pub fn create<S>(
        &self,
        state: &mut S,
        owner_id: &str,
        payload: &str,
        record_type: &str,
    ) -> ChaincodeResult<Record>
    where
        S: LedgerState + ?Sized,
    {
        self.config.limits.owner(owner_id)?;
        self.config.limits.payload(payload)?;

        let now = self.clock.now_nanos();
        // The id must stay readable by update and get.
        self.config
            .limits
            .record_id(&Record::compose_id(record_type, owner_id, now))?;

        let nonce = self.nonces().derive(owner_id, now);
        self.nonces().claim(state, &nonce)?;

        let record = Record::new(
            owner_id,
            record_type,
            PayloadHasher::digest(payload),
            nonce,
            now,
        );
        state.put_state(&record.id, &record.to_json()?)?;
        info!(id = %record.id, record_type, "record created");
        Ok(record)
    }

    /// Replace the payload of record `id`.
    pub fn update<S>(&self, state: &mut S, id: &str, new_payload: &str) -> ChaincodeResult<Record>
    where
        S: LedgerState + ?Sized,
    {
        self.config.limits.record_id(id)?;
        self.config.limits.payload(new_payload)?;

        let now = self.clock.now_nanos();
        let nonce = self.nonces().derive(id, now);
        self.nonces().claim(state, &nonce)?;

        let mut record = self.load(state, id)?;
        record.apply_update(
            PayloadHasher::digest(new_payload),
            nonce,
            nanos_to_timestamp(now),
        );
        state.put_state(&record.id, &record.to_json()?)?;
        info!(id = %record.id, "record updated");
        Ok(record)
    }

    /// Read record `id` without modifying anything.
    pub fn get<S>(&self, state: &mut S, id: &str) -> ChaincodeResult<Record>
    where
        S: LedgerState + ?Sized,
    {
        self.config.limits.record_id(id)?;
        self.load(state, id)
    }

    /// Create a care plan. Requires the prescriber role.
    pub fn add_care_plan<S>(
        &self,
        stub: &mut S,
        owner_id: &str,
        payload: &str,
    ) -> ChaincodeResult<Record>
    where
        S: LedgerState + IdentityProvider + ?Sized,
    {
        self.gate.authorize(&*stub, &self.config.access.prescriber_role)?;
        self.create(stub, owner_id, payload, kind::CAREPLAN)
    }

    /// Create a prescription. Requires the prescriber role.
    pub fn add_prescription<S>(
        &self,
        stub: &mut S,
        owner_id: &str,
        payload: &str,
    ) -> ChaincodeResult<Record>
    where
        S: LedgerState + IdentityProvider + ?Sized,
    {
        self.gate.authorize(&*stub, &self.config.access.prescriber_role)?;
        self.create(stub, owner_id, payload, kind::PRESCRIPTION)
    }

    /// Acknowledge an anonymization request for `owner_id`.
    ///
    /// Records are not rewritten: which fields become anonymized markers is
    /// not settled, so this stays a confirmation until it is.
    pub fn anonymize(&self, owner_id: &str) -> Confirmation {
        info!(owner_id, "anonymization requested; no records rewritten");
        Confirmation::Anonymized
    }

    /// Acknowledge an erasure request for `owner_id`.
    ///
    /// As with [`Self::anonymize`], no tombstones are written yet.
    pub fn erase(&self, owner_id: &str) -> Confirmation {
        info!(owner_id, "erasure requested; no records tombstoned");
        Confirmation::Deleted
    }

    fn load<S>(&self, state: &mut S, id: &str) -> ChaincodeResult<Record>
    where
        S: LedgerState + ?Sized,
    {
        let bytes = state
            .get_state(id)?
            .ok_or_else(|| ChaincodeError::NotFound { id: id.to_string() })?;
        let record = Record::from_json(&bytes)?;
        debug!(id, "record loaded");
        Ok(record)
    }
}
