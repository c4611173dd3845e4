use std::sync::Arc;

use pcr_gate::IdentityProvider;
use pcr_state::LedgerState;
use pcr_types::{kind, TypeError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ChaincodeConfig;
use crate::error::ChaincodeResult;
use crate::operation::Operation;
use crate::query::QueryEngine;
use crate::records::RecordStore;
use crate::response::Response;

/// Everything a transaction hands the chaincode: world state access and
/// the creator's credential.
pub trait ChaincodeStub: LedgerState + IdentityProvider {}

impl<T: LedgerState + IdentityProvider + ?Sized> ChaincodeStub for T {}

/// The patient care chaincode.
///
/// Stateless between invocations: everything persistent lives in the
/// world state reached through the stub.
pub struct PatientCare {
    config: ChaincodeConfig,
    clock: Arc<dyn Clock>,
}

impl PatientCare {
    pub fn new(config: ChaincodeConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: ChaincodeConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ChaincodeConfig {
        &self.config
    }

    pub fn records(&self) -> RecordStore<'_> {
        RecordStore::new(&self.config, self.clock.as_ref())
    }

    /// Instantiation hook. Nothing to seed.
    pub fn init(&self) -> Response {
        Response::success(Vec::new())
    }

    /// Run `function` with positional `args` and turn the outcome into a
    /// response. Failures carry the error text and must not be committed.
    pub fn invoke<S>(&self, stub: &mut S, function: &str, args: &[String]) -> Response
    where
        S: ChaincodeStub + ?Sized,
    {
        match self.dispatch(stub, function, args) {
            Ok(payload) => {
                debug!(function, bytes = payload.len(), "invocation succeeded");
                Response::success(payload)
            }
            Err(err) => {
                warn!(function, error = %err, "invocation failed");
                Response::error(err.to_string())
            }
        }
    }

    fn dispatch<S>(&self, stub: &mut S, function: &str, args: &[String]) -> ChaincodeResult<Vec<u8>>
    where
        S: ChaincodeStub + ?Sized,
    {
        let op: Operation = function.parse()?;
        let records = self.records();

        match (op, args) {
            (Operation::CreateRecord, [owner, payload, record_type]) => {
                encode(&records.create(stub, owner, payload, record_type)?)
            }
            (Operation::UpdateRecord, [id, payload]) => {
                encode(&records.update(stub, id, payload)?)
            }
            (Operation::GetRecord, [id]) => encode(&records.get(stub, id)?),
            (Operation::AddCarePlan, [owner, payload]) => {
                encode(&records.add_care_plan(stub, owner, payload)?)
            }
            (Operation::AddPrescription, [owner, payload]) => {
                encode(&records.add_prescription(stub, owner, payload)?)
            }
            (Operation::GetAppointments, [owner]) => encode(
                &QueryEngine::find_by_owner_and_type(stub, owner, kind::APPOINTMENT)?,
            ),
            (Operation::GetAnalytics, [owner]) => {
                encode(&QueryEngine::summarize_owner(stub, owner)?)
            }
            (Operation::AnonymizeRecord, [owner]) => {
                Ok(records.anonymize(owner).as_str().as_bytes().to_vec())
            }
            (Operation::DeleteRecord, [owner]) => {
                Ok(records.erase(owner).as_str().as_bytes().to_vec())
            }
            (op, _) => Err(op.arity_error()),
        }
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> ChaincodeResult<Vec<u8>> {
    Ok(serde_json::to_vec(value).map_err(|e| TypeError::Encode(e.to_string()))?)
}
