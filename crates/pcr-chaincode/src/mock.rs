//! In-process peer for driving the chaincode end to end.
//!
//! [`MockLedger`] plays the part of a peer: each invocation runs in its own
//! world-state transaction which is committed only when the chaincode
//! answers with a success response.

use pcr_gate::{GateError, IdentityProvider, StaticIdentity};
use pcr_state::{
    CommitSummary, InMemoryWorldState, LedgerState, Selector, StateIter, StateResult, Transaction,
};
use tracing::debug;

use crate::chaincode::PatientCare;
use crate::response::Response;

/// A transaction together with the creator that submitted it.
pub struct TxStub<'w> {
    tx: Transaction<'w>,
    identity: StaticIdentity,
}

impl<'w> TxStub<'w> {
    pub fn new(tx: Transaction<'w>, identity: StaticIdentity) -> Self {
        Self { tx, identity }
    }

    pub fn pending_writes(&self) -> usize {
        self.tx.pending_writes()
    }

    pub fn commit(self) -> StateResult<CommitSummary> {
        self.tx.commit()
    }
}

impl LedgerState for TxStub<'_> {
    fn get_state(&mut self, key: &str) -> StateResult<Option<Vec<u8>>> {
        self.tx.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> StateResult<()> {
        self.tx.put_state(key, value)
    }

    fn query(&mut self, selector: &Selector) -> StateResult<StateIter<'_>> {
        self.tx.query(selector)
    }
}

impl IdentityProvider for TxStub<'_> {
    fn creator(&self) -> Result<Vec<u8>, GateError> {
        self.identity.creator()
    }
}

/// Chaincode hosted over an in-memory world state.
pub struct MockLedger {
    chaincode: PatientCare,
    world: InMemoryWorldState,
    identity: StaticIdentity,
}

impl MockLedger {
    pub fn new(chaincode: PatientCare) -> Self {
        Self::with_world(chaincode, InMemoryWorldState::new())
    }

    pub fn with_world(chaincode: PatientCare, world: InMemoryWorldState) -> Self {
        Self {
            chaincode,
            world,
            identity: StaticIdentity::anonymous(),
        }
    }

    /// Credential presented by subsequent invocations.
    pub fn set_creator(&mut self, creator: impl Into<Vec<u8>>) {
        self.identity = StaticIdentity::new(creator);
    }

    pub fn world(&self) -> &InMemoryWorldState {
        &self.world
    }

    pub fn into_world(self) -> InMemoryWorldState {
        self.world
    }

    /// Open a transaction as the current creator without running anything.
    pub fn begin(&self) -> TxStub<'_> {
        TxStub::new(self.world.begin(), self.identity.clone())
    }

    pub fn mock_init(&self) -> Response {
        self.chaincode.init()
    }

    /// Invoke `function` in a fresh transaction and commit it on success.
    ///
    /// A commit conflict turns a success into a failure response.
    pub fn mock_invoke(&self, function: &str, args: &[&str]) -> Response {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut stub = self.begin();
        let response = self.chaincode.invoke(&mut stub, function, &args);
        if !response.is_ok() {
            debug!(function, "transaction discarded");
            return response;
        }
        match stub.commit() {
            Ok(summary) => {
                debug!(
                    function,
                    writes = summary.writes,
                    version = summary.version,
                    "transaction committed"
                );
                response
            }
            Err(err) => Response::error(format!("commit failed: {err}")),
        }
    }
}
