//! # pcr-chaincode
//!
//! Patient care record chaincode. Records are keyed by
//! `{type}_{owner}_{nanos}` and hold only the SHA-256 digest of their
//! payload; every mutation consumes a one-time nonce in the same world-state
//! transaction, and care plans and prescriptions require the prescriber role.
//!
//! ```
//! use pcr_chaincode::{ChaincodeConfig, MockLedger, PatientCare};
//!
//! let ledger = MockLedger::new(PatientCare::new(ChaincodeConfig::default()));
//! let created = ledger.mock_invoke("createRecord", &["user1", "data0", "type1"]);
//! assert!(created.is_ok());
//! ```

pub mod chaincode;
pub mod clock;
pub mod config;
pub mod error;
pub mod mock;
pub mod nonce;
pub mod operation;
pub mod query;
pub mod records;
pub mod response;

pub use chaincode::{ChaincodeStub, PatientCare};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ChaincodeConfig, NonceConfig};
pub use error::{ChaincodeError, ChaincodeResult};
pub use mock::{MockLedger, TxStub};
pub use nonce::NonceGuard;
pub use operation::Operation;
pub use query::{OwnerSummary, QueryEngine};
pub use records::{Confirmation, RecordStore};
pub use response::Response;
