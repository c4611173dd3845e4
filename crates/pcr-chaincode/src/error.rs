use pcr_crypto::FieldError;
use pcr_gate::GateError;
use pcr_state::StateError;
use pcr_types::TypeError;

/// Errors surfaced by chaincode operations.
///
/// Every variant aborts the enclosing transaction; the dispatcher turns it
/// into a failure response carrying the `Display` text.
#[derive(Debug, thiserror::Error)]
pub enum ChaincodeError {
    /// A field was empty or over its length limit.
    #[error(transparent)]
    InvalidInput(#[from] FieldError),

    /// The nonce was already consumed by an earlier transaction.
    #[error("Replay attack detected: Nonce already used ({nonce})")]
    ReplayDetected { nonce: String },

    /// The role gate refused the caller, or could not read its credential.
    #[error(transparent)]
    Access(#[from] GateError),

    #[error("Record does not exist: {id}")]
    NotFound { id: String },

    /// The world state rejected a read, write or query.
    #[error("store failure: {0}")]
    Store(#[from] StateError),

    /// A record could not be (de)serialized.
    #[error("{0}")]
    Codec(#[from] TypeError),

    #[error("Expected arguments: {expected}")]
    Arguments { expected: String },

    #[error("Invalid function name: {0}")]
    UnknownFunction(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ChaincodeError {
    /// Returns `true` if the caller lacked the required role.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Access(GateError::Unauthorized { .. }))
    }
}

pub type ChaincodeResult<T> = Result<T, ChaincodeError>;
