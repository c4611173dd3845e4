use crate::error::GateError;

/// Source of the invoking principal's credential.
///
/// On a peer this is the serialized creator identity of the transaction
/// proposal. The gate treats it as opaque bytes until it parses it.
pub trait IdentityProvider {
    fn creator(&self) -> Result<Vec<u8>, GateError>;
}

/// A fixed credential, for harnesses and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    creator: Vec<u8>,
}

impl StaticIdentity {
    pub fn new(creator: impl Into<Vec<u8>>) -> Self {
        Self {
            creator: creator.into(),
        }
    }

    /// A principal with no credential material at all.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn creator(&self) -> Result<Vec<u8>, GateError> {
        Ok(self.creator.clone())
    }
}
