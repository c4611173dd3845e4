/// Errors that can occur during authorization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The principal does not hold the required role.
    #[error("Unauthorized role: '{role}' required")]
    Unauthorized { role: String },

    /// The identity provider could not supply a credential.
    #[error("Failed to get creator: {0}")]
    Creator(String),

    /// The credential looked structured but could not be parsed.
    #[error("malformed credential: {0}")]
    MalformedCredential(String),
}
