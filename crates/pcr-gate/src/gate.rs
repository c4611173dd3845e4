use tracing::{debug, warn};

use crate::config::GateMode;
use crate::credential::Credential;
use crate::error::GateError;
use crate::identity::IdentityProvider;

/// Role check for restricted operations.
///
/// A coarse capability check, not a policy engine: it answers one question,
/// whether the invoking principal holds `role`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessGate {
    mode: GateMode,
}

impl AccessGate {
    pub fn new(mode: GateMode) -> Self {
        Self { mode }
    }

    /// Succeed iff the principal behind `identity` holds `role`.
    pub fn authorize<I>(&self, identity: &I, role: &str) -> Result<(), GateError>
    where
        I: IdentityProvider + ?Sized,
    {
        let blob = identity.creator()?;
        let granted = match self.mode {
            GateMode::Claims => Credential::parse(&blob)?.has_role(role),
            GateMode::Substring => contains(&blob, role.as_bytes()),
        };

        if !granted {
            warn!(role, mode = ?self.mode, "authorization denied");
            return Err(GateError::Unauthorized { role: role.into() });
        }
        debug!(role, "authorization granted");
        Ok(())
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentity;

    struct FailingIdentity;

    impl IdentityProvider for FailingIdentity {
        fn creator(&self) -> Result<Vec<u8>, GateError> {
            Err(GateError::Creator("no signed proposal".into()))
        }
    }

    const DOCTOR: &str = r#"{"mspid":"Org1MSP","roles":["doctor"]}"#;
    const NURSE: &str = r#"{"mspid":"Org1MSP","roles":["nurse"]}"#;

    // -----------------------------------------------------------------------
    // Claims mode
    // -----------------------------------------------------------------------

    #[test]
    fn claims_mode_grants_member() {
        let gate = AccessGate::new(GateMode::Claims);
        assert!(gate.authorize(&StaticIdentity::new(DOCTOR), "doctor").is_ok());
    }

    #[test]
    fn claims_mode_denies_non_member() {
        let gate = AccessGate::new(GateMode::Claims);
        let err = gate.authorize(&StaticIdentity::new(NURSE), "doctor").unwrap_err();
        assert_eq!(err, GateError::Unauthorized { role: "doctor".into() });
        assert!(err.to_string().starts_with("Unauthorized role"));
    }

    #[test]
    fn claims_mode_ignores_role_names_in_other_fields() {
        let gate = AccessGate::new(GateMode::Claims);
        let sneaky = StaticIdentity::new(r#"{"id":"doctor","roles":["patient"]}"#);
        assert!(gate.authorize(&sneaky, "doctor").is_err());
    }

    #[test]
    fn claims_mode_denies_opaque_and_empty_credentials() {
        let gate = AccessGate::new(GateMode::Claims);
        assert!(gate.authorize(&StaticIdentity::new("x509 OU=doctor"), "doctor").is_err());
        assert!(gate.authorize(&StaticIdentity::anonymous(), "doctor").is_err());
    }

    // -----------------------------------------------------------------------
    // Substring mode
    // -----------------------------------------------------------------------

    #[test]
    fn substring_mode_matches_raw_bytes() {
        let gate = AccessGate::new(GateMode::Substring);
        assert!(gate.authorize(&StaticIdentity::new("x509 OU=doctor"), "doctor").is_ok());
        assert!(gate.authorize(&StaticIdentity::new("x509 OU=nurse"), "doctor").is_err());
    }

    #[test]
    fn default_mode_reads_serialized_certificates() {
        let gate = AccessGate::default();
        let creator = b"\n\x07Org1MSP\x12\x05-----BEGIN CERTIFICATE-----\nOU=client+OU=doctor\n";
        assert!(gate.authorize(&StaticIdentity::new(&creator[..]), "doctor").is_ok());
    }

    #[test]
    fn creator_failure_propagates() {
        let gate = AccessGate::default();
        assert!(matches!(
            gate.authorize(&FailingIdentity, "doctor"),
            Err(GateError::Creator(_))
        ));
    }

    #[test]
    fn byte_search() {
        assert!(contains(b"abcdef", b"cde"));
        assert!(!contains(b"abc", b"abcd"));
        assert!(contains(b"abc", b""));
    }
}
