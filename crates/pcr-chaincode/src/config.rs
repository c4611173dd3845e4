use std::path::Path;

use pcr_crypto::FieldLimits;
use pcr_gate::AccessConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ChaincodeError, ChaincodeResult};

/// Replay-protection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonceConfig {
    /// Leading component of every derived nonce.
    pub prefix: String,
    /// Value written under a consumed nonce key.
    pub sentinel: String,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            prefix: "nonce".into(),
            sentinel: "used".into(),
        }
    }
}

/// Configuration for the patient care chaincode.
///
/// Every section is optional in TOML; missing sections and fields take
/// their defaults.
///
/// ```toml
/// [limits]
/// max_owner_len = 50
/// max_payload_len = 1024
///
/// [access]
/// mode = "substring"
/// prescriber_role = "doctor"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaincodeConfig {
    pub limits: FieldLimits,
    pub access: AccessConfig,
    pub nonce: NonceConfig,
}

impl ChaincodeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> ChaincodeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ChaincodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> ChaincodeResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ChaincodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> ChaincodeResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChaincodeError::Config(e.to_string()))
    }

    /// Reject settings that would make every operation fail or would let
    /// nonces collide with record keys.
    pub fn validate(&self) -> ChaincodeResult<()> {
        let limits = &self.limits;
        if limits.max_owner_len == 0 || limits.max_payload_len == 0 || limits.max_record_id_len == 0
        {
            return Err(ChaincodeError::Config("length limits must be positive".into()));
        }
        if limits.max_record_id_len <= limits.max_owner_len {
            return Err(ChaincodeError::Config(
                "max_record_id_len must exceed max_owner_len".into(),
            ));
        }
        if self.access.prescriber_role.trim().is_empty() {
            return Err(ChaincodeError::Config("prescriber_role must not be empty".into()));
        }
        if self.nonce.prefix.is_empty() || self.nonce.sentinel.is_empty() {
            return Err(ChaincodeError::Config(
                "nonce prefix and sentinel must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcr_gate::GateMode;

    #[test]
    fn defaults_are_valid() {
        let config = ChaincodeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.limits.max_owner_len, 50);
        assert_eq!(config.limits.max_payload_len, 1024);
        assert_eq!(config.access.prescriber_role, "doctor");
        assert_eq!(config.nonce.sentinel, "used");
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(
            ChaincodeConfig::from_toml_str("").unwrap(),
            ChaincodeConfig::default()
        );
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = ChaincodeConfig::from_toml_str(
            r#"
            [limits]
            max_payload_len = 4096

            [access]
            mode = "claims"
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.max_payload_len, 4096);
        assert_eq!(config.limits.max_owner_len, 50);
        assert_eq!(config.access.mode, GateMode::Claims);
        assert_eq!(config.access.prescriber_role, "doctor");
    }

    #[test]
    fn toml_round_trip() {
        let config = ChaincodeConfig::default();
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(ChaincodeConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn rejects_invalid_settings() {
        assert!(ChaincodeConfig::from_toml_str("[limits]\nmax_owner_len = 0").is_err());
        assert!(ChaincodeConfig::from_toml_str("[access]\nprescriber_role = \" \"").is_err());
        assert!(ChaincodeConfig::from_toml_str("[nonce]\nsentinel = \"\"").is_err());
        assert!(ChaincodeConfig::from_toml_str("[access]\nmode = \"root\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcr.toml");
        std::fs::write(&path, "[nonce]\nprefix = \"n\"\n").unwrap();
        assert_eq!(ChaincodeConfig::load(&path).unwrap().nonce.prefix, "n");
        assert!(matches!(
            ChaincodeConfig::load(&dir.path().join("missing.toml")),
            Err(ChaincodeError::Config(_))
        ));
    }
}
