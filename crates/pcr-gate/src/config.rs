use serde::{Deserialize, Serialize};

/// How role membership is decided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    /// Parse the credential into a claim set and require exact membership.
    /// Needs creators that carry structured role claims.
    Claims,
    /// Accept any credential whose raw bytes contain the role name. Works with
    /// serialized X.509 identities as peers hand them over.
    #[default]
    Substring,
}

/// Configuration for role-gated operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub mode: GateMode,
    /// Role required to add care plans and prescriptions.
    pub prescriber_role: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            mode: GateMode::Substring,
            prescriber_role: "doctor".into(),
        }
    }
}
