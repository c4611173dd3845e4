//! Access gate for the Patient Care Ledger.
//!
//! Role-restricted operations ask the gate whether the invoking principal
//! holds a role. The gate fetches the principal's credential from an
//! [`IdentityProvider`] and either searches its raw bytes for the role
//! ([`GateMode::Substring`], the default) or parses it into a typed
//! [`ClaimSet`] and tests exact membership ([`GateMode::Claims`]).
//!
//! # Quick Start
//!
//! ```rust
//! use pcr_gate::{AccessGate, GateMode, StaticIdentity};
//!
//! let gate = AccessGate::new(GateMode::Claims);
//! let doctor = StaticIdentity::new(r#"{"mspid":"Org1MSP","roles":["doctor"]}"#);
//! assert!(gate.authorize(&doctor, "doctor").is_ok());
//! assert!(gate.authorize(&doctor, "admin").is_err());
//! ```

pub mod config;
pub mod credential;
pub mod error;
pub mod gate;
pub mod identity;

pub use config::{AccessConfig, GateMode};
pub use credential::{ClaimSet, Credential};
pub use error::GateError;
pub use gate::AccessGate;
pub use identity::{IdentityProvider, StaticIdentity};
