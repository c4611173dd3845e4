use pcr_state::LedgerState;
use tracing::{debug, warn};

use crate::config::NonceConfig;
use crate::error::{ChaincodeError, ChaincodeResult};

/// Replay protection for mutating operations.
///
/// A nonce is consumed by writing a sentinel under the nonce itself as the
/// key. The check-then-set in [`Self::claim`] is only race-free because the
/// world state validates reads at commit: two transactions that both saw the
/// key absent cannot both commit. A backend without that guarantee needs an
/// atomic compare-and-set on the nonce key instead.
pub struct NonceGuard<'a> {
    config: &'a NonceConfig,
}

impl<'a> NonceGuard<'a> {
    pub fn new(config: &'a NonceConfig) -> Self {
        Self { config }
    }

    /// Nonce for an operation on `subject` at `nanos`:
    /// `{prefix}-{subject}-{nanos}`.
    pub fn derive(&self, subject: &str, nanos: i64) -> String {
        format!("{}-{subject}-{nanos}", self.config.prefix)
    }

    /// Consume `nonce`, failing if any earlier operation already did.
    pub fn claim<S>(&self, state: &mut S, nonce: &str) -> ChaincodeResult<()>
    where
        S: LedgerState + ?Sized,
    {
        if state.get_state(nonce)?.is_some() {
            warn!(nonce, "replayed nonce rejected");
            return Err(ChaincodeError::ReplayDetected {
                nonce: nonce.to_string(),
            });
        }
        state.put_state(nonce, self.config.sentinel.as_bytes())?;
        debug!(nonce, "nonce claimed");
        Ok(())
    }
}
