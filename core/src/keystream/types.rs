use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeystreamError {
    /// `x mod 0` is undefined, so a zero modulus is rejected up front.
    #[error("modulus must be non-zero")]
    ZeroModulus,

    /// Zero-length destinations are rejected rather than silently skipped.
    #[error("keystream destination is empty")]
    EmptyDestination,

    #[error("keystream thread failed: {0}")]
    Thread(String),
}

/// LCG parameters: `x_{i} = (multiplier * x_{i-1} + increment) mod modulus`.
///
/// The multiply-add wraps at 64 bits before the reduction. Keep it that way:
/// switching to wider arithmetic changes the keystream for large parameters
/// and breaks decryption of existing outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeystreamParams {
    pub seed: u64,
    pub multiplier: u64,
    pub increment: u64,
    pub modulus: u64,
}

impl KeystreamParams {
    pub fn new(seed: u64, multiplier: u64, increment: u64, modulus: u64) -> Result<Self, KeystreamError> {
        let params = Self { seed, multiplier, increment, modulus };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), KeystreamError> {
        if self.modulus == 0 {
            return Err(KeystreamError::ZeroModulus);
        }
        Ok(())
    }

    /// One step of the recurrence. Caller guarantees `modulus != 0`.
    #[inline]
    pub fn step(&self, x: u64) -> u64 {
        self.multiplier.wrapping_mul(x).wrapping_add(self.increment) % self.modulus
    }
}
