//! keystream/generator.rs
//! Pure value-threading LCG expansion into bytes.
//!
//! Byte `i` (1-indexed) is the low 8 bits of `x_i`. The seed itself is never
//! emitted: the first byte comes from `x_1`.

use crossbeam::thread;
use log::debug;

use crate::constants::KEYSTREAM_THREAD_NAME;
use super::types::{KeystreamError, KeystreamParams};

/// Iterator over successive LCG states `x_1, x_2, ...`.
#[derive(Debug, Clone)]
pub struct Lcg {
    params: KeystreamParams,
    state: u64,
}

impl Lcg {
    pub fn new(params: KeystreamParams) -> Result<Self, KeystreamError> {
        params.validate()?;
        Ok(Self { params, state: params.seed })
    }

    /// Full 64-bit state of the last emitted value (the seed before the first call).
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Adapt into a byte iterator (low 8 bits of each state).
    pub fn bytes(self) -> impl Iterator<Item = u8> {
        self.map(|x| (x & 0xFF) as u8)
    }
}

impl Iterator for Lcg {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.state = self.params.step(self.state);
        Some(self.state)
    }
}

/// Fill `out` with the keystream for `params`.
pub fn fill_keystream(params: &KeystreamParams, out: &mut [u8]) -> Result<(), KeystreamError> {
    if out.is_empty() {
        return Err(KeystreamError::EmptyDestination);
    }
    params.validate()?;

    let mut x = params.seed;
    for byte in out.iter_mut() {
        x = params.step(x);
        *byte = (x & 0xFF) as u8;
    }
    Ok(())
}

/// Allocate and fill a keystream of `len` bytes on the calling thread.
pub fn generate_keystream(params: &KeystreamParams, len: usize) -> Result<Vec<u8>, KeystreamError> {
    if len == 0 {
        return Err(KeystreamError::EmptyDestination);
    }
    params.validate()?;

    let mut out = vec![0u8; len];
    fill_keystream(params, &mut out)?;
    Ok(out)
}

/// Fill `out` on one dedicated thread and block until it has finished.
///
/// The join is the ordering guarantee: nothing reads `out` before every byte
/// has been written.
pub fn generate_on_thread(params: &KeystreamParams, out: &mut [u8]) -> Result<(), KeystreamError> {
    if out.is_empty() {
        return Err(KeystreamError::EmptyDestination);
    }
    params.validate()?;

    let len = out.len();
    let joined = thread::scope(|s| {
        let handle = s
            .builder()
            .name(KEYSTREAM_THREAD_NAME.to_string())
            .spawn(move |_| fill_keystream(params, out))
            .map_err(|e| KeystreamError::Thread(e.to_string()))?;

        handle
            .join()
            .map_err(|_| KeystreamError::Thread("generator panicked".into()))?
    });

    match joined {
        Ok(result) => {
            result?;
            debug!("[KEYSTREAM] generated {} bytes on {}", len, KEYSTREAM_THREAD_NAME);
            Ok(())
        }
        Err(_) => Err(KeystreamError::Thread("generator panicked".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> KeystreamParams {
        KeystreamParams { seed: 4212, multiplier: 84589, increment: 45989, modulus: 217728 }
    }

    #[test]
    fn first_state_skips_seed() {
        let mut lcg = Lcg::new(params()).unwrap();
        assert_eq!(lcg.state(), 4212);
        assert_eq!(lcg.next(), Some(131849));
        assert_eq!(lcg.next(), Some(121978));
    }

    #[test]
    fn zero_modulus_rejected_by_iterator() {
        let p = KeystreamParams { modulus: 0, ..params() };
        assert_eq!(Lcg::new(p).unwrap_err(), KeystreamError::ZeroModulus);
    }

    #[test]
    fn threaded_fill_matches_inline_fill() {
        let mut a = vec![0u8; 4096];
        let mut b = vec![0u8; 4096];
        fill_keystream(&params(), &mut a).unwrap();
        generate_on_thread(&params(), &mut b).unwrap();
        assert_eq!(a, b);
    }
}
