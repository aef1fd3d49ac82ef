//! Deterministic keystream generation.
//!
//! A linear congruential generator expanded into a byte sequence. This is
//! not a secure PRNG; identical parameters always yield identical bytes,
//! which is what makes decryption a second pass with the same parameters.

pub mod types;
pub mod generator;

pub use types::{KeystreamError, KeystreamParams};
pub use generator::{Lcg, fill_keystream, generate_keystream, generate_on_thread};
