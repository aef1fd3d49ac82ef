//! otp-core
//!
//! Keystream XOR over memory-mapped regions, fanned out across CPU cores.
//! Not a secure cipher: the keystream is a linear congruential generator.

#![deny(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod sync;
pub mod keystream;
pub mod combine;
pub mod io;
pub mod telemetry;

pub mod orchestrator;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::combine::{ChunkAssignment, ParallelismProfile, combine, partition};
    pub use crate::io::{InputSource, OutputSink};
    pub use crate::keystream::{KeystreamParams, generate_keystream};
    pub use crate::orchestrator::{RunConfig, RunRequest, decrypt_file, encrypt_file, run, transform_bytes};
    pub use crate::sync::Barrier;
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{ErrorKind, OtpError};
}
