use thiserror::Error;

use crate::{
    combine::{CombineError, PartitionError},
    io::RegionError,
    keystream::KeystreamError,
};

/// Coarse error classes a caller can act on.
/// - `Precondition`: bad input, detected before any region or thread exists.
/// - `Resource`: mapping, allocation, file or thread creation failed.
/// - `Synchronization`: barrier misuse, a programming invariant violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    Resource,
    Synchronization,
}

/// Unified error for a run: validation, regions, keystream and combine.
/// - `From<T>` impls enable `?` across the whole run.
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("input is empty")]
    EmptyInput,

    #[error("input too large: {len} bytes (limit {max} bytes)")]
    InputTooLarge { len: u64, max: u64 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("keystream error: {0}")]
    Keystream(#[from] KeystreamError),

    #[error("region error: {0}")]
    Region(#[from] RegionError),

    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),

    #[error("combine error: {0}")]
    Combine(#[from] CombineError),
}

impl OtpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OtpError::Keystream(KeystreamError::Thread(_)) => ErrorKind::Resource,

            OtpError::EmptyInput
            | OtpError::InputTooLarge { .. }
            | OtpError::Config(_)
            | OtpError::Keystream(_)
            | OtpError::Partition(_) => ErrorKind::Precondition,

            OtpError::Region(_) => ErrorKind::Resource,

            OtpError::Combine(e) => e.kind(),
        }
    }
}
