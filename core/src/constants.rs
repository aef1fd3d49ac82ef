/// Default upper bound on the input region (1 GiB).
/// Inputs larger than this are rejected before any region is mapped.
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 1024 * 1024 * 1024;

/// Thread name used for the single keystream generator thread.
pub const KEYSTREAM_THREAD_NAME: &str = "otp-keystream";

/// Prefix for combine worker thread names (`otp-combine-<index>`).
pub const WORKER_THREAD_PREFIX: &str = "otp-combine";

/// Reference parameter set used in usage text, docs and tests.
pub mod sample_params {
    pub const SEED: u64 = 4212;
    pub const MULTIPLIER: u64 = 84589;
    pub const INCREMENT: u64 = 45989;
    pub const MODULUS: u64 = 217728;
}
