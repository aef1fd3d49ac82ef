// ## Orchestrator: public entry point for one encrypt/decrypt run
//
// ACQUIRE_REGIONS -> GENERATE_KEYSTREAM -> PARTITION -> SPAWN_AND_SYNC -> FINALIZE
//
// Any stage error aborts the run. Nothing is retried and no partial success
// is reported: the snapshot is only returned once the output was flushed.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    combine::{ParallelismProfile, combine, partition},
    constants::DEFAULT_MAX_INPUT_SIZE,
    io::{InputSource, OutputSink, acquire_input, acquire_output},
    keystream::{KeystreamParams, generate_on_thread},
    telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer},
    types::OtpError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    AcquireRegions,
    GenerateKeystream,
    Partition,
    SpawnAndSync,
    Finalize,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::AcquireRegions    => "ACQUIRE_REGIONS",
            RunStage::GenerateKeystream => "GENERATE_KEYSTREAM",
            RunStage::Partition         => "PARTITION",
            RunStage::SpawnAndSync      => "SPAWN_AND_SYNC",
            RunStage::Finalize          => "FINALIZE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Inputs longer than this are rejected before mapping.
    pub max_input_size: u64,

    /// Worker-count override.
    /// - `None` → one worker per available processor.
    /// - `Some(n)` → `n` workers, still clamped to `[1, L]`.
    pub workers: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            workers: None,
        }
    }
}

impl RunConfig {
    pub fn new(max_input_size: Option<u64>, workers: Option<usize>) -> Self {
        Self {
            max_input_size: max_input_size.unwrap_or(DEFAULT_MAX_INPUT_SIZE),
            workers,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_max_input_size(mut self, max: u64) -> Self {
        self.max_input_size = max;
        self
    }

    pub fn validate(&self) -> Result<(), OtpError> {
        if self.max_input_size == 0 {
            return Err(OtpError::Config("max input size must be at least 1 byte".into()));
        }
        if self.workers == Some(0) {
            return Err(OtpError::Config("worker override must be at least 1".into()));
        }
        Ok(())
    }

    fn profile(&self) -> ParallelismProfile {
        match self.workers {
            Some(n) => ParallelismProfile::fixed(n),
            None => ParallelismProfile::dynamic(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: InputSource,
    pub output: OutputSink,
    pub params: KeystreamParams,
}

impl RunRequest {
    pub fn new(input: InputSource, output: OutputSink, params: KeystreamParams) -> Self {
        Self { input, output, params }
    }

    /// Parameters are valid and the output would not clobber the mapped input.
    pub fn validate(&self) -> Result<(), OtpError> {
        self.params.validate()?;
        if let (InputSource::File(input), OutputSink::File(output)) = (&self.input, &self.output) {
            if same_path(input, output) {
                return Err(OtpError::Config(format!(
                    "input and output refer to the same file: {:?}",
                    input
                )));
            }
        }
        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Transform `request.input` into `request.output`.
///
/// Running the same request again on the output restores the input.
pub fn run(request: RunRequest, config: &RunConfig) -> Result<TelemetrySnapshot, OtpError> {
    // Preconditions: nothing is acquired or spawned before these pass.
    config.validate()?;
    request.validate()?;

    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();

    enter(RunStage::AcquireRegions);
    let (input, mut output) = timer.time(Stage::Acquire, || -> Result<_, OtpError> {
        let input = acquire_input(request.input, config.max_input_size)?;
        let output = acquire_output(request.output, input.len())?;
        Ok((input, output))
    })?;
    let len = input.len();
    counters.add_input(len);

    enter(RunStage::GenerateKeystream);
    let mut keystream = vec![0u8; len];
    timer.time(Stage::Generate, || generate_on_thread(&request.params, &mut keystream))?;
    counters.add_keystream(len);

    enter(RunStage::Partition);
    let profile = config.profile();
    let workers = timer.time(Stage::Partition, || {
        let workers = profile.workers_for(len);
        if workers != profile.worker_count {
            debug!("[RUN] worker count {} clamped to {}", profile.worker_count, workers);
        }
        // Fail fast before any thread exists.
        partition(len, workers).map(|_| workers)
    })?;

    enter(RunStage::SpawnAndSync);
    let report = timer.time(Stage::Combine, || {
        combine(input.as_slice(), &keystream, output.as_mut_slice(), workers)
    })?;
    counters.add_combine(&report);
    drop(keystream);

    enter(RunStage::Finalize);
    timer.time(Stage::Flush, || output.flush())?;
    drop(input);
    let captured = output.into_memory();

    timer.finish();
    let mut snapshot = TelemetrySnapshot::from(&counters, &timer);
    if let Some(buf) = captured {
        snapshot.attach_output(buf);
    }

    info!(
        "[RUN] {} bytes with {} worker(s) in {:.3}ms ({})",
        snapshot.bytes_output,
        report.workers,
        snapshot.elapsed.as_secs_f64() * 1_000.0,
        snapshot.stage_times.summary()
    );
    Ok(snapshot)
}

/// File-to-file run with default configuration.
pub fn encrypt_file(
    input: impl Into<PathBuf>,
    output: impl Into<PathBuf>,
    params: KeystreamParams,
) -> Result<TelemetrySnapshot, OtpError> {
    let request = RunRequest::new(
        InputSource::File(input.into()),
        OutputSink::File(output.into()),
        params,
    );
    run(request, &RunConfig::default())
}

/// XOR is self-inverse, so decryption is the same run.
pub fn decrypt_file(
    input: impl Into<PathBuf>,
    output: impl Into<PathBuf>,
    params: KeystreamParams,
) -> Result<TelemetrySnapshot, OtpError> {
    encrypt_file(input, output, params)
}

/// In-memory run: returns the transformed bytes.
pub fn transform_bytes(
    input: Vec<u8>,
    params: KeystreamParams,
    config: &RunConfig,
) -> Result<Vec<u8>, OtpError> {
    let request = RunRequest::new(InputSource::Memory(input), OutputSink::Memory, params);
    let snapshot = run(request, config)?;
    Ok(snapshot.output.unwrap_or_default())
}

fn enter(stage: RunStage) {
    debug!("[RUN] -> {}", stage);
}
