//! telemetry/snapshot.rs
//! Immutable result of a run: counters, throughput, stage timings, and the
//! output buffer when the run wrote to memory.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub bytes_input: u64,
    pub bytes_keystream: u64,
    pub bytes_output: u64,
    pub workers: u64,
    pub chunks: u64,
    pub barrier_rounds: u64,
    pub barrier_leaders: u64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_output as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            bytes_input: counters.bytes_input,
            bytes_keystream: counters.bytes_keystream,
            bytes_output: counters.bytes_output,
            workers: counters.workers,
            chunks: counters.chunks,
            barrier_rounds: counters.barrier_rounds,
            barrier_leaders: counters.barrier_leaders,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
            output: None,
        }
    }

    pub fn attach_output(&mut self, buf: Vec<u8>) {
        self.output = Some(buf);
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal consistency of a finished run:
    /// - every input byte was combined and keystreamed
    /// - one chunk per worker, one leader per barrier round
    /// - stage total never exceeds wall time
    pub fn sanity_check(&self) -> bool {
        self.bytes_output == self.bytes_input
            && self.bytes_keystream == self.bytes_input
            && self.chunks == self.workers
            && self.barrier_leaders == self.barrier_rounds
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
