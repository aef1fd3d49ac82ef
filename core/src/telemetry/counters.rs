//! telemetry/counters.rs
//! Mutable counters filled in while a run progresses.
use serde::{Deserialize, Serialize};

use crate::combine::CombineReport;

/// Deterministic counters collected during one run.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub bytes_input: u64,
    pub bytes_keystream: u64,
    pub bytes_output: u64,
    pub workers: u64,
    pub chunks: u64,
    pub barrier_rounds: u64,
    pub barrier_leaders: u64,
}

impl TelemetryCounters {
    pub fn add_input(&mut self, len: usize) {
        self.bytes_input += len as u64;
    }

    pub fn add_keystream(&mut self, len: usize) {
        self.bytes_keystream += len as u64;
    }

    /// Record one completed combine pass (one barrier round).
    pub fn add_combine(&mut self, report: &CombineReport) {
        self.workers += report.workers as u64;
        self.chunks += report.assignments.len() as u64;
        self.bytes_output += report.bytes as u64;
        self.barrier_rounds += 1;
        self.barrier_leaders += report.leaders as u64;
    }
}
