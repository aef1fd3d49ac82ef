//! telemetry/mod.rs
//! Counters, stage timers, and the immutable snapshot returned by a run.
//!
//! Counters are collected on the orchestrating thread only; workers report
//! through `CombineReport`, so no atomics are needed.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
