//! Synchronization primitives shared by the combine workers.

pub mod barrier;

pub use barrier::{Barrier, BarrierError, BarrierWaitResult};
