//! Partition-and-combine worker pool.
//!
//! The output region is split into disjoint `&mut` chunks, one per worker.
//! Each worker XORs its chunk of input against the same chunk of keystream,
//! then arrives at a shared barrier that the orchestrating thread also joins.
//! Input and keystream are shared read-only; no locks are taken per byte or
//! per chunk.

pub mod partition;
pub mod parallelism;
pub mod worker;
pub mod pool;

pub use partition::{ChunkAssignment, PartitionError, effective_worker_count, partition};
pub use parallelism::ParallelismProfile;
pub use worker::{ChunkJob, WorkerOutcome, xor_chunk};
pub use pool::{CombineError, CombineReport, combine};
