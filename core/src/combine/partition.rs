use std::ops::Range;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartitionError {
    #[error("cannot partition an empty region")]
    EmptyRegion,

    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("{workers} workers exceed region length {len}")]
    TooManyWorkers { workers: usize, len: usize },
}

/// Contiguous byte range owned by a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkAssignment {
    pub offset: usize,
    pub length: usize,
}

impl ChunkAssignment {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Split `[0, len)` into `workers` contiguous chunks.
///
/// Every chunk gets `len / workers` bytes; the last one also takes the
/// `len % workers` remainder. Requires `1 <= workers <= len` so no chunk is
/// empty.
pub fn partition(len: usize, workers: usize) -> Result<Vec<ChunkAssignment>, PartitionError> {
    if len == 0 {
        return Err(PartitionError::EmptyRegion);
    }
    if workers == 0 {
        return Err(PartitionError::ZeroWorkers);
    }
    if workers > len {
        return Err(PartitionError::TooManyWorkers { workers, len });
    }

    let base = len / workers;
    let rem = len % workers;

    let mut chunks = Vec::with_capacity(workers);
    let mut offset = 0;
    for i in 0..workers {
        let length = if i == workers - 1 { base + rem } else { base };
        chunks.push(ChunkAssignment { offset, length });
        offset += length;
    }
    debug_assert_eq!(offset, len);
    Ok(chunks)
}

/// Clamp a worker-count hint into `[1, len]`.
///
/// A degenerate hint (0) is treated as 1. For `len == 0` this returns 0 and
/// `partition` rejects the region.
pub fn effective_worker_count(hint: usize, len: usize) -> usize {
    let mut workers = hint;
    if workers < 1 {
        warn!("[PARTITION] worker hint {} is degenerate, using 1", hint);
        workers = 1;
    }
    if workers > len {
        workers = len;
    }
    workers
}
