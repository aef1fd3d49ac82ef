//! combine/pool.rs
//! Fan-out of one XOR pass over N scoped worker threads.
//!
//! Flow:
//! 1. validate region lengths and partition `[0, L)` into N chunks
//! 2. carve the output into N disjoint `&mut` chunks
//! 3. spawn one scoped thread per chunk; each XORs then waits at the barrier
//! 4. the calling thread is participant N+1 and waits at the same barrier
//! 5. join every worker before the output is considered complete

use std::io;

use crossbeam::thread;
use log::{debug, warn};
use thiserror::Error;

use crate::{
    constants::WORKER_THREAD_PREFIX,
    sync::{Barrier, BarrierError},
    types::ErrorKind,
};
use super::{
    partition::{ChunkAssignment, PartitionError, partition},
    worker::{ChunkJob, WorkerOutcome},
};

#[derive(Debug, Error)]
pub enum CombineError {
    #[error("region length mismatch: input={input}, keystream={keystream}, output={output}")]
    LengthMismatch { input: usize, keystream: usize, output: usize },

    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),

    #[error("barrier error: {0}")]
    Barrier(#[from] BarrierError),

    #[error("failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("worker scope panicked")]
    ScopePanicked,
}

impl CombineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CombineError::LengthMismatch { .. } | CombineError::Partition(_) => ErrorKind::Precondition,
            CombineError::Spawn { .. } => ErrorKind::Resource,
            CombineError::Barrier(_)
            | CombineError::WorkerPanicked { .. }
            | CombineError::ScopePanicked => ErrorKind::Synchronization,
        }
    }
}

/// Summary of one completed combine pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineReport {
    pub workers: usize,
    pub assignments: Vec<ChunkAssignment>,
    pub bytes: usize,
    /// How many barrier calls (workers + orchestrator) were told they released the round.
    pub leaders: usize,
}

/// XOR `input` with `keystream` into `output` using exactly `workers` threads.
///
/// Requires all three regions to share one length `L` and `1 <= workers <= L`.
/// Returns only after every worker has been joined.
pub fn combine(
    input: &[u8],
    keystream: &[u8],
    output: &mut [u8],
    workers: usize,
) -> Result<CombineReport, CombineError> {
    fan_out(input, keystream, output, workers, |_| Ok(()))
}

/// `admit(index)` runs right before worker `index` is spawned; an error is
/// treated exactly like a failed thread spawn.
fn fan_out<F>(
    input: &[u8],
    keystream: &[u8],
    output: &mut [u8],
    workers: usize,
    mut admit: F,
) -> Result<CombineReport, CombineError>
where
    F: FnMut(usize) -> io::Result<()>,
{
    let len = output.len();
    if input.len() != len || keystream.len() != len {
        return Err(CombineError::LengthMismatch {
            input: input.len(),
            keystream: keystream.len(),
            output: len,
        });
    }

    let assignments = partition(len, workers)?;
    let jobs = carve_jobs(input, keystream, output, &assignments);

    // Workers plus the calling thread.
    let barrier = Barrier::new(workers + 1)?;

    let scoped = thread::scope(|s| {
        let barrier = &barrier;
        let mut handles = Vec::with_capacity(workers);
        let mut spawn_error = None;

        for job in jobs {
            let index = job.index;
            let spawned = admit(index).and_then(|()| {
                s.builder()
                    .name(format!("{}-{}", WORKER_THREAD_PREFIX, index))
                    .spawn(move |_| job.run(barrier))
            });
            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(source) => {
                    spawn_error = Some(CombineError::Spawn { index, source });
                    break;
                }
            }
        }

        // Give up the slots of workers that never started so the ones that
        // did are still released.
        if spawn_error.is_some() {
            let missing = workers - handles.len();
            warn!("[POOL] forfeiting {} barrier slot(s) after spawn failure", missing);
            for _ in 0..missing {
                barrier.arrive();
            }
        }

        let own = barrier.wait();
        debug!("[POOL] barrier released (generation {})", own.generation());

        let mut outcomes: Vec<WorkerOutcome> = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (index, handle) in handles {
            match handle.join() {
                Ok(outcome) => outcomes.push(outcome),
                Err(_) => {
                    panicked.get_or_insert(CombineError::WorkerPanicked { index });
                }
            }
        }

        if let Some(e) = spawn_error.or(panicked) {
            return Err(e);
        }
        Ok((outcomes, own.is_leader()))
    });

    let (outcomes, own_leader) = scoped.map_err(|_| CombineError::ScopePanicked)??;
    barrier.destroy()?;

    let bytes: usize = outcomes.iter().map(|o| o.bytes).sum();
    let leaders = outcomes.iter().filter(|o| o.leader).count() + usize::from(own_leader);
    debug!("[POOL] {} worker(s) joined, {} bytes combined", outcomes.len(), bytes);

    Ok(CombineReport {
        workers,
        assignments,
        bytes,
        leaders,
    })
}

/// Hand each assignment its own disjoint output chunk.
fn carve_jobs<'a>(
    input: &'a [u8],
    keystream: &'a [u8],
    output: &'a mut [u8],
    assignments: &[ChunkAssignment],
) -> Vec<ChunkJob<'a>> {
    let mut jobs = Vec::with_capacity(assignments.len());
    let mut rest = output;
    for (index, assignment) in assignments.iter().enumerate() {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(assignment.length);
        rest = tail;
        jobs.push(ChunkJob {
            index,
            assignment: *assignment,
            input: &input[assignment.range()],
            keystream: &keystream[assignment.range()],
            output: head,
        });
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refuse_from(limit: usize) -> impl FnMut(usize) -> io::Result<()> {
        move |index| {
            if index >= limit {
                Err(io::Error::new(io::ErrorKind::WouldBlock, "thread limit reached"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn spawn_failure_releases_started_workers() {
        let input = [0xffu8; 8];
        let keystream = [0x0fu8; 8];
        let mut output = [0u8; 8];

        let err = fan_out(&input, &keystream, &mut output, 4, refuse_from(2)).unwrap_err();

        assert!(matches!(err, CombineError::Spawn { index: 2, .. }));
        assert_eq!(err.kind(), ErrorKind::Resource);
        // Workers 0 and 1 ran to completion and were joined.
        assert_eq!(&output[..4], &[0xf0; 4]);
        assert_eq!(&output[4..], &[0u8; 4]);
    }

    #[test]
    fn spawn_failure_on_first_worker_does_not_block() {
        let input = [1u8; 3];
        let keystream = [2u8; 3];
        let mut output = [0u8; 3];

        let err = fan_out(&input, &keystream, &mut output, 3, refuse_from(0)).unwrap_err();

        assert!(matches!(err, CombineError::Spawn { index: 0, .. }));
        assert_eq!(output, [0u8; 3]);
    }

    #[test]
    fn admitting_every_worker_matches_combine() {
        let input = *b"ABCDE";
        let keystream = [9u8, 122, 23, 112, 85];
        let mut output = [0u8; 5];

        let report = fan_out(&input, &keystream, &mut output, 2, refuse_from(usize::MAX)).unwrap();

        assert_eq!(report.workers, 2);
        assert_eq!(report.leaders, 1);
        assert_eq!(output, [0x48, 0x38, 0x54, 0x34, 0x10]);
    }
}
