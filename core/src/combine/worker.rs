use log::debug;

use crate::sync::Barrier;
use super::partition::ChunkAssignment;

/// `output[i] = input[i] ^ keystream[i]` over one chunk.
///
/// All three slices must have the same length.
#[inline]
pub fn xor_chunk(input: &[u8], keystream: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len());
    debug_assert_eq!(keystream.len(), output.len());
    for ((out, &p), &k) in output.iter_mut().zip(input).zip(keystream) {
        *out = p ^ k;
    }
}

/// A single worker's share of the combine: read-only views of its input and
/// keystream chunk, and exclusive ownership of its output chunk.
#[derive(Debug)]
pub struct ChunkJob<'a> {
    pub index: usize,
    pub assignment: ChunkAssignment,
    pub input: &'a [u8],
    pub keystream: &'a [u8],
    pub output: &'a mut [u8],
}

/// What a worker reports after the barrier released it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub index: usize,
    pub bytes: usize,
    pub leader: bool,
}

impl<'a> ChunkJob<'a> {
    /// XOR the chunk, then rendezvous at `barrier`.
    pub fn run(self, barrier: &Barrier) -> WorkerOutcome {
        xor_chunk(self.input, self.keystream, self.output);
        debug!(
            "[WORKER {}] combined [{}, {})",
            self.index,
            self.assignment.offset,
            self.assignment.end()
        );
        let wait = barrier.wait();
        WorkerOutcome {
            index: self.index,
            bytes: self.assignment.length,
            leader: wait.is_leader(),
        }
    }
}
