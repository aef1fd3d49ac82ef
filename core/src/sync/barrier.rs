//! sync/barrier.rs
//! Reusable counting barrier built on a `Mutex` + `Condvar` pair.
//!
//! Contract:
//! - `new(count)` fixes the participant count for the barrier's lifetime.
//! - `wait()` blocks until `count` arrivals have happened since the last release.
//! - The arrival that completes a round resets the counter, advances the
//!   generation and wakes everyone, so the barrier is immediately reusable.
//! - Exactly one call per round gets `is_leader() == true`.
//!
//! There is no timeout and no cancellation. A participant that never arrives
//! blocks the others forever.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarrierError {
    /// A barrier needs at least one participant.
    #[error("barrier participant count must be at least 1")]
    ZeroParticipants,

    /// `destroy` was called while participants were still blocked in `wait`.
    #[error("barrier destroyed with {waiting} participant(s) still waiting")]
    ParticipantsBlocked { waiting: usize },
}

/// Result of a `wait` call. The leader is the arrival that released the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWaitResult {
    leader: bool,
    generation: u64,
}

impl BarrierWaitResult {
    pub fn is_leader(&self) -> bool {
        self.leader
    }

    /// Round this call took part in, starting at 0.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
}

#[derive(Debug)]
pub struct Barrier {
    participants: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl Barrier {
    pub fn new(participants: usize) -> Result<Self, BarrierError> {
        if participants == 0 {
            return Err(BarrierError::ZeroParticipants);
        }
        Ok(Self {
            participants,
            state: Mutex::new(BarrierState { arrived: 0, generation: 0 }),
            released: Condvar::new(),
        })
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Number of participants currently blocked in the active round.
    pub fn waiting(&self) -> usize {
        self.lock().arrived
    }

    /// Block until every participant of the current round has arrived.
    pub fn wait(&self) -> BarrierWaitResult {
        let mut state = self.lock();
        let generation = state.generation;

        if Self::record_arrival(&mut state, self.participants) {
            drop(state);
            self.released.notify_all();
            return BarrierWaitResult { leader: true, generation };
        }

        // Spurious wakeups are filtered by the generation counter.
        while state.generation == generation {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        BarrierWaitResult { leader: false, generation }
    }

    /// Count an arrival without blocking.
    ///
    /// Used by the combine pool to give up the slot of a worker that could not
    /// be spawned, so the workers that did start are not left stranded.
    /// Returns `true` if this arrival released the round.
    pub fn arrive(&self) -> bool {
        let mut state = self.lock();
        let released = Self::record_arrival(&mut state, self.participants);
        drop(state);
        if released {
            self.released.notify_all();
        }
        released
    }

    /// Release the barrier. Fails if any participant is still inside `wait`.
    pub fn destroy(self) -> Result<(), BarrierError> {
        let state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        if state.arrived != 0 {
            return Err(BarrierError::ParticipantsBlocked { waiting: state.arrived });
        }
        Ok(())
    }

    fn record_arrival(state: &mut BarrierState, participants: usize) -> bool {
        state.arrived += 1;
        if state.arrived < participants {
            return false;
        }
        state.arrived = 0;
        state.generation = state.generation.wrapping_add(1);
        true
    }

    // The guarded state is two counters that are never left half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_participant_never_blocks() {
        let barrier = Barrier::new(1).unwrap();
        let first = barrier.wait();
        let second = barrier.wait();
        assert!(first.is_leader());
        assert!(second.is_leader());
        assert_eq!(second.generation(), first.generation() + 1);
        barrier.destroy().unwrap();
    }

    #[test]
    fn arrive_counts_towards_release() {
        let barrier = Barrier::new(2).unwrap();
        assert!(!barrier.arrive());
        assert_eq!(barrier.waiting(), 1);
        assert!(barrier.wait().is_leader());
        assert_eq!(barrier.waiting(), 0);
    }

    #[test]
    fn destroy_with_pending_arrival_is_rejected() {
        let barrier = Barrier::new(3).unwrap();
        barrier.arrive();
        assert_eq!(
            barrier.destroy(),
            Err(BarrierError::ParticipantsBlocked { waiting: 1 })
        );
    }
}
