use log::debug;

/// Worker-count configuration for the combine phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub worker_count: usize,
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self { worker_count: 1 }
    }

    /// One worker per available processor.
    pub fn dynamic() -> Self {
        let cores = num_cpus::get();
        debug!("[PROFILE] detected {} processor(s)", cores);
        Self { worker_count: cores }
    }

    /// Explicit worker count (still clamped by `workers_for`).
    pub fn fixed(worker_count: usize) -> Self {
        Self { worker_count }
    }

    /// Effective worker count for a region of `len` bytes, in `[1, len]`.
    pub fn workers_for(&self, len: usize) -> usize {
        super::partition::effective_worker_count(self.worker_count, len)
    }
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::dynamic()
    }
}
