//! # Background job queue.
//!
//! Holds `(owner, job)` pairs until the next poll tick. The tick atomically
//! swaps the whole list for an empty one and works through the drained
//! batch; jobs pushed while a drain is in flight land in the fresh list and
//! run on the *next* tick. That bounds one tick to one pass — a job chain of
//! length N takes N ticks, never an unbounded same-tick loop.

use std::mem;
use std::sync::Mutex;

use crate::messages::JobRecord;

/// Supervisor-owned list of deferred jobs, paired with their owners.
#[derive(Debug, Default)]
pub struct JobQueue {
    pending: Mutex<Vec<(String, JobRecord)>>,
}

impl JobQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a job on behalf of `owner` for the next drain.
    pub fn push(&self, owner: impl Into<String>, job: JobRecord) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.push((owner.into(), job));
    }

    /// Atomically takes the current list, leaving an empty one behind.
    pub fn swap(&self) -> Vec<(String, JobRecord)> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        mem::take(&mut *pending)
    }

    /// Number of jobs waiting for the next drain.
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
