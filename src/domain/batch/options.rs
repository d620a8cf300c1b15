//! Sizing knobs for batch execution.

use serde::{Deserialize, Serialize};

/// Controls when a batch runs serially and how many workers it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Batches smaller than this run on the calling thread.
    pub serial_threshold: usize,
    /// Auto-sized pools get one worker per this many tasks.
    pub tasks_per_worker: usize,
    /// Upper bound for auto-sized pools.
    pub max_workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            serial_threshold: 10,
            tasks_per_worker: 10,
            max_workers: 100,
        }
    }
}

impl BatchOptions {
    /// Returns true if a batch of `task_count` tasks should skip the pool.
    pub fn runs_serially(&self, task_count: usize) -> bool {
        task_count < self.serial_threshold
    }

    /// Resolves the pool size for a batch.
    ///
    /// A `requested` count of zero means auto: `task_count / tasks_per_worker`
    /// clamped to `1..=max_workers`. The result never exceeds the task count.
    pub fn resolve_workers(&self, task_count: usize, requested: usize) -> usize {
        let workers = if requested == 0 {
            let per_worker = self.tasks_per_worker.max(1);
            (task_count / per_worker).clamp(1, self.max_workers.max(1))
        } else {
            requested
        };
        workers.min(task_count).max(1)
    }
}
