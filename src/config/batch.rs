//! Batch execution configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::batch::BatchOptions;

/// Sizing of the worker pools used by batch scoring, validation and
/// interpretation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BatchConfig {
    /// Batches smaller than this run serially
    #[serde(default = "default_serial_threshold")]
    pub serial_threshold: usize,

    /// Tasks per worker when the pool is sized automatically
    #[serde(default = "default_tasks_per_worker")]
    pub tasks_per_worker: usize,

    /// Upper bound for automatically sized pools
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

impl BatchConfig {
    pub fn options(&self) -> BatchOptions {
        BatchOptions {
            serial_threshold: self.serial_threshold,
            tasks_per_worker: self.tasks_per_worker,
            max_workers: self.max_workers,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.serial_threshold == 0 {
            return Err(ValidationError::InvalidBatchSetting("serial_threshold"));
        }
        if self.tasks_per_worker == 0 {
            return Err(ValidationError::InvalidBatchSetting("tasks_per_worker"));
        }
        if self.max_workers == 0 {
            return Err(ValidationError::InvalidBatchSetting("max_workers"));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            serial_threshold: default_serial_threshold(),
            tasks_per_worker: default_tasks_per_worker(),
            max_workers: default_max_workers(),
        }
    }
}

fn default_serial_threshold() -> usize {
    10
}

fn default_tasks_per_worker() -> usize {
    10
}

fn default_max_workers() -> usize {
    100
}
