//! Evaluation pipeline configuration

use serde::Deserialize;

/// How the pipeline runs its batch steps.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// Interpret factors on a worker pool
    #[serde(default = "default_concurrent")]
    pub concurrent: bool,

    /// Pool size; 0 sizes the pool from the task count
    #[serde(default)]
    pub worker_count: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            concurrent: default_concurrent(),
            worker_count: 0,
        }
    }
}

fn default_concurrent() -> bool {
    true
}
