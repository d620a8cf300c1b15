//! Generic batch execution shared by scoring, validation and interpretation.
//!
//! Every batch API returns results in input order. Small batches run on the
//! calling thread; larger ones fan out over a pool that lives only for the
//! duration of the call.

mod options;
mod runner;

use thiserror::Error;

pub use options::BatchOptions;
pub use runner::{index_by, run_concurrent, run_serial, try_run_concurrent};

/// Errors from cancellable batch calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("batch cancelled after {completed} of {total} tasks")]
    Cancelled { completed: usize, total: usize },
}
