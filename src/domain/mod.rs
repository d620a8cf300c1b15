//! Domain layer containing the evaluation engine and its types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, risk levels, errors, events)
//! - `batch` - Order-preserving serial and pooled batch execution
//! - `calculation` - Scoring strategies and option scoring
//! - `validation` - Answer validation rules and batch validation
//! - `interpretation` - Rule tables and interpretation strategies
//! - `survey` - Answer sheets and questionnaires as seen by the engine
//! - `scale` - Medical scales, factor scoring and scale evaluation
//! - `assessment` - Assessment aggregate, lifecycle and events

pub mod assessment;
pub mod batch;
pub mod calculation;
pub mod foundation;
pub mod interpretation;
pub mod scale;
pub mod survey;
pub mod validation;
