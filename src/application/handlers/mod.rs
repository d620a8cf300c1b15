//! Application handlers.
//!
//! Command handlers that load aggregates, run domain services and publish
//! the resulting events.

mod evaluate_assessment;

pub use evaluate_assessment::{
    BatchSummary, EvaluateAssessmentHandler, EvaluationError, EvaluationOutcome,
};
