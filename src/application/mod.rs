//! Application layer - handlers that drive the domain through the ports.

pub mod handlers;

pub use handlers::{
    BatchSummary, EvaluateAssessmentHandler, EvaluationError, EvaluationOutcome,
};
