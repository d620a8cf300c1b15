//! Scoring errors.

use thiserror::Error;

/// Errors raised by scoring strategies and their configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("unknown scoring strategy: {0}")]
    UnknownStrategy(String),

    #[error("weights count does not match values count: {weights} weights, {values} values")]
    WeightsMismatch { weights: usize, values: usize },

    #[error("invalid weights parameter: {0}")]
    InvalidWeights(String),

    #[error("missing scoring parameter: {0}")]
    MissingParameter(String),
}
