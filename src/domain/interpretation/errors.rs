//! Interpretation errors.

use thiserror::Error;

/// Configuration and dispatch errors raised while interpreting scores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretationError {
    #[error("rule set cannot be empty")]
    EmptyRuleSet,

    #[error("invalid range: [{min:.2}, {max:.2}), min score must be less than max score")]
    InvalidRange { min: f64, max: f64 },

    #[error("discontinuous ranges at index {index}: {previous_max:.2} != {current_min:.2}")]
    DiscontinuousRanges {
        index: usize,
        previous_max: f64,
        current_min: f64,
    },

    #[error("overlapping ranges: {first} and {second}")]
    OverlappingRanges { first: String, second: String },

    #[error("{strategy} strategy requires at least {required} rules, got {actual}")]
    InsufficientRules {
        strategy: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("unsupported strategy type: {0}")]
    UnsupportedStrategy(String),

    #[error("interpretation content cannot be empty")]
    EmptyContent,
}
