//! Interpretation module - scores plus rules to risk levels and text.
//!
//! Nothing here knows about assessments or scales:
//! - `ScoreRange` and `validate_ranges` check rule tables at configuration time
//! - strategies (range, threshold, composite) are looked up by key
//! - `DefaultInterpretationProvider` supplies text when no rule text exists
//! - `BatchInterpreter` interprets many factors, preserving input order

mod batch;
mod default_provider;
mod errors;
mod interpreter;
mod score_range;
mod strategies;
mod types;

pub use batch::{BatchInterpreter, InterpretTask, InterpretTaskResult};
pub use default_provider::DefaultInterpretationProvider;
pub use errors::InterpretationError;
pub use interpreter::{DefaultInterpreter, Interpreter};
pub use score_range::{validate_ranges, ScoreRange, SimpleInterpretRule};
pub use strategies::{
    get_composite_strategy, get_strategy, CompositeRuleStrategy, CompositeStrategy,
    InterpretStrategy, RangeStrategy, ThresholdStrategy,
};
pub use types::{
    ComparisonOperator, CompositeConfig, CompositeResult, CompositeRule, FactorCondition,
    InterpretConfig, InterpretResult, InterpretRule, InterpretStrategyType, LogicalOperator,
    ScoredFactor,
};
