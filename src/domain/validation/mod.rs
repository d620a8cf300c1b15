//! Validation module - answer validation rules and batch validation.

mod batch;
mod rules;

pub use batch::{aggregate, AggregatedResult, BatchValidator, TaskResult, ValidationTask};
pub use rules::{
    DefaultValidator, RuleType, RuleViolation, ValidatableValue, ValidationResult, ValidationRule,
};
