//! Batch validation with optional cooperative cancellation.

use std::collections::HashMap;

use super::{DefaultValidator, ValidatableValue, ValidationResult, ValidationRule};
use crate::domain::batch::{self, BatchError, BatchOptions};
use crate::domain::foundation::CancellationToken;

/// One value and the rules it must satisfy.
pub struct ValidationTask {
    pub id: String,
    pub value: Box<dyn ValidatableValue>,
    pub rules: Vec<ValidationRule>,
}

impl ValidationTask {
    pub fn new(
        id: impl Into<String>,
        value: Box<dyn ValidatableValue>,
        rules: Vec<ValidationRule>,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            rules,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub id: String,
    pub result: ValidationResult,
}

/// Validates many values, serially or over a worker pool.
#[derive(Debug, Clone, Default)]
pub struct BatchValidator {
    validator: DefaultValidator,
    options: BatchOptions,
}

impl BatchValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BatchOptions) -> Self {
        Self {
            validator: DefaultValidator::new(),
            options,
        }
    }

    pub fn validate_all(&self, tasks: &[ValidationTask]) -> Vec<TaskResult> {
        batch::run_serial(tasks, |task| self.validate_one(task))
    }

    /// Validates every task, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Cancelled`] if `token` is cancelled before every
    /// task has started. No partial results are returned.
    pub fn validate_all_concurrent(
        &self,
        tasks: &[ValidationTask],
        workers: usize,
        token: &CancellationToken,
    ) -> Result<Vec<TaskResult>, BatchError> {
        batch::try_run_concurrent(tasks, workers, &self.options, token, |task| {
            self.validate_one(task)
        })
    }

    pub fn validate_all_to_map(&self, tasks: &[ValidationTask]) -> HashMap<String, TaskResult> {
        batch::index_by(self.validate_all(tasks), |r| r.id.clone())
    }

    pub fn validate_all_concurrent_to_map(
        &self,
        tasks: &[ValidationTask],
        workers: usize,
        token: &CancellationToken,
    ) -> Result<HashMap<String, TaskResult>, BatchError> {
        let results = self.validate_all_concurrent(tasks, workers, token)?;
        Ok(batch::index_by(results, |r| r.id.clone()))
    }

    fn validate_one(&self, task: &ValidationTask) -> TaskResult {
        TaskResult {
            id: task.id.clone(),
            result: self.validator.validate_value(task.value.as_ref(), &task.rules),
        }
    }
}

/// Summary over a set of task results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedResult {
    pub valid: bool,
    pub total_tasks: usize,
    pub passed_tasks: usize,
    pub failed_tasks: usize,
    /// Task id to the messages of its violations.
    pub failures: HashMap<String, Vec<String>>,
}

pub fn aggregate(results: &[TaskResult]) -> AggregatedResult {
    let mut agg = AggregatedResult {
        valid: true,
        total_tasks: results.len(),
        ..Default::default()
    };

    for r in results {
        if r.result.is_valid() {
            agg.passed_tasks += 1;
        } else {
            agg.valid = false;
            agg.failed_tasks += 1;
            agg.failures.insert(r.id.clone(), r.result.messages());
        }
    }

    agg
}
