//! Batch interpretation of independent factor scores.

use std::collections::HashMap;

use super::{
    DefaultInterpreter, InterpretConfig, InterpretResult, InterpretStrategyType,
    InterpretationError, Interpreter,
};
use crate::domain::batch::{self, BatchOptions};

/// One score to interpret, usually keyed by factor code.
#[derive(Debug, Clone)]
pub struct InterpretTask {
    pub id: String,
    pub score: f64,
    pub config: InterpretConfig,
    pub strategy_type: InterpretStrategyType,
}

impl InterpretTask {
    pub fn new(
        id: impl Into<String>,
        score: f64,
        config: InterpretConfig,
        strategy_type: InterpretStrategyType,
    ) -> Self {
        Self {
            id: id.into(),
            score,
            config,
            strategy_type,
        }
    }
}

/// Outcome of one task. A failing task does not affect the others.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretTaskResult {
    pub id: String,
    pub result: Result<InterpretResult, InterpretationError>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchInterpreter {
    interpreter: DefaultInterpreter,
    options: BatchOptions,
}

impl BatchInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BatchOptions) -> Self {
        Self {
            interpreter: DefaultInterpreter::new(),
            options,
        }
    }

    pub fn interpret_all(&self, tasks: &[InterpretTask]) -> Vec<InterpretTaskResult> {
        batch::run_serial(tasks, |task| self.interpret_one(task))
    }

    /// Interprets every task, in input order. `workers == 0` sizes the pool
    /// automatically.
    pub fn interpret_all_concurrent(
        &self,
        tasks: &[InterpretTask],
        workers: usize,
    ) -> Vec<InterpretTaskResult> {
        batch::run_concurrent(tasks, workers, &self.options, |task| self.interpret_one(task))
    }

    /// Successful results keyed by task id. Failed tasks are left out.
    pub fn interpret_all_to_map(&self, tasks: &[InterpretTask]) -> HashMap<String, InterpretResult> {
        self.interpret_all_concurrent(tasks, 0)
            .into_iter()
            .filter_map(|task| task.result.ok().map(|result| (task.id, result)))
            .collect()
    }

    fn interpret_one(&self, task: &InterpretTask) -> InterpretTaskResult {
        InterpretTaskResult {
            id: task.id.clone(),
            result: self
                .interpreter
                .interpret_factor(task.score, &task.config, task.strategy_type),
        }
    }
}
