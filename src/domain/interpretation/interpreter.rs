//! Strategy dispatch for factor and composite interpretation.

use super::{
    get_composite_strategy, get_strategy, CompositeConfig, CompositeResult, InterpretConfig,
    InterpretResult, InterpretRule, InterpretStrategyType, InterpretationError, ScoredFactor,
};

/// Turns scores plus rules into interpretation results.
///
/// Implementations know nothing about assessments or scales; they only see
/// scores and rule configuration.
pub trait Interpreter: Send + Sync {
    /// Interprets one factor's score with the named strategy.
    ///
    /// # Errors
    ///
    /// - `UnsupportedStrategy` if `strategy_type` has no single-factor strategy
    /// - whatever the strategy itself rejects (empty rules, too few rules)
    fn interpret_factor(
        &self,
        score: f64,
        config: &InterpretConfig,
        strategy_type: InterpretStrategyType,
    ) -> Result<InterpretResult, InterpretationError>;

    /// Applies a single rule. Returns `None` when the score is outside it.
    fn interpret_factor_with_rule(&self, score: f64, rule: &InterpretRule)
        -> Option<InterpretResult>;

    /// Interprets several factors together with the named composite strategy.
    ///
    /// # Errors
    ///
    /// `UnsupportedStrategy` if `strategy_type` has no composite strategy.
    fn interpret_multiple_factors(
        &self,
        scores: &[ScoredFactor],
        config: &CompositeConfig,
        strategy_type: InterpretStrategyType,
    ) -> Result<CompositeResult, InterpretationError>;
}

/// Interpreter backed by the built-in strategy registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInterpreter;

impl DefaultInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl Interpreter for DefaultInterpreter {
    fn interpret_factor(
        &self,
        score: f64,
        config: &InterpretConfig,
        strategy_type: InterpretStrategyType,
    ) -> Result<InterpretResult, InterpretationError> {
        let strategy = get_strategy(strategy_type)
            .ok_or_else(|| InterpretationError::UnsupportedStrategy(strategy_type.to_string()))?;
        strategy.interpret(score, config)
    }

    fn interpret_factor_with_rule(
        &self,
        score: f64,
        rule: &InterpretRule,
    ) -> Option<InterpretResult> {
        rule.contains(score).then(|| rule.to_result("", score))
    }

    fn interpret_multiple_factors(
        &self,
        scores: &[ScoredFactor],
        config: &CompositeConfig,
        strategy_type: InterpretStrategyType,
    ) -> Result<CompositeResult, InterpretationError> {
        let strategy = get_composite_strategy(strategy_type)
            .ok_or_else(|| InterpretationError::UnsupportedStrategy(strategy_type.to_string()))?;
        strategy.interpret_multiple(scores, config)
    }
}
