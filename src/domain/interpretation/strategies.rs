//! Interpretation strategies.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{
    CompositeConfig, CompositeResult, CompositeRule, InterpretConfig, InterpretResult,
    InterpretStrategyType, InterpretationError, LogicalOperator, ScoredFactor,
};
use crate::domain::foundation::RiskLevel;

/// Interprets one factor's score against its configuration.
pub trait InterpretStrategy: Send + Sync {
    fn strategy_type(&self) -> InterpretStrategyType;

    fn interpret(
        &self,
        score: f64,
        config: &InterpretConfig,
    ) -> Result<InterpretResult, InterpretationError>;
}

/// Interprets several factors together.
pub trait CompositeStrategy: Send + Sync {
    fn strategy_type(&self) -> InterpretStrategyType;

    fn interpret_multiple(
        &self,
        scores: &[ScoredFactor],
        config: &CompositeConfig,
    ) -> Result<CompositeResult, InterpretationError>;
}

/// First rule whose range contains the score.
///
/// A score outside every range falls back to the last rule and the result is
/// flagged `out_of_coverage`.
pub struct RangeStrategy;

impl InterpretStrategy for RangeStrategy {
    fn strategy_type(&self) -> InterpretStrategyType {
        InterpretStrategyType::Range
    }

    fn interpret(
        &self,
        score: f64,
        config: &InterpretConfig,
    ) -> Result<InterpretResult, InterpretationError> {
        if let Some(rule) = config.rules.iter().find(|rule| rule.contains(score)) {
            return Ok(rule.to_result(&config.factor_code, score));
        }

        let last = config.rules.last().ok_or(InterpretationError::EmptyRuleSet)?;
        tracing::warn!(
            factor_code = %config.factor_code,
            score,
            fallback = %last.range,
            "score outside configured ranges, using last rule"
        );
        let mut result = last.to_result(&config.factor_code, score);
        result.out_of_coverage = true;
        Ok(result)
    }
}

/// Two-rule split on the `threshold` parameter.
///
/// `rules[0]` is the normal outcome, `rules[1]` applies when the score is
/// strictly greater than the threshold. A missing or unparsable threshold
/// counts as 0.
pub struct ThresholdStrategy;

impl ThresholdStrategy {
    fn threshold(config: &InterpretConfig) -> f64 {
        config
            .params
            .get("threshold")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0.0)
    }
}

impl InterpretStrategy for ThresholdStrategy {
    fn strategy_type(&self) -> InterpretStrategyType {
        InterpretStrategyType::Threshold
    }

    fn interpret(
        &self,
        score: f64,
        config: &InterpretConfig,
    ) -> Result<InterpretResult, InterpretationError> {
        let [normal, high, ..] = config.rules.as_slice() else {
            return Err(InterpretationError::InsufficientRules {
                strategy: "threshold",
                required: 2,
                actual: config.rules.len(),
            });
        };

        let rule = if score > Self::threshold(config) { high } else { normal };
        Ok(rule.to_result(&config.factor_code, score))
    }
}

/// First composite rule whose conditions hold.
///
/// A condition on a factor that was not scored is false. When no rule
/// matches the result is risk `none` labelled "正常".
pub struct CompositeRuleStrategy;

impl CompositeRuleStrategy {
    fn matches(rule: &CompositeRule, scores: &HashMap<&str, f64>) -> bool {
        let mut outcomes = rule.conditions.iter().map(|cond| {
            scores
                .get(cond.factor_code.as_str())
                .is_some_and(|score| cond.evaluate(*score))
        });
        match rule.operator {
            LogicalOperator::And => outcomes.all(|hit| hit),
            LogicalOperator::Or => outcomes.any(|hit| hit),
        }
    }

    fn details(rule: &CompositeRule, scores: &HashMap<&str, f64>) -> Vec<InterpretResult> {
        rule.conditions
            .iter()
            .filter_map(|cond| {
                scores.get(cond.factor_code.as_str()).map(|score| InterpretResult {
                    factor_code: cond.factor_code.clone(),
                    score: *score,
                    risk_level: rule.risk_level,
                    label: rule.label.clone(),
                    description: rule.description.clone(),
                    suggestion: rule.suggestion.clone(),
                    out_of_coverage: false,
                })
            })
            .collect()
    }
}

impl CompositeStrategy for CompositeRuleStrategy {
    fn strategy_type(&self) -> InterpretStrategyType {
        InterpretStrategyType::Composite
    }

    fn interpret_multiple(
        &self,
        scores: &[ScoredFactor],
        config: &CompositeConfig,
    ) -> Result<CompositeResult, InterpretationError> {
        let by_code: HashMap<&str, f64> = scores
            .iter()
            .map(|s| (s.factor_code.as_str(), s.score))
            .collect();

        let matched = config
            .rules
            .iter()
            .find(|rule| Self::matches(rule, &by_code));

        Ok(match matched {
            Some(rule) => CompositeResult {
                risk_level: rule.risk_level,
                label: rule.label.clone(),
                description: rule.description.clone(),
                suggestion: rule.suggestion.clone(),
                details: Self::details(rule, &by_code),
            },
            None => CompositeResult {
                risk_level: RiskLevel::None,
                label: "正常".to_string(),
                description: String::new(),
                suggestion: String::new(),
                details: Vec::new(),
            },
        })
    }
}

static STRATEGIES: Lazy<HashMap<InterpretStrategyType, Box<dyn InterpretStrategy>>> =
    Lazy::new(|| {
        let strategies: Vec<Box<dyn InterpretStrategy>> =
            vec![Box::new(RangeStrategy), Box::new(ThresholdStrategy)];
        strategies
            .into_iter()
            .map(|s| (s.strategy_type(), s))
            .collect()
    });

static COMPOSITE_STRATEGIES: Lazy<HashMap<InterpretStrategyType, Box<dyn CompositeStrategy>>> =
    Lazy::new(|| {
        let strategy: Box<dyn CompositeStrategy> = Box::new(CompositeRuleStrategy);
        HashMap::from([(strategy.strategy_type(), strategy)])
    });

/// Single-factor strategy registered for `strategy_type`, if any.
pub fn get_strategy(strategy_type: InterpretStrategyType) -> Option<&'static dyn InterpretStrategy> {
    STRATEGIES.get(&strategy_type).map(|s| s.as_ref())
}

/// Multi-factor strategy registered for `strategy_type`, if any.
pub fn get_composite_strategy(
    strategy_type: InterpretStrategyType,
) -> Option<&'static dyn CompositeStrategy> {
    COMPOSITE_STRATEGIES.get(&strategy_type).map(|s| s.as_ref())
}
