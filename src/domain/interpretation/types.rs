//! Interpretation rules, configurations and results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::{validate_ranges, InterpretationError, ScoreRange};
use crate::domain::foundation::RiskLevel;

/// Key selecting an interpretation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretStrategyType {
    Threshold,
    Range,
    Composite,
}

impl InterpretStrategyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpretStrategyType::Threshold => "threshold",
            InterpretStrategyType::Range => "range",
            InterpretStrategyType::Composite => "composite",
        }
    }
}

impl fmt::Display for InterpretStrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InterpretStrategyType {
    type Err = InterpretationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threshold" => Ok(InterpretStrategyType::Threshold),
            "range" => Ok(InterpretStrategyType::Range),
            "composite" => Ok(InterpretStrategyType::Composite),
            other => Err(InterpretationError::UnsupportedStrategy(other.to_string())),
        }
    }
}

/// One row of a factor's rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretRule {
    pub range: ScoreRange,
    pub risk_level: RiskLevel,
    pub label: String,
    pub description: String,
    pub suggestion: String,
}

impl InterpretRule {
    pub fn new(
        range: ScoreRange,
        risk_level: RiskLevel,
        label: impl Into<String>,
        description: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            range,
            risk_level,
            label: label.into(),
            description: description.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.range.contains(score)
    }

    pub(crate) fn to_result(&self, factor_code: &str, score: f64) -> InterpretResult {
        InterpretResult {
            factor_code: factor_code.to_string(),
            score,
            risk_level: self.risk_level,
            label: self.label.clone(),
            description: self.description.clone(),
            suggestion: self.suggestion.clone(),
            out_of_coverage: false,
        }
    }
}

/// Rules and parameters for interpreting one factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretConfig {
    pub factor_code: String,
    pub rules: Vec<InterpretRule>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl InterpretConfig {
    pub fn new(factor_code: impl Into<String>, rules: Vec<InterpretRule>) -> Self {
        Self {
            factor_code: factor_code.into(),
            rules,
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Checks the rule table for a range-interpreted factor.
    ///
    /// Range coverage is a configuration-time property and is not re-checked
    /// on every interpretation.
    pub fn validate(&self) -> Result<(), InterpretationError> {
        let ranges: Vec<ScoreRange> = self.rules.iter().map(|r| r.range).collect();
        validate_ranges(&ranges)
    }
}

/// Result of interpreting one factor's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretResult {
    pub factor_code: String,
    pub score: f64,
    pub risk_level: RiskLevel,
    pub label: String,
    pub description: String,
    pub suggestion: String,
    /// Set when no rule covered the score and the range strategy fell back
    /// to the last rule.
    #[serde(default)]
    pub out_of_coverage: bool,
}

impl InterpretResult {
    pub fn is_high_risk(&self) -> bool {
        self.risk_level.is_high_risk()
    }
}

/// A factor code with its score, input to composite interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFactor {
    pub factor_code: String,
    pub score: f64,
}

impl ScoredFactor {
    pub fn new(factor_code: impl Into<String>, score: f64) -> Self {
        Self {
            factor_code: factor_code.into(),
            score,
        }
    }
}

/// How a composite rule combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

/// Comparison applied by a factor condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "==")]
    Eq,
    /// Inclusive on both ends.
    #[serde(rename = "between")]
    Between,
}

/// A comparison against one factor's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorCondition {
    pub factor_code: String,
    pub operator: ComparisonOperator,
    pub value: f64,
    /// Upper bound for `between`.
    #[serde(default)]
    pub max_value: f64,
}

impl FactorCondition {
    pub fn new(factor_code: impl Into<String>, operator: ComparisonOperator, value: f64) -> Self {
        Self {
            factor_code: factor_code.into(),
            operator,
            value,
            max_value: 0.0,
        }
    }

    pub fn between(factor_code: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            factor_code: factor_code.into(),
            operator: ComparisonOperator::Between,
            value: min,
            max_value: max,
        }
    }

    pub fn evaluate(&self, score: f64) -> bool {
        match self.operator {
            ComparisonOperator::Gt => score > self.value,
            ComparisonOperator::Gte => score >= self.value,
            ComparisonOperator::Lt => score < self.value,
            ComparisonOperator::Lte => score <= self.value,
            ComparisonOperator::Eq => score == self.value,
            ComparisonOperator::Between => score >= self.value && score <= self.max_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub conditions: Vec<FactorCondition>,
    #[serde(default)]
    pub operator: LogicalOperator,
    pub risk_level: RiskLevel,
    pub label: String,
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// Evaluated in order; the first matching rule wins.
    pub rules: Vec<CompositeRule>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Result of a composite interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub risk_level: RiskLevel,
    pub label: String,
    pub description: String,
    pub suggestion: String,
    /// Per-factor detail for the factors the matching rule referenced.
    pub details: Vec<InterpretResult>,
}

impl CompositeResult {
    pub fn is_high_risk(&self) -> bool {
        self.risk_level.is_high_risk()
    }
}
