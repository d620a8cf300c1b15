//! Medical scales, their factors and factor interpretation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::calculation::StrategyType;
use crate::domain::foundation::{MedicalScaleId, RiskLevel};
use crate::domain::interpretation::{InterpretConfig, InterpretRule, ScoreRange};

/// How a factor turns its questions' answers into a raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorScoringStrategy {
    #[default]
    Sum,
    Avg,
    /// Counts the questions whose selected option content is listed in
    /// `cnt_option_contents`.
    Cnt,
}

impl FactorScoringStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorScoringStrategy::Sum => "sum",
            FactorScoringStrategy::Avg => "avg",
            FactorScoringStrategy::Cnt => "cnt",
        }
    }

    /// Scorer that reduces the collected values.
    pub fn reducer(&self) -> StrategyType {
        match self {
            FactorScoringStrategy::Sum => StrategyType::Sum,
            FactorScoringStrategy::Avg => StrategyType::Average,
            FactorScoringStrategy::Cnt => StrategyType::Count,
        }
    }
}

impl fmt::Display for FactorScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScoringParams {
    #[serde(default)]
    pub cnt_option_contents: Vec<String>,
}

/// Score band of a factor with its risk and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorInterpretRule {
    pub range: ScoreRange,
    pub risk_level: RiskLevel,
    pub conclusion: String,
    pub suggestion: String,
}

impl FactorInterpretRule {
    pub fn new(
        range: ScoreRange,
        risk_level: RiskLevel,
        conclusion: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            range,
            risk_level,
            conclusion: conclusion.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn matches(&self, score: f64) -> bool {
        self.range.contains(score)
    }

    /// Both conclusion and suggestion are present.
    pub fn has_text(&self) -> bool {
        !self.conclusion.is_empty() && !self.suggestion.is_empty()
    }
}

/// A scorable dimension of a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub is_total_score: bool,
    #[serde(default)]
    pub question_codes: Vec<String>,
    #[serde(default)]
    pub scoring_strategy: FactorScoringStrategy,
    #[serde(default)]
    pub scoring_params: FactorScoringParams,
    #[serde(default)]
    pub interpret_rules: Vec<FactorInterpretRule>,
}

impl Factor {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            is_total_score: false,
            question_codes: Vec::new(),
            scoring_strategy: FactorScoringStrategy::Sum,
            scoring_params: FactorScoringParams::default(),
            interpret_rules: Vec::new(),
        }
    }

    pub fn total_score(mut self) -> Self {
        self.is_total_score = true;
        self
    }

    pub fn with_questions<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.question_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strategy(mut self, strategy: FactorScoringStrategy) -> Self {
        self.scoring_strategy = strategy;
        self
    }

    pub fn with_cnt_option_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scoring_params.cnt_option_contents = contents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rules(mut self, rules: Vec<FactorInterpretRule>) -> Self {
        self.interpret_rules = rules;
        self
    }

    /// First rule whose range contains `score`.
    pub fn find_interpret_rule(&self, score: f64) -> Option<&FactorInterpretRule> {
        self.interpret_rules.iter().find(|rule| rule.matches(score))
    }

    /// Range-strategy configuration equivalent to this factor's rules.
    pub fn interpret_config(&self) -> InterpretConfig {
        let rules = self
            .interpret_rules
            .iter()
            .map(|rule| {
                InterpretRule::new(
                    rule.range,
                    rule.risk_level,
                    rule.risk_level.as_str(),
                    rule.conclusion.clone(),
                    rule.suggestion.clone(),
                )
            })
            .collect();
        InterpretConfig::new(self.code.clone(), rules)
    }
}

/// A medical scale bound to a questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalScale {
    pub id: MedicalScaleId,
    pub code: String,
    pub title: String,
    pub questionnaire_code: String,
    pub questionnaire_version: String,
    pub factors: Vec<Factor>,
}

impl MedicalScale {
    pub fn new(
        id: MedicalScaleId,
        code: impl Into<String>,
        title: impl Into<String>,
        questionnaire_code: impl Into<String>,
        questionnaire_version: impl Into<String>,
        factors: Vec<Factor>,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            title: title.into(),
            questionnaire_code: questionnaire_code.into(),
            questionnaire_version: questionnaire_version.into(),
            factors,
        }
    }

    pub fn find_factor(&self, code: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.code == code)
    }

    pub fn total_score_factor(&self) -> Option<&Factor> {
        self.factors.iter().find(|f| f.is_total_score)
    }
}
