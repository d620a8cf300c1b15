//! Output of the scoring and interpretation pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::RiskLevel;

/// Score, risk and text of one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScoreResult {
    pub factor_code: String,
    pub factor_name: String,
    pub raw_score: f64,
    pub risk_level: RiskLevel,
    pub conclusion: String,
    pub suggestion: String,
    pub is_total_score: bool,
}

impl FactorScoreResult {
    pub fn is_high_risk(&self) -> bool {
        self.risk_level.is_high_risk()
    }
}

/// Evaluation outcome applied to an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub total_score: f64,
    pub risk_level: RiskLevel,
    pub conclusion: String,
    pub suggestion: String,
    pub factor_scores: Vec<FactorScoreResult>,
}

impl EvaluationResult {
    pub fn factor_score(&self, factor_code: &str) -> Option<&FactorScoreResult> {
        self.factor_scores
            .iter()
            .find(|f| f.factor_code == factor_code)
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level.is_high_risk()
    }

    pub fn has_high_risk_factor(&self) -> bool {
        self.factor_scores.iter().any(FactorScoreResult::is_high_risk)
    }

    pub fn high_risk_factors(&self) -> Vec<&FactorScoreResult> {
        self.factor_scores
            .iter()
            .filter(|f| f.is_high_risk())
            .collect()
    }
}
