//! Score snapshots and trend analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EvaluationResult;
use crate::domain::foundation::{AssessmentId, RiskLevel, Timestamp};

/// Relative change, in percent, beyond which a trend is not stable.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor_code: String,
    pub factor_name: String,
    pub raw_score: f64,
    pub risk_level: RiskLevel,
    pub is_total_score: bool,
}

impl FactorScore {
    pub fn is_high_risk(&self) -> bool {
        self.risk_level.is_high_risk()
    }
}

/// Persisted scores of one interpreted assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScore {
    assessment_id: AssessmentId,
    total_score: f64,
    risk_level: RiskLevel,
    factor_scores: Vec<FactorScore>,
    created_at: Timestamp,
}

impl AssessmentScore {
    pub fn new(
        assessment_id: AssessmentId,
        total_score: f64,
        risk_level: RiskLevel,
        factor_scores: Vec<FactorScore>,
    ) -> Self {
        Self {
            assessment_id,
            total_score,
            risk_level,
            factor_scores,
            created_at: Timestamp::now(),
        }
    }

    pub fn reconstitute(
        assessment_id: AssessmentId,
        total_score: f64,
        risk_level: RiskLevel,
        factor_scores: Vec<FactorScore>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            assessment_id,
            total_score,
            risk_level,
            factor_scores,
            created_at,
        }
    }

    pub fn from_evaluation_result(assessment_id: AssessmentId, result: &EvaluationResult) -> Self {
        let factor_scores = result
            .factor_scores
            .iter()
            .map(|f| FactorScore {
                factor_code: f.factor_code.clone(),
                factor_name: f.factor_name.clone(),
                raw_score: f.raw_score,
                risk_level: f.risk_level,
                is_total_score: f.is_total_score,
            })
            .collect();
        Self::new(assessment_id, result.total_score, result.risk_level, factor_scores)
    }

    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn factor_scores(&self) -> &[FactorScore] {
        &self.factor_scores
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level.is_high_risk()
    }

    pub fn factor_score(&self, factor_code: &str) -> Option<&FactorScore> {
        self.factor_scores.iter().find(|f| f.factor_code == factor_code)
    }

    pub fn high_risk_factors(&self) -> Vec<&FactorScore> {
        self.factor_scores.iter().filter(|f| f.is_high_risk()).collect()
    }

    pub fn total_score_factor(&self) -> Option<&FactorScore> {
        self.factor_scores.iter().find(|f| f.is_total_score)
    }

    pub fn factor_count(&self) -> usize {
        self.factor_scores.len()
    }
}

/// Direction of a factor's scores over time.
///
/// Lower scores are better on the scales this engine evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendType {
    Improving,
    Stable,
    Worsening,
    Unknown,
}

impl TrendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendType::Improving => "improving",
            TrendType::Stable => "stable",
            TrendType::Worsening => "worsening",
            TrendType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDataPoint {
    pub assessment_id: AssessmentId,
    pub raw_score: f64,
    pub risk_level: RiskLevel,
    pub recorded_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrend {
    pub factor_code: String,
    pub factor_name: String,
    pub data_points: Vec<ScoreDataPoint>,
    pub trend_type: TrendType,
    pub change_rate: f64,
}

impl ScoreTrend {
    /// Builds a trend from chronologically ordered data points.
    pub fn new(
        factor_code: impl Into<String>,
        factor_name: impl Into<String>,
        data_points: Vec<ScoreDataPoint>,
    ) -> Self {
        let (trend_type, change_rate) = calculate_trend(&data_points);
        Self {
            factor_code: factor_code.into(),
            factor_name: factor_name.into(),
            data_points,
            trend_type,
            change_rate,
        }
    }
}

/// Compares the last data point with the first.
///
/// Returns the trend and the change rate in percent. Fewer than two points
/// or a zero first score give `Unknown` with rate 0.
pub fn calculate_trend(data_points: &[ScoreDataPoint]) -> (TrendType, f64) {
    let (Some(first), Some(last)) = (data_points.first(), data_points.last()) else {
        return (TrendType::Unknown, 0.0);
    };
    if data_points.len() < 2 || first.raw_score == 0.0 {
        return (TrendType::Unknown, 0.0);
    }

    let change_rate = (last.raw_score - first.raw_score) / first.raw_score * 100.0;
    let trend = if change_rate < -TREND_THRESHOLD_PERCENT {
        TrendType::Improving
    } else if change_rate > TREND_THRESHOLD_PERCENT {
        TrendType::Worsening
    } else {
        TrendType::Stable
    };
    (trend, change_rate)
}
