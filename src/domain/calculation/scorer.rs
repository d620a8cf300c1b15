//! Scorer family: stateless reductions of a value list to one score.
//!
//! Every strategy returns `0.0` for an empty value list. A question nobody
//! answered contributes nothing; it is not an error.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::ScoringError;

/// Parameter map passed to scorers (e.g. `weights` for weighted sums).
pub type ScoringParams = HashMap<String, String>;

/// Key selecting a scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Sum,
    Average,
    WeightedSum,
    Max,
    Min,
    Count,
    First,
    Last,
}

impl StrategyType {
    pub const ALL: [StrategyType; 8] = [
        StrategyType::Sum,
        StrategyType::Average,
        StrategyType::WeightedSum,
        StrategyType::Max,
        StrategyType::Min,
        StrategyType::Count,
        StrategyType::First,
        StrategyType::Last,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Sum => "sum",
            StrategyType::Average => "average",
            StrategyType::WeightedSum => "weighted_sum",
            StrategyType::Max => "max",
            StrategyType::Min => "min",
            StrategyType::Count => "count",
            StrategyType::First => "first",
            StrategyType::Last => "last",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyType::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ScoringError::UnknownStrategy(s.to_string()))
    }
}

/// A single scoring strategy.
pub trait Scorer: Send + Sync {
    /// The key this scorer is registered under.
    fn strategy_type(&self) -> StrategyType;

    /// Reduces `values` to a score.
    ///
    /// # Errors
    ///
    /// Only strategies that read parameters can fail; see [`WeightedSumScorer`].
    fn calculate(&self, values: &[f64], params: &ScoringParams) -> Result<f64, ScoringError>;
}

pub struct SumScorer;

impl Scorer for SumScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Sum
    }

    fn calculate(&self, values: &[f64], _params: &ScoringParams) -> Result<f64, ScoringError> {
        Ok(values.iter().sum())
    }
}

pub struct AverageScorer;

impl Scorer for AverageScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Average
    }

    fn calculate(&self, values: &[f64], _params: &ScoringParams) -> Result<f64, ScoringError> {
        if values.is_empty() {
            return Ok(0.0);
        }
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sums `values[i] * weights[i]`.
///
/// Weights come from the `weights` parameter as a JSON array of numbers.
/// Without the parameter every weight is 1.0.
pub struct WeightedSumScorer;

impl WeightedSumScorer {
    fn parse_weights(raw: &str) -> Result<Vec<f64>, ScoringError> {
        serde_json::from_str(raw).map_err(|e| ScoringError::InvalidWeights(e.to_string()))
    }
}

impl Scorer for WeightedSumScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::WeightedSum
    }

    fn calculate(&self, values: &[f64], params: &ScoringParams) -> Result<f64, ScoringError> {
        if values.is_empty() {
            return Ok(0.0);
        }

        let Some(raw) = params.get("weights") else {
            return Ok(values.iter().sum());
        };

        let weights = Self::parse_weights(raw)?;
        if weights.len() != values.len() {
            return Err(ScoringError::WeightsMismatch {
                weights: weights.len(),
                values: values.len(),
            });
        }

        Ok(values.iter().zip(&weights).map(|(v, w)| v * w).sum())
    }
}

pub struct MaxScorer;

impl Scorer for MaxScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Max
    }

    fn calculate(&self, values: &[f64], _params: &ScoringParams) -> Result<f64, ScoringError> {
        Ok(values.iter().copied().reduce(f64::max).unwrap_or(0.0))
    }
}

pub struct MinScorer;

impl Scorer for MinScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Min
    }

    fn calculate(&self, values: &[f64], _params: &ScoringParams) -> Result<f64, ScoringError> {
        Ok(values.iter().copied().reduce(f64::min).unwrap_or(0.0))
    }
}

pub struct CountScorer;

impl Scorer for CountScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Count
    }

    fn calculate(&self, values: &[f64], _params: &ScoringParams) -> Result<f64, ScoringError> {
        Ok(values.len() as f64)
    }
}

pub struct FirstScorer;

impl Scorer for FirstScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::First
    }

    fn calculate(&self, values: &[f64], _params: &ScoringParams) -> Result<f64, ScoringError> {
        Ok(values.first().copied().unwrap_or(0.0))
    }
}

pub struct LastScorer;

impl Scorer for LastScorer {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Last
    }

    fn calculate(&self, values: &[f64], _params: &ScoringParams) -> Result<f64, ScoringError> {
        Ok(values.last().copied().unwrap_or(0.0))
    }
}

static SCORERS: Lazy<HashMap<StrategyType, Box<dyn Scorer>>> = Lazy::new(|| {
    let scorers: Vec<Box<dyn Scorer>> = vec![
        Box::new(SumScorer),
        Box::new(AverageScorer),
        Box::new(WeightedSumScorer),
        Box::new(MaxScorer),
        Box::new(MinScorer),
        Box::new(CountScorer),
        Box::new(FirstScorer),
        Box::new(LastScorer),
    ];
    scorers
        .into_iter()
        .map(|scorer| (scorer.strategy_type(), scorer))
        .collect()
});

/// Looks up the registered scorer for a strategy.
pub fn get_scorer(strategy: StrategyType) -> Option<&'static dyn Scorer> {
    SCORERS.get(&strategy).map(|scorer| scorer.as_ref())
}

/// Looks up a scorer by its string key.
///
/// # Errors
///
/// Returns [`ScoringError::UnknownStrategy`] for keys with no scorer.
pub fn scorer_for(key: &str) -> Result<&'static dyn Scorer, ScoringError> {
    let strategy: StrategyType = key.parse()?;
    get_scorer(strategy).ok_or_else(|| ScoringError::UnknownStrategy(key.to_string()))
}

/// Scores `values` with the strategy named by `key`.
pub fn calculate(key: &str, values: &[f64], params: &ScoringParams) -> Result<f64, ScoringError> {
    scorer_for(key)?.calculate(values, params)
}
