//! Resolves one answer value against an option-score table.

use std::collections::HashMap;

/// Option code to score.
pub type OptionScores = HashMap<String, f64>;

/// Read-only view of an answer value for scoring purposes.
///
/// Each accessor returns `None` when the value is not of that shape.
pub trait ScorableValue: Send + Sync {
    fn is_empty(&self) -> bool;

    fn as_single_selection(&self) -> Option<&str>;

    fn as_multiple_selections(&self) -> Option<&[String]>;

    fn as_number(&self) -> Option<f64>;
}

/// Scores answer values by option lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionScorer;

impl OptionScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores a value.
    ///
    /// Resolution order:
    /// 1. a single selection found in the table scores its option
    /// 2. multiple selections score the sum of the codes found in the table
    /// 3. a number scores itself
    ///
    /// Empty values, empty tables and unmatched codes all score zero.
    pub fn score(&self, value: &dyn ScorableValue, option_scores: &OptionScores) -> f64 {
        if value.is_empty() || option_scores.is_empty() {
            return 0.0;
        }

        if let Some(code) = value.as_single_selection() {
            if let Some(score) = option_scores.get(code) {
                return *score;
            }
        }

        if let Some(codes) = value.as_multiple_selections() {
            return codes
                .iter()
                .filter_map(|code| option_scores.get(code.as_str()))
                .sum();
        }

        value.as_number().unwrap_or(0.0)
    }

    /// Scores a value and reports the highest option score as its ceiling.
    pub fn score_with_max(&self, value: &dyn ScorableValue, option_scores: &OptionScores) -> (f64, f64) {
        let max = option_scores.values().copied().reduce(f64::max).unwrap_or(0.0);
        (self.score(value, option_scores), max)
    }
}
