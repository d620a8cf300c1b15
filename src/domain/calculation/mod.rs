//! Calculation module - answer and factor scoring.
//!
//! - `Scorer` strategies reduce value lists (sum, average, weighted sum, ...)
//! - `OptionScorer` resolves one answer against an option-score table
//! - `BatchScorer` scores many answers, preserving input order

mod batch;
mod errors;
mod option_scorer;
mod scorer;

pub use batch::{BatchScorer, ScoreResult, ScoreTask};
pub use errors::ScoringError;
pub use option_scorer::{OptionScorer, OptionScores, ScorableValue};
pub use scorer::{
    calculate, get_scorer, scorer_for, AverageScorer, CountScorer, FirstScorer, LastScorer,
    MaxScorer, MinScorer, Scorer, ScoringParams, StrategyType, SumScorer, WeightedSumScorer,
};
