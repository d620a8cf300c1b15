//! Scale module - medical scales, factor scoring and scale evaluation.

mod evaluator;
mod factor_scorer;
mod medical_scale;

pub use evaluator::{EvaluatorError, ScaleEvaluator};
pub use factor_scorer::FactorScorer;
pub use medical_scale::{
    Factor, FactorInterpretRule, FactorScoringParams, FactorScoringStrategy, MedicalScale,
};
