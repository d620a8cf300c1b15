//! Assessment module - the aggregate driven by the evaluation pipeline.
//!
//! Covers the assessment lifecycle, the evaluation result it consumes,
//! the score snapshot and trend analysis built from it, and the events
//! raised along the way.

mod aggregate;
mod errors;
mod evaluation_result;
mod events;
mod score;
mod status;
mod values;

pub use aggregate::Assessment;
pub use errors::AssessmentError;
pub use evaluation_result::{EvaluationResult, FactorScoreResult};
pub use events::{AssessmentEvent, AssessmentFailed, AssessmentInterpreted, AssessmentSubmitted};
pub use score::{
    calculate_trend, AssessmentScore, FactorScore, ScoreDataPoint, ScoreTrend, TrendType,
    TREND_THRESHOLD_PERCENT,
};
pub use status::AssessmentStatus;
pub use values::{AnswerSheetRef, MedicalScaleRef, Origin, OriginType, QuestionnaireRef};
