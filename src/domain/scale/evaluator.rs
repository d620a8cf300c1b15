//! Scale evaluation: factor scores, interpretation and the overall result.
//!
//! Pure and synchronous. The only parallelism is the optional concurrent
//! interpretation batch.

use std::collections::HashMap;
use thiserror::Error;

use super::{Factor, FactorScorer, MedicalScale};
use crate::domain::assessment::{EvaluationResult, FactorScoreResult};
use crate::domain::batch::BatchOptions;
use crate::domain::calculation::ScoringError;
use crate::domain::foundation::RiskLevel;
use crate::domain::interpretation::{
    BatchInterpreter, DefaultInterpretationProvider, InterpretResult, InterpretStrategyType,
    InterpretTask, InterpretationError,
};
use crate::domain::survey::{AnswerSheet, Questionnaire};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluatorError {
    #[error("scale {0} has no factors")]
    NoFactors(String),

    #[error("failed to score factor {factor_code}: {source}")]
    Scoring {
        factor_code: String,
        source: ScoringError,
    },

    #[error("failed to interpret factor {factor_code}: {source}")]
    Interpretation {
        factor_code: String,
        source: InterpretationError,
    },
}

/// Turns an answer sheet into an `EvaluationResult` for one scale.
#[derive(Debug, Clone, Default)]
pub struct ScaleEvaluator {
    scorer: FactorScorer,
    interpreter: BatchInterpreter,
    provider: DefaultInterpretationProvider,
    /// `Some(workers)` interprets factors on a worker pool.
    workers: Option<usize>,
}

impl ScaleEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_options(mut self, options: BatchOptions) -> Self {
        self.interpreter = BatchInterpreter::with_options(options);
        self
    }

    /// Interprets factors concurrently. Zero workers sizes the pool
    /// automatically.
    pub fn concurrent(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Evaluates `sheet` against every factor of `scale`.
    ///
    /// Factor scores use the stored answer scores. A factor whose rules do
    /// not cover its score gets the default risk tier for that score.
    ///
    /// # Errors
    ///
    /// - `NoFactors` if the scale defines no factors
    /// - `Scoring` if a factor's scoring configuration is invalid
    /// - `Interpretation` if a factor's rule table cannot be applied
    pub fn evaluate(
        &self,
        scale: &MedicalScale,
        sheet: &AnswerSheet,
        questionnaire: Option<&Questionnaire>,
    ) -> Result<EvaluationResult, EvaluatorError> {
        if scale.factors.is_empty() {
            return Err(EvaluatorError::NoFactors(scale.code.clone()));
        }

        let raw_scores = scale
            .factors
            .iter()
            .map(|factor| {
                self.scorer
                    .calculate(factor, sheet, questionnaire)
                    .map_err(|source| EvaluatorError::Scoring {
                        factor_code: factor.code.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let matched = self.interpret(&scale.factors, &raw_scores)?;

        let factor_scores: Vec<FactorScoreResult> = scale
            .factors
            .iter()
            .zip(&raw_scores)
            .map(|(factor, &score)| self.factor_result(factor, score, matched.get(&factor.code)))
            .collect();

        let total = scale.total_score_factor();
        let total_score = match total {
            Some(factor) => factor_scores
                .iter()
                .find(|f| f.factor_code == factor.code)
                .map_or(0.0, |f| f.raw_score),
            None => raw_scores.iter().sum(),
        };

        let total_match = total.and_then(|factor| matched.get(&factor.code));
        let risk_level = match total_match {
            Some(result) => result.risk_level,
            None => factor_scores
                .iter()
                .map(|f| f.risk_level)
                .max()
                .unwrap_or_default(),
        };

        let (conclusion, suggestion) = match total_match.filter(|r| has_text(r)) {
            Some(result) => (result.description.clone(), result.suggestion.clone()),
            None => {
                let overall = self.provider.provide_overall(total_score, risk_level);
                (overall.description, overall.suggestion)
            }
        };

        tracing::info!(
            scale_code = %scale.code,
            factors = factor_scores.len(),
            total_score,
            risk_level = %risk_level,
            "scale evaluated"
        );

        Ok(EvaluationResult {
            total_score,
            risk_level,
            conclusion,
            suggestion,
            factor_scores,
        })
    }

    /// Rule matches keyed by factor code. Factors without rules and scores
    /// outside every rule are absent.
    fn interpret(
        &self,
        factors: &[Factor],
        raw_scores: &[f64],
    ) -> Result<HashMap<String, InterpretResult>, EvaluatorError> {
        let tasks: Vec<InterpretTask> = factors
            .iter()
            .zip(raw_scores)
            .filter(|(factor, _)| !factor.interpret_rules.is_empty())
            .map(|(factor, &score)| {
                InterpretTask::new(
                    factor.code.clone(),
                    score,
                    factor.interpret_config(),
                    InterpretStrategyType::Range,
                )
            })
            .collect();

        let results = match self.workers {
            Some(workers) => self.interpreter.interpret_all_concurrent(&tasks, workers),
            None => self.interpreter.interpret_all(&tasks),
        };

        let mut matched = HashMap::with_capacity(results.len());
        for task in results {
            let result = task.result.map_err(|source| EvaluatorError::Interpretation {
                factor_code: task.id.clone(),
                source,
            })?;
            if !result.out_of_coverage {
                matched.insert(task.id, result);
            }
        }
        Ok(matched)
    }

    fn factor_result(
        &self,
        factor: &Factor,
        score: f64,
        matched: Option<&InterpretResult>,
    ) -> FactorScoreResult {
        let risk_level = matched.map_or_else(|| RiskLevel::default_for_score(score), |r| r.risk_level);
        let (conclusion, suggestion) = match matched.filter(|r| has_text(r)) {
            Some(result) => (result.description.clone(), result.suggestion.clone()),
            None => {
                let text = self.provider.provide_factor(&factor.title, score, risk_level);
                (text.description, text.suggestion)
            }
        };

        tracing::debug!(
            factor_code = %factor.code,
            score,
            risk_level = %risk_level,
            matched = matched.is_some(),
            "factor interpreted"
        );

        FactorScoreResult {
            factor_code: factor.code.clone(),
            factor_name: factor.title.clone(),
            raw_score: score,
            risk_level,
            conclusion,
            suggestion,
            is_total_score: factor.is_total_score,
        }
    }
}

fn has_text(result: &InterpretResult) -> bool {
    !result.description.is_empty() && !result.suggestion.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AnswerSheetId, MedicalScaleId};
    use crate::domain::interpretation::ScoreRange;
    use crate::domain::scale::{FactorInterpretRule, FactorScoringStrategy};
    use crate::domain::survey::{Answer, AnswerValue};

    fn sheet() -> AnswerSheet {
        AnswerSheet::new(
            AnswerSheetId::new(),
            "Q",
            "1",
            vec![
                Answer::new("Q1", AnswerValue::choice("Q1_C")).unwrap().with_score(3.0),
                Answer::new("Q2", AnswerValue::Number(7.0)).unwrap().with_score(7.0),
            ],
        )
    }

    fn scale(factors: Vec<Factor>) -> MedicalScale {
        MedicalScale::new(MedicalScaleId::new(), "S", "量表", "Q", "1", factors)
    }

    fn rules() -> Vec<FactorInterpretRule> {
        vec![
            FactorInterpretRule::new(ScoreRange::new(0.0, 10.0), RiskLevel::Low, "", ""),
            FactorInterpretRule::new(ScoreRange::new(10.0, 100.0), RiskLevel::High, "偏高", "建议咨询"),
        ]
    }

    #[test]
    fn sum_factor_at_boundary_is_high() {
        let factor = Factor::new("T", "总分")
            .total_score()
            .with_questions(["Q1", "Q2"])
            .with_rules(rules());
        let result = ScaleEvaluator::new()
            .evaluate(&scale(vec![factor]), &sheet(), None)
            .unwrap();

        assert_eq!(result.total_score, 10.0);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.conclusion, "偏高");
        assert_eq!(result.suggestion, "建议咨询");
        assert!(result.factor_scores[0].is_total_score);
    }

    #[test]
    fn rule_without_text_falls_back_to_default_provider() {
        let factor = Factor::new("F1", "焦虑").with_questions(["Q1"]).with_rules(rules());
        let result = ScaleEvaluator::new()
            .evaluate(&scale(vec![factor]), &sheet(), None)
            .unwrap();

        let f1 = result.factor_score("F1").unwrap();
        assert_eq!(f1.risk_level, RiskLevel::Low);
        assert_eq!(f1.conclusion, "焦虑得分3.0分，处于正常偏低水平");
        // No total-score factor: sum of factors and overall default text.
        assert_eq!(result.total_score, 3.0);
        assert_eq!(result.conclusion, "测评结果显示整体情况良好，少数方面需要注意");
    }

    #[test]
    fn uncovered_score_uses_default_tier() {
        let factor = Factor::new("F1", "焦虑").with_questions(["Q1"]).with_rules(vec![
            FactorInterpretRule::new(ScoreRange::new(50.0, 60.0), RiskLevel::Severe, "c", "s"),
        ]);
        let result = ScaleEvaluator::new()
            .evaluate(&scale(vec![factor]), &sheet(), None)
            .unwrap();

        assert_eq!(result.factor_scores[0].risk_level, RiskLevel::None);
        assert_eq!(result.risk_level, RiskLevel::None);
    }

    #[test]
    fn overall_risk_is_max_factor_risk_without_total() {
        let low = Factor::new("A", "a").with_questions(["Q1"]).with_rules(rules());
        let high = Factor::new("B", "b").with_questions(["Q1", "Q2"]).with_rules(rules());
        let result = ScaleEvaluator::new()
            .concurrent(2)
            .evaluate(&scale(vec![low, high]), &sheet(), None)
            .unwrap();

        assert_eq!(result.total_score, 13.0);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.factor_scores[0].factor_code, "A");
        assert_eq!(result.factor_scores[1].factor_code, "B");
    }

    #[test]
    fn scoring_errors_name_the_factor() {
        let factor = Factor::new("C", "c")
            .with_questions(["Q1"])
            .with_strategy(FactorScoringStrategy::Cnt);
        let err = ScaleEvaluator::new()
            .evaluate(&scale(vec![factor]), &sheet(), None)
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::Scoring { ref factor_code, .. } if factor_code == "C"));
    }

    #[test]
    fn scale_without_factors_is_rejected() {
        let err = ScaleEvaluator::new()
            .evaluate(&scale(vec![]), &sheet(), None)
            .unwrap_err();
        assert_eq!(err, EvaluatorError::NoFactors("S".into()));
    }
}
