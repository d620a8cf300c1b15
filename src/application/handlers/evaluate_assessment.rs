//! EvaluateAssessmentHandler - runs the evaluation pipeline for submitted
//! assessments.
//!
//! 1. Load the assessment; it must be submitted
//! 2. Skip assessments without a medical scale (questionnaire-only mode)
//! 3. Load the scale and answer sheet; failures mark the assessment failed
//! 4. Score the answers against the questionnaire when it is available
//! 5. Score and interpret every factor, then derive the overall result
//! 6. Apply the result (or the failure), persist, then publish events
//!
//! Event publication is fire-and-forget: failures are logged and never
//! undo the persisted state change.

use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::domain::assessment::{
    Assessment, AssessmentError, AssessmentScore, AssessmentStatus, EvaluationResult,
};
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, RiskLevel};
use crate::domain::scale::{MedicalScale, ScaleEvaluator};
use crate::domain::survey::{AnswerSheet, AnswerSheetScorer, Questionnaire};
use crate::ports::{
    AnswerSheetReader, AssessmentRepository, AssessmentScoreRepository, EventPublisher,
    MedicalScaleReader, QuestionnaireReader,
};

/// Errors that stop the pipeline before any state change.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("assessment not found: {0}")]
    NotFound(AssessmentId),

    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error("repository error: {0}")]
    Repository(DomainError),
}

impl EvaluationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvaluationError::NotFound(_) => ErrorCode::AssessmentNotFound,
            EvaluationError::Assessment(err) => err.code(),
            EvaluationError::Repository(err) => err.code,
        }
    }
}

/// What happened to an assessment that was evaluated without error.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Interpreted { total_score: f64, risk_level: RiskLevel },
    /// The pipeline failed and the assessment was marked failed.
    Failed { reason: String },
    /// No medical scale bound; nothing to evaluate.
    Skipped,
}

/// Tally of an `evaluate_batch` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub failed_ids: Vec<AssessmentId>,
}

/// Handler for evaluating submitted assessments.
pub struct EvaluateAssessmentHandler {
    assessments: Arc<dyn AssessmentRepository>,
    scores: Arc<dyn AssessmentScoreRepository>,
    scales: Arc<dyn MedicalScaleReader>,
    questionnaires: Arc<dyn QuestionnaireReader>,
    answer_sheets: Arc<dyn AnswerSheetReader>,
    event_publisher: Arc<dyn EventPublisher>,
    sheet_scorer: AnswerSheetScorer,
    evaluator: ScaleEvaluator,
}

impl EvaluateAssessmentHandler {
    pub fn new(
        assessments: Arc<dyn AssessmentRepository>,
        scores: Arc<dyn AssessmentScoreRepository>,
        scales: Arc<dyn MedicalScaleReader>,
        questionnaires: Arc<dyn QuestionnaireReader>,
        answer_sheets: Arc<dyn AnswerSheetReader>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            assessments,
            scores,
            scales,
            questionnaires,
            answer_sheets,
            event_publisher,
            sheet_scorer: AnswerSheetScorer::new(),
            evaluator: ScaleEvaluator::new(),
        }
    }

    /// Applies batch sizing and the concurrency mode from configuration.
    pub fn configured(mut self, config: &AppConfig) -> Self {
        self.sheet_scorer = AnswerSheetScorer::with_options(config.batch.options());
        let evaluator = ScaleEvaluator::new().with_batch_options(config.batch.options());
        self.evaluator = if config.evaluation.concurrent {
            evaluator.concurrent(config.evaluation.worker_count)
        } else {
            evaluator
        };
        self
    }

    /// Evaluates one assessment.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the assessment does not exist
    /// - `Assessment(InvalidStatus)` unless it is submitted
    /// - `Repository` if loading or saving the assessment fails
    pub async fn handle(&self, id: AssessmentId) -> Result<EvaluationOutcome, EvaluationError> {
        // 1. Load assessment
        let mut assessment = self
            .assessments
            .find_by_id(&id)
            .await
            .map_err(EvaluationError::Repository)?
            .ok_or(EvaluationError::NotFound(id))?;

        if assessment.status() != AssessmentStatus::Submitted {
            return Err(AssessmentError::invalid_status("evaluate", assessment.status()).into());
        }

        // 2. Questionnaire-only assessments have nothing to interpret
        let Some(scale_ref) = assessment.medical_scale_ref().cloned() else {
            tracing::info!(assessment_id = %id, "no medical scale bound, skipping evaluation");
            return Ok(EvaluationOutcome::Skipped);
        };

        // 3. Load collaborators
        let scale = match self.load_scale(&scale_ref.code).await {
            Ok(scale) => scale,
            Err(reason) => return self.fail(assessment, format!("加载量表失败: {}", reason)).await,
        };
        let mut sheet = match self.load_answer_sheet(&assessment).await {
            Ok(sheet) => sheet,
            Err(reason) => return self.fail(assessment, format!("加载答卷失败: {}", reason)).await,
        };
        let questionnaire = self.load_questionnaire(&assessment).await;

        // 4. Score answers; without a questionnaire the stored scores stand
        match questionnaire.as_ref() {
            Some(questionnaire) => {
                let scored = self.sheet_scorer.score(&sheet, questionnaire);
                sheet.apply_scores(&scored);
            }
            None => tracing::debug!(assessment_id = %id, "using stored answer scores"),
        }

        // 5. Evaluate
        let result = match self.evaluator.evaluate(&scale, &sheet, questionnaire.as_ref()) {
            Ok(result) => result,
            Err(err) => return self.fail(assessment, format!("评估失败: {}", err)).await,
        };
        if result.factor_scores.is_empty() {
            return self.fail(assessment, "factor scores required").await;
        }

        // 6. Apply, persist, publish
        assessment.apply_evaluation(&result)?;
        self.persist(&assessment, Some(&result)).await?;
        self.publish_events(&mut assessment).await;

        tracing::info!(
            assessment_id = %id,
            scale_code = %scale.code,
            total_score = result.total_score,
            risk_level = %result.risk_level,
            "assessment interpreted"
        );
        Ok(EvaluationOutcome::Interpreted {
            total_score: result.total_score,
            risk_level: result.risk_level,
        })
    }

    /// Evaluates each assessment in turn. Per-assessment errors and failed
    /// outcomes are counted, not returned.
    pub async fn evaluate_batch(&self, ids: &[AssessmentId]) -> BatchSummary {
        let mut summary = BatchSummary {
            total: ids.len(),
            ..BatchSummary::default()
        };

        for &id in ids {
            match self.handle(id).await {
                Ok(EvaluationOutcome::Interpreted { .. }) | Ok(EvaluationOutcome::Skipped) => {
                    summary.success += 1;
                }
                Ok(EvaluationOutcome::Failed { reason }) => {
                    tracing::warn!(assessment_id = %id, %reason, "assessment evaluation failed");
                    summary.failed += 1;
                    summary.failed_ids.push(id);
                }
                Err(err) => {
                    tracing::warn!(assessment_id = %id, error = %err, "assessment evaluation rejected");
                    summary.failed += 1;
                    summary.failed_ids.push(id);
                }
            }
        }

        tracing::info!(
            total = summary.total,
            success = summary.success,
            failed = summary.failed,
            "batch evaluation finished"
        );
        summary
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn load_scale(&self, code: &str) -> Result<MedicalScale, String> {
        match self.scales.find_by_code(code).await {
            Ok(Some(scale)) => Ok(scale),
            Ok(None) => Err(format!("量表不存在: {}", code)),
            Err(err) => Err(err.to_string()),
        }
    }

    async fn load_answer_sheet(&self, assessment: &Assessment) -> Result<AnswerSheet, String> {
        let id = assessment.answer_sheet_ref().id;
        match self.answer_sheets.find_by_id(&id).await {
            Ok(Some(sheet)) => Ok(sheet),
            Ok(None) => Err(format!("答卷不存在: {}", id)),
            Err(err) => Err(err.to_string()),
        }
    }

    /// A miss is not fatal: answers keep their stored scores and `cnt`
    /// factors count nothing.
    async fn load_questionnaire(&self, assessment: &Assessment) -> Option<Questionnaire> {
        let reference = assessment.questionnaire_ref();
        match self
            .questionnaires
            .find_by_code_version(&reference.code, &reference.version)
            .await
        {
            Ok(found) => {
                if found.is_none() {
                    tracing::warn!(
                        assessment_id = %assessment.id(),
                        questionnaire_code = %reference.code,
                        "questionnaire not found, continuing without it"
                    );
                }
                found
            }
            Err(err) => {
                tracing::warn!(
                    assessment_id = %assessment.id(),
                    error = %err,
                    "failed to load questionnaire, continuing without it"
                );
                None
            }
        }
    }

    async fn fail(
        &self,
        mut assessment: Assessment,
        reason: impl Into<String>,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let reason = reason.into();
        assessment.mark_as_failed(reason.clone())?;
        self.persist(&assessment, None).await?;
        self.publish_events(&mut assessment).await;

        tracing::warn!(assessment_id = %assessment.id(), %reason, "assessment marked as failed");
        Ok(EvaluationOutcome::Failed { reason })
    }

    async fn persist(
        &self,
        assessment: &Assessment,
        result: Option<&EvaluationResult>,
    ) -> Result<(), EvaluationError> {
        self.assessments
            .save(assessment)
            .await
            .map_err(EvaluationError::Repository)?;
        if let Some(result) = result {
            let score = AssessmentScore::from_evaluation_result(assessment.id(), result);
            self.scores
                .save(&score)
                .await
                .map_err(EvaluationError::Repository)?;
        }
        Ok(())
    }

    async fn publish_events(&self, assessment: &mut Assessment) {
        for event in assessment.take_events() {
            let envelope = match event.to_envelope() {
                Ok(envelope) => envelope,
                Err(err) => {
                    tracing::warn!(
                        event_type = event.event_type(),
                        error = %err,
                        "failed to serialize event"
                    );
                    continue;
                }
            };
            let event_type = envelope.event_type.clone();
            if let Err(err) = self.event_publisher.publish(envelope).await {
                tracing::warn!(
                    assessment_id = %assessment.id(),
                    %event_type,
                    error = %err,
                    "failed to publish event"
                );
            }
        }
    }
}
