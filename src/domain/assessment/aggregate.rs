//! Assessment aggregate.
//!
//! An assessment binds one testee's answer sheet to a questionnaire and,
//! optionally, a medical scale. Its lifecycle:
//!
//! - `submit` moves a pending assessment into evaluation
//! - `apply_evaluation` records the scored and interpreted outcome
//! - `mark_as_failed` records a pipeline failure
//! - `retry_from_failed` sends a failed assessment back for evaluation
//!
//! Every transition appends an event to an in-memory outbox that the caller
//! drains with `take_events` after persisting the aggregate. Transitions never
//! publish anything themselves.

use serde::{Deserialize, Serialize};

use super::{
    AnswerSheetRef, AssessmentError, AssessmentEvent, AssessmentFailed, AssessmentInterpreted,
    AssessmentStatus, AssessmentSubmitted, EvaluationResult, MedicalScaleRef, Origin,
    QuestionnaireRef,
};
use crate::domain::foundation::{
    AssessmentId, EventId, OrgId, RiskLevel, StateMachine, TesteeId, Timestamp, ValidationError,
};

/// Assessment aggregate.
///
/// # Invariants
///
/// - `questionnaire_ref` and `answer_sheet_ref` are never empty
/// - `total_score`/`risk_level`/`interpreted_at` are set only when interpreted
/// - `failure_reason`/`failed_at` are set only when failed
/// - A transition either applies fully or returns an error without changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    id: AssessmentId,
    org_id: OrgId,
    testee_id: TesteeId,
    questionnaire_ref: QuestionnaireRef,
    answer_sheet_ref: AnswerSheetRef,
    medical_scale_ref: Option<MedicalScaleRef>,
    origin: Origin,
    status: AssessmentStatus,

    total_score: Option<f64>,
    risk_level: Option<RiskLevel>,

    created_at: Timestamp,
    submitted_at: Option<Timestamp>,
    interpreted_at: Option<Timestamp>,
    failed_at: Option<Timestamp>,
    failure_reason: Option<String>,

    /// Outbox of events raised since the last drain.
    #[serde(skip)]
    domain_events: Vec<AssessmentEvent>,
}

impl Assessment {
    /// Creates a pending assessment started directly by a user.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the testee id is nil
    /// - `MissingField` if the questionnaire or answer sheet ref is empty
    pub fn new_adhoc(
        org_id: OrgId,
        testee_id: TesteeId,
        questionnaire_ref: QuestionnaireRef,
        answer_sheet_ref: AnswerSheetRef,
        medical_scale_ref: Option<MedicalScaleRef>,
    ) -> Result<Self, AssessmentError> {
        Self::create(
            org_id,
            testee_id,
            questionnaire_ref,
            answer_sheet_ref,
            medical_scale_ref,
            Origin::adhoc(),
        )
    }

    /// Creates a pending assessment scheduled by a recurring plan.
    pub fn new_plan(
        org_id: OrgId,
        testee_id: TesteeId,
        questionnaire_ref: QuestionnaireRef,
        answer_sheet_ref: AnswerSheetRef,
        medical_scale_ref: Option<MedicalScaleRef>,
        plan_id: impl Into<String>,
    ) -> Result<Self, AssessmentError> {
        Self::create(
            org_id,
            testee_id,
            questionnaire_ref,
            answer_sheet_ref,
            medical_scale_ref,
            Origin::plan(plan_id),
        )
    }

    /// Creates a pending assessment belonging to a screening project.
    pub fn new_screening(
        org_id: OrgId,
        testee_id: TesteeId,
        questionnaire_ref: QuestionnaireRef,
        answer_sheet_ref: AnswerSheetRef,
        medical_scale_ref: Option<MedicalScaleRef>,
        screening_project_id: impl Into<String>,
    ) -> Result<Self, AssessmentError> {
        Self::create(
            org_id,
            testee_id,
            questionnaire_ref,
            answer_sheet_ref,
            medical_scale_ref,
            Origin::screening(screening_project_id),
        )
    }

    fn create(
        org_id: OrgId,
        testee_id: TesteeId,
        questionnaire_ref: QuestionnaireRef,
        answer_sheet_ref: AnswerSheetRef,
        medical_scale_ref: Option<MedicalScaleRef>,
        origin: Origin,
    ) -> Result<Self, AssessmentError> {
        if testee_id.is_nil() {
            return Err(AssessmentError::invalid_argument("testee id cannot be nil"));
        }
        if questionnaire_ref.is_empty() {
            return Err(AssessmentError::MissingField("questionnaire_ref"));
        }
        if answer_sheet_ref.is_empty() {
            return Err(AssessmentError::MissingField("answer_sheet_ref"));
        }
        if !origin.is_valid() {
            return Err(AssessmentError::invalid_argument(format!(
                "{} origin requires an id",
                origin.origin_type()
            )));
        }

        Ok(Self {
            id: AssessmentId::new(),
            org_id,
            testee_id,
            questionnaire_ref,
            answer_sheet_ref,
            medical_scale_ref: medical_scale_ref.filter(|r| !r.is_empty()),
            origin,
            status: AssessmentStatus::Pending,
            total_score: None,
            risk_level: None,
            created_at: Timestamp::now(),
            submitted_at: None,
            interpreted_at: None,
            failed_at: None,
            failure_reason: None,
            domain_events: Vec::new(),
        })
    }

    /// Reconstitute an assessment from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AssessmentId,
        org_id: OrgId,
        testee_id: TesteeId,
        questionnaire_ref: QuestionnaireRef,
        answer_sheet_ref: AnswerSheetRef,
        medical_scale_ref: Option<MedicalScaleRef>,
        origin: Origin,
        status: AssessmentStatus,
        total_score: Option<f64>,
        risk_level: Option<RiskLevel>,
        created_at: Timestamp,
        submitted_at: Option<Timestamp>,
        interpreted_at: Option<Timestamp>,
        failed_at: Option<Timestamp>,
        failure_reason: Option<String>,
    ) -> Self {
        Self {
            id,
            org_id,
            testee_id,
            questionnaire_ref,
            answer_sheet_ref,
            medical_scale_ref,
            origin,
            status,
            total_score,
            risk_level,
            created_at,
            submitted_at,
            interpreted_at,
            failed_at,
            failure_reason,
            domain_events: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn org_id(&self) -> OrgId {
        self.org_id
    }

    pub fn testee_id(&self) -> TesteeId {
        self.testee_id
    }

    pub fn questionnaire_ref(&self) -> &QuestionnaireRef {
        &self.questionnaire_ref
    }

    pub fn answer_sheet_ref(&self) -> &AnswerSheetRef {
        &self.answer_sheet_ref
    }

    pub fn medical_scale_ref(&self) -> Option<&MedicalScaleRef> {
        self.medical_scale_ref.as_ref()
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    pub fn total_score(&self) -> Option<f64> {
        self.total_score
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_level
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn submitted_at(&self) -> Option<Timestamp> {
        self.submitted_at
    }

    pub fn interpreted_at(&self) -> Option<Timestamp> {
        self.interpreted_at
    }

    pub fn failed_at(&self) -> Option<Timestamp> {
        self.failed_at
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn has_medical_scale(&self) -> bool {
        self.medical_scale_ref.is_some()
    }

    /// True when the evaluation pipeline should run for this assessment.
    pub fn needs_evaluation(&self) -> bool {
        self.status == AssessmentStatus::Submitted && self.has_medical_scale()
    }

    /// Interpreted or failed.
    pub fn is_completed(&self) -> bool {
        self.status.is_finished()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Submits a pending assessment for evaluation.
    ///
    /// # Errors
    ///
    /// - `InvalidStatus` unless pending
    pub fn submit(&mut self) -> Result<(), AssessmentError> {
        if self.status != AssessmentStatus::Pending {
            return Err(AssessmentError::invalid_status("submit", self.status));
        }
        self.enter(AssessmentStatus::Submitted, "submit")?;

        let now = Timestamp::now();
        self.submitted_at = Some(now);
        self.raise_submitted(now);
        Ok(())
    }

    /// Records the evaluation outcome and moves to `Interpreted`.
    ///
    /// # Errors
    ///
    /// - `InvalidStatus` unless submitted
    /// - `NoMedicalScale` if no scale is bound
    pub fn apply_evaluation(&mut self, result: &EvaluationResult) -> Result<(), AssessmentError> {
        if self.status != AssessmentStatus::Submitted {
            return Err(AssessmentError::invalid_status("apply evaluation to", self.status));
        }
        let scale = self
            .medical_scale_ref
            .clone()
            .ok_or(AssessmentError::NoMedicalScale)?;
        self.enter(AssessmentStatus::Interpreted, "apply evaluation to")?;

        let now = Timestamp::now();
        self.total_score = Some(result.total_score);
        self.risk_level = Some(result.risk_level);
        self.interpreted_at = Some(now);

        self.domain_events
            .push(AssessmentEvent::Interpreted(AssessmentInterpreted {
                event_id: EventId::new(),
                assessment_id: self.id,
                testee_id: self.testee_id,
                scale_code: scale.code,
                scale_name: scale.name,
                total_score: result.total_score,
                risk_level: result.risk_level,
                interpreted_at: now,
            }));
        Ok(())
    }

    /// Records a pipeline failure and moves to `Failed`.
    ///
    /// # Errors
    ///
    /// - `InvalidStatus` unless submitted
    /// - `Validation` if `reason` is blank
    pub fn mark_as_failed(&mut self, reason: impl Into<String>) -> Result<(), AssessmentError> {
        if self.status != AssessmentStatus::Submitted {
            return Err(AssessmentError::invalid_status("fail", self.status));
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ValidationError::empty_field("reason").into());
        }
        self.enter(AssessmentStatus::Failed, "fail")?;

        let now = Timestamp::now();
        self.failed_at = Some(now);
        self.failure_reason = Some(reason.clone());

        self.domain_events.push(AssessmentEvent::Failed(AssessmentFailed {
            event_id: EventId::new(),
            assessment_id: self.id,
            testee_id: self.testee_id,
            reason,
            failed_at: now,
        }));
        Ok(())
    }

    /// Sends a failed assessment back to `Submitted` and re-raises the
    /// submitted event so evaluation runs again.
    ///
    /// # Errors
    ///
    /// - `InvalidStatus` unless failed
    pub fn retry_from_failed(&mut self) -> Result<(), AssessmentError> {
        if self.status != AssessmentStatus::Failed {
            return Err(AssessmentError::invalid_status("retry", self.status));
        }
        self.enter(AssessmentStatus::Submitted, "retry")?;

        let now = Timestamp::now();
        self.failed_at = None;
        self.failure_reason = None;
        self.submitted_at = Some(now);
        self.raise_submitted(now);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Events raised since the last drain.
    pub fn events(&self) -> &[AssessmentEvent] {
        &self.domain_events
    }

    pub fn clear_events(&mut self) {
        self.domain_events.clear();
    }

    /// Takes ownership of pending events, leaving the outbox empty.
    pub fn take_events(&mut self) -> Vec<AssessmentEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn enter(&mut self, target: AssessmentStatus, action: &'static str) -> Result<(), AssessmentError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| AssessmentError::invalid_status(action, self.status))?;
        Ok(())
    }

    fn raise_submitted(&mut self, at: Timestamp) {
        let scale = self.medical_scale_ref.as_ref();
        self.domain_events
            .push(AssessmentEvent::Submitted(AssessmentSubmitted {
                event_id: EventId::new(),
                assessment_id: self.id,
                testee_id: self.testee_id,
                questionnaire_code: self.questionnaire_ref.code.clone(),
                questionnaire_version: self.questionnaire_ref.version.clone(),
                answer_sheet_id: self.answer_sheet_ref.id,
                scale_code: scale.map(|s| s.code.clone()),
                scale_name: scale.map(|s| s.name.clone()),
                submitted_at: at,
            }));
    }
}
