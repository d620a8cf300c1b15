//! Assessment domain events.
//!
//! Published after the aggregate is persisted. Consumers downstream use
//! `assessment.submitted.v1` to trigger evaluation and the other two to
//! build reports and alerts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, AnswerSheetId, AssessmentId, EventEnvelope, EventId, RiskLevel, TesteeId,
    Timestamp,
};

// ════════════════════════════════════════════════════════════════════════════════
// AssessmentSubmitted
// ════════════════════════════════════════════════════════════════════════════════

/// Published when an assessment enters `Submitted`, including retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmitted {
    pub event_id: EventId,
    pub assessment_id: AssessmentId,
    pub testee_id: TesteeId,
    pub questionnaire_code: String,
    pub questionnaire_version: String,
    pub answer_sheet_id: AnswerSheetId,
    /// Present only when a medical scale is bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_name: Option<String>,
    pub submitted_at: Timestamp,
}

domain_event!(
    AssessmentSubmitted,
    event_type = "assessment.submitted.v1",
    aggregate_id = assessment_id,
    aggregate_type = "Assessment",
    occurred_at = submitted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════════
// AssessmentInterpreted
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInterpreted {
    pub event_id: EventId,
    pub assessment_id: AssessmentId,
    pub testee_id: TesteeId,
    pub scale_code: String,
    pub scale_name: String,
    pub total_score: f64,
    pub risk_level: RiskLevel,
    pub interpreted_at: Timestamp,
}

domain_event!(
    AssessmentInterpreted,
    event_type = "assessment.interpreted.v1",
    aggregate_id = assessment_id,
    aggregate_type = "Assessment",
    occurred_at = interpreted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════════
// AssessmentFailed
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentFailed {
    pub event_id: EventId,
    pub assessment_id: AssessmentId,
    pub testee_id: TesteeId,
    pub reason: String,
    pub failed_at: Timestamp,
}

domain_event!(
    AssessmentFailed,
    event_type = "assessment.failed.v1",
    aggregate_id = assessment_id,
    aggregate_type = "Assessment",
    occurred_at = failed_at,
    event_id = event_id
);

/// Any event raised by the assessment aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentEvent {
    Submitted(AssessmentSubmitted),
    Interpreted(AssessmentInterpreted),
    Failed(AssessmentFailed),
}

impl AssessmentEvent {
    pub fn event_type(&self) -> &'static str {
        use crate::domain::foundation::DomainEvent;
        match self {
            AssessmentEvent::Submitted(e) => e.event_type(),
            AssessmentEvent::Interpreted(e) => e.event_type(),
            AssessmentEvent::Failed(e) => e.event_type(),
        }
    }

    /// Wraps the event for publishing.
    pub fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        match self {
            AssessmentEvent::Submitted(e) => EventEnvelope::from_event(e),
            AssessmentEvent::Interpreted(e) => EventEnvelope::from_event(e),
            AssessmentEvent::Failed(e) => EventEnvelope::from_event(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainEvent;

    fn submitted(scale: Option<(&str, &str)>) -> AssessmentSubmitted {
        AssessmentSubmitted {
            event_id: EventId::new(),
            assessment_id: AssessmentId::new(),
            testee_id: TesteeId::new(),
            questionnaire_code: "PHQ9".into(),
            questionnaire_version: "1.0".into(),
            answer_sheet_id: AnswerSheetId::new(),
            scale_code: scale.map(|(c, _)| c.to_string()),
            scale_name: scale.map(|(_, v)| v.to_string()),
            submitted_at: Timestamp::now(),
        }
    }

    #[test]
    fn submitted_event_metadata() {
        let event = submitted(None);
        assert_eq!(event.event_type(), "assessment.submitted.v1");
        assert_eq!(event.aggregate_type(), "Assessment");
        assert_eq!(event.aggregate_id(), event.assessment_id.to_string());
    }

    #[test]
    fn scale_fields_omitted_when_unbound() {
        let envelope = AssessmentEvent::Submitted(submitted(None)).to_envelope().unwrap();
        assert!(envelope.payload.get("scale_code").is_none());

        let envelope = AssessmentEvent::Submitted(submitted(Some(("PHQ9", "抑郁量表"))))
            .to_envelope()
            .unwrap();
        assert_eq!(envelope.payload["scale_code"], "PHQ9");
        assert_eq!(envelope.payload["scale_name"], "抑郁量表");
    }

    #[test]
    fn interpreted_envelope_carries_risk() {
        let event = AssessmentInterpreted {
            event_id: EventId::new(),
            assessment_id: AssessmentId::new(),
            testee_id: TesteeId::new(),
            scale_code: "S".into(),
            scale_name: "量表".into(),
            total_score: 10.0,
            risk_level: RiskLevel::High,
            interpreted_at: Timestamp::now(),
        };
        let wrapped = AssessmentEvent::Interpreted(event.clone());
        assert_eq!(wrapped.event_type(), "assessment.interpreted.v1");

        let envelope = wrapped.to_envelope().unwrap();
        assert_eq!(envelope.event_id, event.event_id);
        assert_eq!(envelope.payload["risk_level"], "high");
        assert_eq!(envelope.payload["total_score"], 10.0);
    }
}
