//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the evaluation domain.

mod cancellation;
mod errors;
mod events;
mod ids;
mod risk_level;
mod state_machine;
mod timestamp;

pub use cancellation::CancellationToken;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope};
pub use ids::{
    AnswerSheetId, AssessmentId, EventId, MedicalScaleId, OrgId, QuestionnaireId, TesteeId,
};
pub use risk_level::RiskLevel;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
