//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the evaluation domain and the outside world. Adapters implement them.
//!
//! - `EventPublisher` - outbound assessment events
//! - `AssessmentRepository` / `AssessmentScoreRepository` - aggregate and snapshot persistence
//! - `MedicalScaleReader`, `QuestionnaireReader`, `AnswerSheetReader` - collaborator lookups

mod assessment_repository;
mod catalog_reader;
mod event_publisher;

pub use assessment_repository::{AssessmentRepository, AssessmentScoreRepository};
pub use catalog_reader::{AnswerSheetReader, MedicalScaleReader, QuestionnaireReader};
pub use event_publisher::EventPublisher;
