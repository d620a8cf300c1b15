//! In-process adapters backed by hash maps.

mod assessment_repository;
mod catalog;

pub use assessment_repository::{InMemoryAssessmentRepository, InMemoryScoreRepository};
pub use catalog::InMemoryCatalog;
