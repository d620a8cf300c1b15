//! Assessment repository port (write side).

use async_trait::async_trait;

use crate::domain::assessment::{Assessment, AssessmentScore};
use crate::domain::foundation::{AssessmentId, DomainError};

/// Repository port for Assessment aggregate persistence.
///
/// `save` upserts: it inserts a new assessment or replaces the stored one.
/// Implementations never publish the aggregate's pending events.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Find an assessment by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &AssessmentId) -> Result<Option<Assessment>, DomainError>;

    /// Insert or replace an assessment.
    ///
    /// # Errors
    ///
    /// - `RepositoryError` on persistence failure
    async fn save(&self, assessment: &Assessment) -> Result<(), DomainError>;
}

/// Repository port for score snapshots of interpreted assessments.
#[async_trait]
pub trait AssessmentScoreRepository: Send + Sync {
    /// Insert or replace the snapshot for `score.assessment_id()`.
    async fn save(&self, score: &AssessmentScore) -> Result<(), DomainError>;

    async fn find_by_assessment_id(
        &self,
        id: &AssessmentId,
    ) -> Result<Option<AssessmentScore>, DomainError>;
}
