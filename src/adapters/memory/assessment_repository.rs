//! In-memory assessment and score repositories.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::assessment::{Assessment, AssessmentScore};
use crate::domain::foundation::{AssessmentId, DomainError};
use crate::ports::{AssessmentRepository, AssessmentScoreRepository};

/// Stores assessments without their pending events.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssessmentRepository {
    assessments: Arc<RwLock<HashMap<AssessmentId, Assessment>>>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.assessments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assessments.read().await.is_empty()
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn find_by_id(&self, id: &AssessmentId) -> Result<Option<Assessment>, DomainError> {
        Ok(self.assessments.read().await.get(id).cloned())
    }

    async fn save(&self, assessment: &Assessment) -> Result<(), DomainError> {
        let mut stored = assessment.clone();
        stored.clear_events();
        self.assessments.write().await.insert(stored.id(), stored);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreRepository {
    scores: Arc<RwLock<HashMap<AssessmentId, AssessmentScore>>>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssessmentScoreRepository for InMemoryScoreRepository {
    async fn save(&self, score: &AssessmentScore) -> Result<(), DomainError> {
        self.scores
            .write()
            .await
            .insert(score.assessment_id(), score.clone());
        Ok(())
    }

    async fn find_by_assessment_id(
        &self,
        id: &AssessmentId,
    ) -> Result<Option<AssessmentScore>, DomainError> {
        Ok(self.scores.read().await.get(id).cloned())
    }
}
