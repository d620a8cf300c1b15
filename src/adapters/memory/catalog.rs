//! In-memory catalog of scales, questionnaires and answer sheets.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AnswerSheetId, DomainError};
use crate::domain::scale::MedicalScale;
use crate::domain::survey::{AnswerSheet, Questionnaire};
use crate::ports::{AnswerSheetReader, MedicalScaleReader, QuestionnaireReader};

/// Implements every collaborator read port from in-process maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    scales: Arc<RwLock<HashMap<String, MedicalScale>>>,
    questionnaires: Arc<RwLock<HashMap<(String, String), Questionnaire>>>,
    answer_sheets: Arc<RwLock<HashMap<AnswerSheetId, AnswerSheet>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_scale(&self, scale: MedicalScale) {
        self.scales.write().await.insert(scale.code.clone(), scale);
    }

    pub async fn add_questionnaire(&self, questionnaire: Questionnaire) {
        let key = (questionnaire.code.clone(), questionnaire.version.clone());
        self.questionnaires.write().await.insert(key, questionnaire);
    }

    pub async fn add_answer_sheet(&self, sheet: AnswerSheet) {
        self.answer_sheets.write().await.insert(sheet.id(), sheet);
    }
}

#[async_trait]
impl MedicalScaleReader for InMemoryCatalog {
    async fn find_by_code(&self, code: &str) -> Result<Option<MedicalScale>, DomainError> {
        Ok(self.scales.read().await.get(code).cloned())
    }
}

#[async_trait]
impl QuestionnaireReader for InMemoryCatalog {
    async fn find_by_code_version(
        &self,
        code: &str,
        version: &str,
    ) -> Result<Option<Questionnaire>, DomainError> {
        let key = (code.to_string(), version.to_string());
        Ok(self.questionnaires.read().await.get(&key).cloned())
    }
}

#[async_trait]
impl AnswerSheetReader for InMemoryCatalog {
    async fn find_by_id(&self, id: &AnswerSheetId) -> Result<Option<AnswerSheet>, DomainError> {
        Ok(self.answer_sheets.read().await.get(id).cloned())
    }
}
