//! Read ports for the collaborating domains the pipeline evaluates against.
//!
//! - `MedicalScaleReader` - factor and rule configuration by scale code
//! - `QuestionnaireReader` - questions and options by code and version
//! - `AnswerSheetReader` - submitted answers by id

use async_trait::async_trait;

use crate::domain::foundation::{AnswerSheetId, DomainError};
use crate::domain::scale::MedicalScale;
use crate::domain::survey::{AnswerSheet, Questionnaire};

#[async_trait]
pub trait MedicalScaleReader: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<MedicalScale>, DomainError>;
}

#[async_trait]
pub trait QuestionnaireReader: Send + Sync {
    async fn find_by_code_version(
        &self,
        code: &str,
        version: &str,
    ) -> Result<Option<Questionnaire>, DomainError>;
}

#[async_trait]
pub trait AnswerSheetReader: Send + Sync {
    async fn find_by_id(&self, id: &AnswerSheetId) -> Result<Option<AnswerSheet>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_are_object_safe() {
        fn _accepts_dyn(
            _scales: &dyn MedicalScaleReader,
            _questionnaires: &dyn QuestionnaireReader,
            _sheets: &dyn AnswerSheetReader,
        ) {
        }
    }
}
