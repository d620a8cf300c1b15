//! Value objects referenced by an assessment.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{AnswerSheetId, MedicalScaleId, QuestionnaireId};

/// Why an assessment was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginType {
    Adhoc,
    Plan,
    Screening,
}

impl OriginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginType::Adhoc => "adhoc",
            OriginType::Plan => "plan",
            OriginType::Screening => "screening",
        }
    }
}

impl fmt::Display for OriginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Origin type plus the id of the plan or screening project, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    origin_type: OriginType,
    origin_id: Option<String>,
}

impl Origin {
    pub fn adhoc() -> Self {
        Self {
            origin_type: OriginType::Adhoc,
            origin_id: None,
        }
    }

    pub fn plan(plan_id: impl Into<String>) -> Self {
        Self {
            origin_type: OriginType::Plan,
            origin_id: Some(plan_id.into()),
        }
    }

    pub fn screening(project_id: impl Into<String>) -> Self {
        Self {
            origin_type: OriginType::Screening,
            origin_id: Some(project_id.into()),
        }
    }

    pub fn origin_type(&self) -> OriginType {
        self.origin_type
    }

    pub fn origin_id(&self) -> Option<&str> {
        self.origin_id.as_deref()
    }

    /// Plan and screening origins need a non-blank id.
    pub fn is_valid(&self) -> bool {
        match self.origin_type {
            OriginType::Adhoc => true,
            OriginType::Plan | OriginType::Screening => self
                .origin_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireRef {
    pub id: QuestionnaireId,
    pub code: String,
    pub version: String,
}

impl QuestionnaireRef {
    pub fn new(id: QuestionnaireId, code: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            version: version.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_nil() && self.code.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheetRef {
    pub id: AnswerSheetId,
}

impl AnswerSheetRef {
    pub fn new(id: AnswerSheetId) -> Self {
        Self { id }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_nil()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalScaleRef {
    pub id: MedicalScaleId,
    pub code: String,
    pub name: String,
}

impl MedicalScaleRef {
    pub fn new(id: MedicalScaleId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_nil() && self.code.is_empty()
    }
}
